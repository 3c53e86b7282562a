use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::app::Result;
use crate::store::ContentStore;

pub const SNAPSHOT_EXTENSION: &str = "html";

/// Stores one `<identity>.html` file per feed under a root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, identity: &str) -> PathBuf {
        self.root.join(format!("{}.{}", identity, SNAPSHOT_EXTENSION))
    }

    fn is_snapshot(path: &Path) -> bool {
        path.is_file() && path.extension().is_some_and(|ext| ext == SNAPSHOT_EXTENSION)
    }
}

impl ContentStore for FileStore {
    fn read(&self, identity: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(identity)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, identity: &str, content: &str) -> Result<()> {
        let path = self.path_for(identity);
        let tmp = self
            .root
            .join(format!("{}.{}.tmp", identity, SNAPSHOT_EXTENSION));

        // Readers only ever see the old or the new snapshot, never a torn one.
        let written = fs::File::create(&tmp).and_then(|mut file| {
            file.write_all(content.as_bytes())?;
            file.sync_all()
        });
        if let Err(e) = written.and_then(|_| fs::rename(&tmp, &path)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        tracing::debug!("Stored snapshot {}", path.display());
        Ok(())
    }

    fn exists(&self, identity: &str) -> bool {
        self.path_for(identity).is_file()
    }

    fn clear(&self) -> Result<usize> {
        let mut removed = 0;
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if Self::is_snapshot(&path) {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

pub mod fs;

use crate::app::Result;

pub use fs::FileStore;

/// Key → text blob storage for snapshots, keyed by feed identity.
pub trait ContentStore {
    fn read(&self, identity: &str) -> Result<Option<String>>;
    fn write(&self, identity: &str, content: &str) -> Result<()>;
    fn exists(&self, identity: &str) -> bool;

    /// Remove every snapshot. Returns how many were removed.
    fn clear(&self) -> Result<usize>;
}

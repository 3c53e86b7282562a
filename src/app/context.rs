use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app::error::{FeedwatchError, Result};
use crate::config::Config;
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::pipeline::FeedSync;
use crate::registry::FeedRegistry;
use crate::store::FileStore;

pub const DEFAULT_CACHE_DIR: &str = "./.feed_cache";

pub struct AppContext {
    pub config: Config,
    pub registry: FeedRegistry,
    pub store: Arc<FileStore>,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
}

impl AppContext {
    /// Wire up the application. `cache_dir` overrides the configured cache
    /// directory.
    pub fn new(config: Config, cache_dir: Option<PathBuf>) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(&config.fetch)?);
        Self::with_fetcher(config, cache_dir, fetcher)
    }

    pub fn with_fetcher(
        config: Config,
        cache_dir: Option<PathBuf>,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
    ) -> Result<Self> {
        let registry = FeedRegistry::from_entries(&config.feeds)?;

        let cache_dir = match cache_dir.or_else(|| config.cache.dir.clone()) {
            Some(dir) => Self::existing_cache_dir(&dir)?,
            None => Self::default_cache_dir()?,
        };
        let store = Arc::new(FileStore::new(cache_dir));

        Ok(Self {
            config,
            registry,
            store,
            fetcher,
        })
    }

    pub fn pipeline(&self) -> FeedSync<FileStore> {
        FeedSync::new(self.fetcher.clone(), self.store.clone())
    }

    fn existing_cache_dir(dir: &Path) -> Result<PathBuf> {
        if !dir.is_dir() {
            return Err(FeedwatchError::Config(format!(
                "The directory cache path {} does not exist!",
                dir.display()
            )));
        }
        Ok(dir.to_path_buf())
    }

    fn default_cache_dir() -> Result<PathBuf> {
        let dir = PathBuf::from(DEFAULT_CACHE_DIR);
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

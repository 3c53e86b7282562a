//! Sync of a single feed: fetch, extract, detect, render.
//!
//! ```text
//! Fetcher → extract → ChangeDetector → render_notification → SyncResult
//! ```
//!
//! Nothing here sends mail; the [`SyncResult`] is handed to the
//! [`Dispatcher`](crate::dispatch::Dispatcher) which decides about delivery.

use std::sync::Arc;

use crate::app::Result;
use crate::detector::ChangeDetector;
use crate::domain::{FeedDefinition, SyncOptions, SyncResult};
use crate::extractor::extract;
use crate::fetcher::Fetcher;
use crate::notify::render_notification;
use crate::store::ContentStore;

pub struct FeedSync<S: ContentStore> {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    detector: ChangeDetector<S>,
}

impl<S: ContentStore> FeedSync<S> {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>, store: Arc<S>) -> Self {
        Self {
            fetcher,
            detector: ChangeDetector::new(store),
        }
    }

    /// Sync one feed. Performs exactly one fetch and at most one snapshot
    /// write.
    pub async fn sync(&self, feed: &FeedDefinition, options: &SyncOptions) -> Result<SyncResult> {
        tracing::info!("Syncing feed {}", feed.title);

        let content = self.fetcher.fetch(feed.url.as_str()).await?;
        let fragment = extract(&content, &feed.rule)?;

        let changed = self.detector.detect_and_update(
            &fragment,
            &feed.identity,
            options.count_first_run_as_change,
            options.persist(),
        )?;
        tracing::debug!("Feed {} is different: {}", feed.title, changed);

        let message = render_notification(feed, &fragment)?;

        Ok(SyncResult {
            identity: feed.identity.clone(),
            title: feed.title.clone(),
            changed,
            message,
        })
    }
}

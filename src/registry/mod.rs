use std::collections::BTreeMap;

use crate::app::{FeedwatchError, Result};
use crate::config::FeedEntry;
use crate::domain::FeedDefinition;

/// The set of feeds known to this run, keyed by identity.
#[derive(Debug, Default)]
pub struct FeedRegistry {
    feeds: BTreeMap<String, FeedDefinition>,
}

impl FeedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from configuration entries. Any invalid or duplicate
    /// entry fails the whole registry.
    pub fn from_entries(entries: &[FeedEntry]) -> Result<Self> {
        let mut registry = Self::new();
        for entry in entries {
            registry.register(&entry.title, &entry.url, &entry.selector, &entry.message)?;
        }
        Ok(registry)
    }

    pub fn has_feed(&self, identity: &str) -> bool {
        self.feeds.contains_key(identity)
    }

    pub fn add(&mut self, feed: FeedDefinition) -> Result<()> {
        if self.has_feed(&feed.identity) {
            return Err(FeedwatchError::Config(format!(
                "The feed {} is already defined!",
                feed.title
            )));
        }

        self.feeds.insert(feed.identity.clone(), feed);
        Ok(())
    }

    pub fn register(&mut self, title: &str, url: &str, selector: &str, message: &str) -> Result<()> {
        let feed = FeedDefinition::new(title, url, selector, message)?;
        self.add(feed)
    }

    pub fn get(&self, identity: &str) -> Option<&FeedDefinition> {
        self.feeds.get(identity)
    }

    /// All feeds, ordered by title.
    pub fn feeds(&self) -> Vec<&FeedDefinition> {
        let mut feeds: Vec<_> = self.feeds.values().collect();
        feeds.sort_by(|a, b| a.title.cmp(&b.title));
        feeds
    }

    /// The feeds named by `identities`, in the given order. An empty list
    /// selects every feed.
    pub fn select(&self, identities: &[String]) -> Result<Vec<&FeedDefinition>> {
        if identities.is_empty() {
            return Ok(self.feeds());
        }

        identities
            .iter()
            .map(|id| {
                self.get(id)
                    .ok_or_else(|| FeedwatchError::Config(format!("Unknown feed: {}", id)))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }
}

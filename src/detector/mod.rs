use std::sync::Arc;

use crate::app::Result;
use crate::store::ContentStore;

/// How a fragment relates to the stored snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// No snapshot existed yet.
    FirstSeen,
    /// A snapshot existed and differs from the fragment.
    Modified,
    Unchanged,
}

impl Observation {
    pub fn is_change(self, first_run_counts_as_change: bool) -> bool {
        match self {
            Observation::FirstSeen => first_run_counts_as_change,
            Observation::Modified => true,
            Observation::Unchanged => false,
        }
    }
}

/// Compares fragments against their snapshot and keeps the snapshot current.
///
/// Comparison is exact string equality. Markup churn upstream (whitespace,
/// attribute order) is reported as a change.
pub struct ChangeDetector<S: ContentStore> {
    store: Arc<S>,
}

impl<S: ContentStore> ChangeDetector<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Compare `fragment` with the snapshot of `identity`, overwriting the
    /// snapshot when it differs and `persist` is set.
    pub fn observe(&self, fragment: &str, identity: &str, persist: bool) -> Result<Observation> {
        let observation = match self.store.read(identity)? {
            None => Observation::FirstSeen,
            Some(cached) if cached != fragment => Observation::Modified,
            Some(_) => return Ok(Observation::Unchanged),
        };

        if persist {
            self.store.write(identity, fragment)?;
        } else {
            tracing::debug!("Not persisting snapshot for {}", identity);
        }

        Ok(observation)
    }

    pub fn detect_and_update(
        &self,
        fragment: &str,
        identity: &str,
        first_run_counts_as_change: bool,
        persist: bool,
    ) -> Result<bool> {
        let observation = self.observe(fragment, identity, persist)?;
        Ok(observation.is_change(first_run_counts_as_change))
    }
}

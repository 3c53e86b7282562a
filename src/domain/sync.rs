/// Outcome of syncing one feed. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncResult {
    pub identity: String,
    pub title: String,
    pub changed: bool,
    pub message: String,
}

/// Knobs of a single sync run, shared by every feed in the run.
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    /// Whether the very first sync of a feed counts as a change.
    pub count_first_run_as_change: bool,
    /// Evaluate everything, write and send nothing.
    pub dry_run: bool,
    /// Never write snapshots, but still allow sending.
    pub no_update: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            count_first_run_as_change: true,
            dry_run: false,
            no_update: false,
        }
    }
}

impl SyncOptions {
    pub fn persist(&self) -> bool {
        !self.dry_run && !self.no_update
    }
}

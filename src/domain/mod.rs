pub mod feed;
pub mod sync;

pub use feed::{slugify, FeedDefinition};
pub use sync::{SyncOptions, SyncResult};

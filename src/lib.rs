//! # feedwatch
//!
//! Watches a handful of webpages and emails a notification when the part of
//! the page you care about (the latest chapter, the newest post) changes.
//!
//! ## Architecture
//!
//! Every feed goes through the same pipeline, one feed at a time:
//!
//! ```text
//! Fetcher → Extractor → ChangeDetector → Notification → Dispatcher → Transport
//!                            ↕
//!                       ContentStore
//! ```
//!
//! A failing feed never stops the others; the caller collects the failures
//! into a [`RunSummary`](cli::commands::RunSummary).
//!
//! ## Quick Start
//!
//! ```bash
//! # Show the feeds from ~/.config/feedwatch/config.toml
//! feedwatch list
//!
//! # See what would be sent, without sending or caching anything
//! feedwatch sync --dry-run
//!
//! # Sync and send, but don't spam on the very first run
//! FEED_EMAIL=me@example.com FEED_PASSWORD=... feedwatch sync --skip-initial
//!
//! # Check every hour
//! feedwatch watch --interval 1h
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together configuration,
/// registry, store and fetcher.
pub mod app;

/// Command-line interface using clap.
///
/// - `sync [FEED_ID...]` - Sync all or some feeds once
/// - `watch` - Sync repeatedly
/// - `list` - Show registered feeds
/// - `clear` - Delete every cached fragment
pub mod cli;

/// Configuration file (`~/.config/feedwatch/config.toml`).
pub mod config;

/// Snapshot comparison with first-run policy.
pub mod detector;

/// Send decision and delivery of notifications.
pub mod dispatch;

/// Core domain models.
///
/// - [`FeedDefinition`](domain::FeedDefinition): A watched page
/// - [`SyncResult`](domain::SyncResult): Outcome of one sync
pub mod domain;

/// Fragment extraction with CSS selectors.
pub mod extractor;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for page fetching
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Rendering of notification bodies.
pub mod notify;

/// Single-feed sync orchestration.
pub mod pipeline;

/// Feed registration and lookup.
pub mod registry;

/// Snapshot persistence.
///
/// - [`ContentStore`](store::ContentStore): Trait defining storage operations
/// - [`FileStore`](store::FileStore): One file per feed
pub mod store;

/// Notification delivery.
///
/// - [`Transport`](transport::Transport): Async trait for delivery
/// - [`SmtpMailer`](transport::SmtpMailer): lettre-based SMTP implementation
pub mod transport;

/// Periodic sync loop.
pub mod watch;

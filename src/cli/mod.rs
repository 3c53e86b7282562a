pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::SyncOptions;

#[derive(Parser)]
#[command(name = "feedwatch", version)]
#[command(about = "Watches webpages and emails you when they change", long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the cached fragments (must exist)
    #[arg(long, env = "FEED_CACHE_PATH", global = true)]
    pub cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sync all or selected feeds once
    Sync(SyncArgs),
    /// Sync repeatedly until interrupted
    Watch {
        #[command(flatten)]
        sync: SyncArgs,

        /// Interval between runs (e.g., "30m", "1h", "1d")
        #[arg(short, long, default_value = "1h")]
        interval: String,

        /// Wait one interval before the first run
        #[arg(long)]
        no_initial_run: bool,
    },
    /// List registered feeds
    List,
    /// Delete every cached fragment
    Clear,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SyncArgs {
    /// Identities of the feeds to sync (default: all)
    pub feeds: Vec<String>,

    /// Fetch and compare, but neither store nor send anything
    #[arg(long)]
    pub dry_run: bool,

    /// Send a notification even if nothing changed
    #[arg(long)]
    pub force: bool,

    /// Never update the cached fragments
    #[arg(long)]
    pub no_update: bool,

    /// Don't notify for feeds synced for the first time
    #[arg(long)]
    pub skip_initial: bool,

    /// Sender address, also the SMTP user
    #[arg(long, env = "FEED_EMAIL")]
    pub sender: Option<String>,

    /// SMTP password
    #[arg(long, env = "FEED_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Recipient address (default: the sender)
    #[arg(long, env = "FEED_RECIPIENT")]
    pub recipient: Option<String>,

    /// SMTP server
    #[arg(long, env = "FEED_EMAIL_SERVER")]
    pub email_server: Option<String>,
}

impl SyncArgs {
    pub fn options(&self) -> SyncOptions {
        SyncOptions {
            count_first_run_as_change: !self.skip_initial,
            dry_run: self.dry_run,
            no_update: self.no_update,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sync_flags() {
        let cli = Cli::try_parse_from([
            "feedwatch",
            "sync",
            "one-piece",
            "alpha",
            "--dry-run",
            "--skip-initial",
            "--recipient",
            "you@example.com",
        ])
        .unwrap();

        let Commands::Sync(args) = cli.command else {
            panic!("expected sync");
        };
        assert_eq!(args.feeds, vec!["one-piece", "alpha"]);
        assert_eq!(args.recipient.as_deref(), Some("you@example.com"));

        let options = args.options();
        assert!(options.dry_run);
        assert!(!options.no_update);
        assert!(!options.count_first_run_as_change);
    }

    #[test]
    fn test_parse_watch() {
        let cli = Cli::try_parse_from([
            "feedwatch",
            "watch",
            "--interval",
            "30m",
            "--force",
            "--cache-dir",
            "/tmp/cache",
        ])
        .unwrap();

        assert_eq!(cli.cache_dir, Some(PathBuf::from("/tmp/cache")));
        let Commands::Watch { sync, interval, no_initial_run } = cli.command else {
            panic!("expected watch");
        };
        assert_eq!(interval, "30m");
        assert!(!no_initial_run);
        assert!(sync.force);
        assert!(sync.feeds.is_empty());
    }

    #[test]
    fn test_default_options_count_first_run() {
        let options = SyncArgs::default().options();
        assert!(options.count_first_run_as_change);
        assert!(options.persist());
    }
}

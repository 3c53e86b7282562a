use crate::app::{AppContext, FeedwatchError, Result};
use crate::cli::SyncArgs;
use crate::config::EmailConfig;
use crate::dispatch::{Delivery, Dispatcher};
use crate::domain::{FeedDefinition, SyncOptions};
use crate::pipeline::FeedSync;
use crate::store::{ContentStore, FileStore};
use crate::transport::{DryRunTransport, SmtpMailer, Transport};
use crate::watch::{WatchConfig, Watcher};

/// Tallies of one pass over a set of feeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub changed: usize,
    pub sent: usize,
    pub failed: usize,
}

impl RunSummary {
    /// Fails with [`FeedwatchError::PartialFailure`] if any feed failed.
    pub fn into_result(self) -> Result<Self> {
        if self.failed > 0 {
            return Err(FeedwatchError::PartialFailure {
                failed: self.failed,
                total: self.total,
            });
        }
        Ok(self)
    }
}

/// Sync and dispatch every feed in order. A failing feed is logged and
/// counted; the remaining feeds are still attempted.
pub async fn run_sync<S: ContentStore>(
    pipeline: &FeedSync<S>,
    feeds: &[&FeedDefinition],
    options: &SyncOptions,
    dispatcher: &Dispatcher,
    transport: &(dyn Transport + Send + Sync),
) -> RunSummary {
    let mut summary = RunSummary {
        total: feeds.len(),
        ..Default::default()
    };

    for feed in feeds {
        let delivery = match pipeline.sync(feed, options).await {
            Ok(result) => {
                if result.changed {
                    summary.changed += 1;
                }
                dispatcher.dispatch(&result, transport).await
            }
            Err(e) => Err(e),
        };

        match delivery {
            Ok(delivery) if delivery.was_sent() => summary.sent += 1,
            Ok(Delivery::DryRun { would_send: true }) => {
                println!("  {} would be notified", feed.title);
            }
            Ok(_) => {}
            Err(e) => {
                summary.failed += 1;
                tracing::error!("Error syncing {}: {}", feed.title, e);
            }
        }
    }

    summary
}

/// Work out sender, recipient and flags for this run.
pub fn dispatcher_for(email: &EmailConfig, args: &SyncArgs) -> Result<Dispatcher> {
    let sender = args.sender.clone().or_else(|| email.sender.clone());
    let recipient = args
        .recipient
        .clone()
        .or_else(|| email.recipient.clone())
        .or_else(|| sender.clone());

    if args.dry_run {
        return Ok(Dispatcher {
            sender: sender.unwrap_or_default(),
            recipient: recipient.unwrap_or_default(),
            force: args.force,
            dry_run: true,
        });
    }

    let sender = sender.ok_or_else(|| {
        FeedwatchError::Config("No sender address, pass --sender or set FEED_EMAIL".into())
    })?;
    let recipient = recipient.unwrap_or_else(|| sender.clone());

    Ok(Dispatcher {
        sender,
        recipient,
        force: args.force,
        dry_run: false,
    })
}

/// Build the dispatcher and establish the transport. Outside of dry runs this
/// logs into the SMTP server, so a bad login fails before any feed is synced.
pub async fn connect(
    ctx: &AppContext,
    args: &SyncArgs,
) -> Result<(Dispatcher, Box<dyn Transport + Send + Sync>)> {
    let mut email = ctx.config.email.clone();
    if let Some(server) = &args.email_server {
        email.server = server.clone();
    }

    let dispatcher = dispatcher_for(&email, args)?;
    if dispatcher.dry_run {
        return Ok((dispatcher, Box::new(DryRunTransport)));
    }

    let password = args.password.as_deref().ok_or_else(|| {
        FeedwatchError::Config("No SMTP password, pass --password or set FEED_PASSWORD".into())
    })?;
    let mailer = SmtpMailer::connect(&email, &dispatcher.sender, password).await?;

    Ok((dispatcher, Box::new(mailer)))
}

pub async fn sync_feeds(ctx: &AppContext, args: &SyncArgs) -> Result<()> {
    let feeds = ctx.registry.select(&args.feeds)?;

    if feeds.is_empty() {
        println!("No feeds to sync");
        return Ok(());
    }

    let (dispatcher, transport) = connect(ctx, args).await?;

    println!("Syncing {} feeds...", feeds.len());
    let summary = run_sync(
        &ctx.pipeline(),
        &feeds,
        &args.options(),
        &dispatcher,
        &*transport,
    )
    .await;

    println!(
        "Sync complete: {} changed, {} sent, {} errors",
        summary.changed, summary.sent, summary.failed
    );
    summary.into_result().map(|_| ())
}

pub async fn watch_feeds(ctx: &AppContext, args: &SyncArgs, config: WatchConfig) -> Result<()> {
    let feeds = ctx.registry.select(&args.feeds)?;

    if feeds.is_empty() {
        println!("No feeds to watch");
        return Ok(());
    }

    let (dispatcher, transport) = connect(ctx, args).await?;
    let pipeline = ctx.pipeline();
    let options = args.options();

    Watcher::new(config)
        .run(|| run_sync(&pipeline, &feeds, &options, &dispatcher, &*transport))
        .await;

    Ok(())
}

pub fn list_feeds(ctx: &AppContext) -> Result<()> {
    let feeds = ctx.registry.feeds();

    if feeds.is_empty() {
        println!("No feeds");
        return Ok(());
    }

    for feed in feeds {
        let cached = if ctx.store.exists(&feed.identity) {
            "cached"
        } else {
            "never synced"
        };
        println!(
            "{} [{}] ({})\n  {}\n  {}",
            feed.title,
            feed.identity,
            cached,
            feed.url,
            feed.rule.as_str()
        );
    }

    Ok(())
}

pub fn clear_cache(store: &FileStore) -> Result<()> {
    let removed = store.clear()?;
    println!(
        "Removed {} cached fragments from {}",
        removed,
        store.root().display()
    );
    Ok(())
}

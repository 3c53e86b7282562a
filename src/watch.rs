//! Periodic re-runs of the sync command.
//!
//! Runs in the foreground until Ctrl-C, without requiring a system scheduler.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta};
use tokio::time::{interval, MissedTickBehavior};

use crate::cli::commands::RunSummary;

/// Watch loop configuration
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Seconds between runs (default: 3600 = 1 hour)
    pub interval_secs: u64,
    /// Whether to run immediately on start
    pub run_on_start: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval_secs: 3600,
            run_on_start: true,
        }
    }
}

impl WatchConfig {
    /// Parse interval string like "1h", "30m", "6h", "1d"
    pub fn parse_interval(s: &str) -> Result<u64, String> {
        let s = s.trim().to_lowercase();

        let secs = if let Some(hours) = s.strip_suffix('h') {
            hours
                .parse::<u64>()
                .ok()
                .and_then(|h| h.checked_mul(3600))
                .ok_or_else(|| format!("Invalid hours: {}", hours))?
        } else if let Some(minutes) = s.strip_suffix('m') {
            minutes
                .parse::<u64>()
                .ok()
                .and_then(|m| m.checked_mul(60))
                .ok_or_else(|| format!("Invalid minutes: {}", minutes))?
        } else if let Some(days) = s.strip_suffix('d') {
            days.parse::<u64>()
                .ok()
                .and_then(|d| d.checked_mul(86400))
                .ok_or_else(|| format!("Invalid days: {}", days))?
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.parse::<u64>()
                .map_err(|_| format!("Invalid seconds: {}", secs))?
        } else {
            s.parse::<u64>()
                .map_err(|_| format!("Invalid interval: {}. Use format like '1h', '30m', '1d'", s))?
        };

        if secs == 0 {
            return Err("Interval must be greater than zero".to_string());
        }
        Ok(secs)
    }

    /// Format interval for display
    pub fn format_interval(secs: u64) -> String {
        if secs >= 86400 && secs % 86400 == 0 {
            format!("{}d", secs / 86400)
        } else if secs >= 3600 && secs % 3600 == 0 {
            format!("{}h", secs / 3600)
        } else if secs >= 60 && secs % 60 == 0 {
            format!("{}m", secs / 60)
        } else {
            format!("{}s", secs)
        }
    }
}

/// Local time `interval_secs` from now, if representable.
fn next_run_at(interval_secs: u64) -> Option<DateTime<Local>> {
    let secs = i64::try_from(interval_secs).ok()?;
    Local::now().checked_add_signed(TimeDelta::try_seconds(secs)?)
}

pub struct Watcher {
    config: WatchConfig,
}

impl Watcher {
    pub fn new(config: WatchConfig) -> Self {
        Self { config }
    }

    /// Call `run_once` every interval until Ctrl-C. Failed feeds are only
    /// logged; the loop keeps going.
    pub async fn run<F, Fut>(&self, run_once: F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = RunSummary>,
    {
        self.run_until(run_once, tokio::signal::ctrl_c()).await
    }

    /// Like [`Watcher::run`], but stops once `shutdown` completes, also in
    /// the middle of a run.
    pub async fn run_until<F, Fut, S>(&self, mut run_once: F, shutdown: S)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = RunSummary>,
        S: Future,
    {
        let period = Duration::from_secs(self.config.interval_secs);
        let mut timer = interval(period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        tracing::info!(
            "Watching feeds (interval: {})",
            WatchConfig::format_interval(self.config.interval_secs)
        );

        if !self.config.run_on_start {
            // The first tick completes immediately
            timer.tick().await;
        }

        loop {
            tokio::select! {
                _ = timer.tick() => {}
                _ = &mut shutdown => break,
            }

            let summary = tokio::select! {
                summary = run_once() => summary,
                _ = &mut shutdown => {
                    tracing::warn!("Interrupted during a run");
                    break;
                }
            };
            if summary.failed > 0 {
                tracing::warn!("{} of {} feeds failed", summary.failed, summary.total);
            }

            match next_run_at(self.config.interval_secs) {
                Some(next) => tracing::info!(
                    "Run complete: {} changed, {} sent. Next run at {}",
                    summary.changed,
                    summary.sent,
                    next.format("%Y-%m-%d %H:%M:%S")
                ),
                None => tracing::info!(
                    "Run complete: {} changed, {} sent",
                    summary.changed,
                    summary.sent
                ),
            }
        }

        tracing::info!("Stopping watch");
    }
}

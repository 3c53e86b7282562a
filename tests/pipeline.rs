use std::collections::VecDeque;
use std::fs;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use feedwatch::app::{AppContext, FeedwatchError, Result};
use feedwatch::cli::commands::run_sync;
use feedwatch::config::Config;
use feedwatch::dispatch::Dispatcher;
use feedwatch::domain::SyncOptions;
use feedwatch::fetcher::Fetcher;
use feedwatch::store::ContentStore;
use feedwatch::transport::Transport;

/// Serves scripted pages in order.
#[derive(Default)]
struct ScriptedFetcher {
    pages: Mutex<VecDeque<String>>,
}

impl ScriptedFetcher {
    fn push(&self, page: &str) {
        self.pages.lock().unwrap().push_back(page.to_string());
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| FeedwatchError::Decode {
                url: url.to_string(),
            })
    }
}

#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, _from: &str, _to: &str, subject: &str, body: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));
        Ok(())
    }
}

const CONFIG: &str = r#"
[[feeds]]
title = "Alpha"
url = "https://a.test"
selector = "li:first-child a"
message = "New on {title}"
"#;

fn context(cache: &TempDir, fetcher: Arc<ScriptedFetcher>) -> AppContext {
    let config_dir = TempDir::new().unwrap();
    let path = config_dir.path().join("config.toml");
    fs::write(&path, CONFIG).unwrap();

    let config = Config::load_from(&path).unwrap();
    AppContext::with_fetcher(config, Some(cache.path().to_path_buf()), fetcher).unwrap()
}

fn dispatcher(dry_run: bool) -> Dispatcher {
    Dispatcher {
        sender: "me@example.com".into(),
        recipient: "you@example.com".into(),
        force: false,
        dry_run,
    }
}

#[tokio::test]
async fn test_notifies_only_when_fragment_changes() {
    let cache = TempDir::new().unwrap();
    let fetcher = Arc::new(ScriptedFetcher::default());
    fetcher.push(r#"<ul><li><a href="/p/1">New</a></li></ul>"#);
    fetcher.push(r#"<ul><li><a href="/p/1">New</a></li></ul>"#);
    fetcher.push(r#"<li><a href="/p/2">Newer</a></li>"#);

    let ctx = context(&cache, fetcher.clone());
    let pipeline = ctx.pipeline();
    let feeds = ctx.registry.select(&[]).unwrap();
    let options = SyncOptions {
        count_first_run_as_change: false,
        ..Default::default()
    };
    let transport = RecordingTransport::default();

    // First run only records the fragment
    let first = run_sync(&pipeline, &feeds, &options, &dispatcher(false), &transport).await;
    assert_eq!(first.changed, 0);
    assert_eq!(first.sent, 0);
    assert_eq!(
        ctx.store.read("alpha").unwrap().as_deref(),
        Some(r#"<a href="/p/1">New</a>"#)
    );

    let second = run_sync(&pipeline, &feeds, &options, &dispatcher(false), &transport).await;
    assert_eq!(second.changed, 0);
    assert!(transport.sent.lock().unwrap().is_empty());

    let third = run_sync(&pipeline, &feeds, &options, &dispatcher(false), &transport).await;
    assert_eq!(third.changed, 1);
    assert_eq!(third.sent, 1);
    assert_eq!(third.failed, 0);

    let sent = transport.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "Feed: Alpha");
    assert_eq!(sent[0].1, "New on Alpha\n<a href=\"https://a.test/p/2\">Newer</a>");
}

#[tokio::test]
async fn test_table_row_fragment_survives_notification() {
    let cache = TempDir::new().unwrap();
    let config_dir = TempDir::new().unwrap();
    let path = config_dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[[feeds]]
title = "Tables"
url = "https://t.test/"
selector = "tr.latest"
message = "{title}"
"#,
    )
    .unwrap();

    let fetcher = Arc::new(ScriptedFetcher::default());
    fetcher.push(r#"<table><tr class="latest"><td><a href="/c/9">Ch 9</a></td></tr></table>"#);
    let config = Config::load_from(&path).unwrap();
    let ctx = AppContext::with_fetcher(config, Some(cache.path().to_path_buf()), fetcher).unwrap();
    let feeds = ctx.registry.select(&[]).unwrap();
    let transport = RecordingTransport::default();

    let summary = run_sync(
        &ctx.pipeline(),
        &feeds,
        &SyncOptions::default(),
        &dispatcher(false),
        &transport,
    )
    .await;

    assert_eq!(summary.sent, 1);
    let sent = transport.sent.lock().unwrap();
    assert_eq!(
        sent[0].1,
        "Tables\n<tr class=\"latest\"><td><a href=\"https://t.test/c/9\">Ch 9</a></td></tr>"
    );
}

#[tokio::test]
async fn test_dry_run_leaves_cache_untouched() {
    let cache = TempDir::new().unwrap();
    let fetcher = Arc::new(ScriptedFetcher::default());
    fetcher.push(r#"<ul><li><a href="/p/1">New</a></li></ul>"#);

    let ctx = context(&cache, fetcher.clone());
    let feeds = ctx.registry.select(&[]).unwrap();
    let options = SyncOptions {
        dry_run: true,
        ..Default::default()
    };
    let transport = RecordingTransport::default();

    assert!(!ctx.store.exists("alpha"));
    let summary = run_sync(&ctx.pipeline(), &feeds, &options, &dispatcher(true), &transport).await;

    assert_eq!(summary.changed, 1);
    assert_eq!(summary.sent, 0);
    assert!(!ctx.store.exists("alpha"));
    assert!(transport.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_fetch_failure_is_reported() {
    let cache = TempDir::new().unwrap();
    let ctx = context(&cache, Arc::new(ScriptedFetcher::default()));
    let feeds = ctx.registry.select(&[]).unwrap();
    let transport = RecordingTransport::default();

    let summary = run_sync(
        &ctx.pipeline(),
        &feeds,
        &SyncOptions::default(),
        &dispatcher(false),
        &transport,
    )
    .await;

    assert_eq!(summary.failed, 1);
    assert!(matches!(
        summary.into_result(),
        Err(FeedwatchError::PartialFailure { failed: 1, total: 1 })
    ));
}

#[test]
fn test_duplicate_feed_rejects_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, format!("{}{}", CONFIG, CONFIG.replace("Alpha", "alpha"))).unwrap();

    let config = Config::load_from(&path).unwrap();
    let result = AppContext::with_fetcher(
        config,
        Some(dir.path().to_path_buf()),
        Arc::new(ScriptedFetcher::default()),
    );

    assert!(matches!(result, Err(FeedwatchError::Config(_))));
}

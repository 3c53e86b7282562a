use crate::app::Result;
use crate::domain::SyncResult;
use crate::transport::Transport;

/// What the dispatcher did with a [`SyncResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// Nothing changed and sending was not forced.
    Unchanged,
    /// Dry run: nothing was sent, `would_send` is the decision that a real
    /// run would have taken.
    DryRun { would_send: bool },
}

impl Delivery {
    pub fn was_sent(self) -> bool {
        self == Delivery::Sent
    }
}

pub fn should_send(changed: bool, force: bool) -> bool {
    changed || force
}

/// Decides about and performs delivery of notifications to one recipient.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    pub sender: String,
    pub recipient: String,
    pub force: bool,
    pub dry_run: bool,
}

impl Dispatcher {
    pub fn subject(result: &SyncResult) -> String {
        format!("Feed: {}", result.title)
    }

    pub async fn dispatch(
        &self,
        result: &SyncResult,
        transport: &(dyn Transport + Send + Sync),
    ) -> Result<Delivery> {
        let send = should_send(result.changed, self.force);

        if self.dry_run {
            tracing::info!(
                "Dry run: {} notification for {}",
                if send { "would send" } else { "would skip" },
                result.title
            );
            tracing::debug!("Email\n{}", result.message);
            return Ok(Delivery::DryRun { would_send: send });
        }

        if !send {
            return Ok(Delivery::Unchanged);
        }

        transport
            .send(
                &self.sender,
                &self.recipient,
                &Self::subject(result),
                &result.message,
            )
            .await?;
        tracing::info!("Sent notification for {} to {}", result.title, self.recipient);

        Ok(Delivery::Sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::FeedwatchError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<(String, String, String, String)>>,
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(&self, from: &str, to: &str, subject: &str, body: &str) -> Result<()> {
            self.sent.lock().unwrap().push((
                from.to_string(),
                to.to_string(),
                subject.to_string(),
                body.to_string(),
            ));
            Ok(())
        }
    }

    struct BrokenTransport;

    #[async_trait]
    impl Transport for BrokenTransport {
        async fn send(&self, _: &str, _: &str, _: &str, _: &str) -> Result<()> {
            Err(FeedwatchError::Transport("connection reset".into()))
        }
    }

    fn result(changed: bool) -> SyncResult {
        SyncResult {
            identity: "alpha".into(),
            title: "Alpha".into(),
            changed,
            message: "New on Alpha\n<a href=\"https://a.test/p/2\">Newer</a>".into(),
        }
    }

    fn dispatcher(force: bool, dry_run: bool) -> Dispatcher {
        Dispatcher {
            sender: "me@example.com".into(),
            recipient: "you@example.com".into(),
            force,
            dry_run,
        }
    }

    #[test]
    fn test_should_send() {
        assert!(should_send(true, false));
        assert!(should_send(false, true));
        assert!(should_send(true, true));
        assert!(!should_send(false, false));
    }

    #[tokio::test]
    async fn test_sends_changed_result() {
        let transport = RecordingTransport::default();
        let delivery = dispatcher(false, false)
            .dispatch(&result(true), &transport)
            .await
            .unwrap();

        assert_eq!(delivery, Delivery::Sent);
        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "me@example.com");
        assert_eq!(sent[0].1, "you@example.com");
        assert_eq!(sent[0].2, "Feed: Alpha");
        assert!(sent[0].3.contains("https://a.test/p/2"));
    }

    #[tokio::test]
    async fn test_skips_unchanged_result() {
        let transport = RecordingTransport::default();
        let delivery = dispatcher(false, false)
            .dispatch(&result(false), &transport)
            .await
            .unwrap();

        assert_eq!(delivery, Delivery::Unchanged);
        assert!(!delivery.was_sent());
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_force_sends_unchanged_result() {
        let transport = RecordingTransport::default();
        let delivery = dispatcher(true, false)
            .dispatch(&result(false), &transport)
            .await
            .unwrap();

        assert!(delivery.was_sent());
        assert_eq!(transport.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_dry_run_reports_decision_without_sending() {
        let transport = RecordingTransport::default();

        let changed = dispatcher(false, true)
            .dispatch(&result(true), &transport)
            .await
            .unwrap();
        let unchanged = dispatcher(false, true)
            .dispatch(&result(false), &transport)
            .await
            .unwrap();
        let forced = dispatcher(true, true)
            .dispatch(&result(false), &transport)
            .await
            .unwrap();

        assert_eq!(changed, Delivery::DryRun { would_send: true });
        assert_eq!(unchanged, Delivery::DryRun { would_send: false });
        assert_eq!(forced, Delivery::DryRun { would_send: true });
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let outcome = dispatcher(false, false)
            .dispatch(&result(true), &BrokenTransport)
            .await;

        assert!(matches!(outcome, Err(FeedwatchError::Transport(_))));
    }
}

pub mod smtp;

use async_trait::async_trait;

use crate::app::Result;

pub use smtp::SmtpMailer;

/// Delivers a rendered notification. Authentication happens when the
/// transport is built, not per message.
#[async_trait]
pub trait Transport {
    async fn send(&self, from: &str, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// Stands in for a real transport during dry runs, where the dispatcher
/// never sends.
pub struct DryRunTransport;

#[async_trait]
impl Transport for DryRunTransport {
    async fn send(&self, _from: &str, to: &str, subject: &str, _body: &str) -> Result<()> {
        tracing::warn!("Dry run transport asked to send {:?} to {}", subject, to);
        Ok(())
    }
}

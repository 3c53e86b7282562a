use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::app::{FeedwatchError, Result};
use crate::config::EmailConfig;
use crate::transport::Transport;

const SENDER_NAME: &str = "Feed Mailer";

/// SMTP transport over STARTTLS. The connection is verified once in
/// [`SmtpMailer::connect`] and pooled for every following message.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub async fn connect(config: &EmailConfig, user: &str, password: &str) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)
            .map_err(|e| transport_error("Invalid SMTP server", e))?
            .port(config.port)
            .timeout(Some(config.timeout()))
            .credentials(Credentials::new(user.to_string(), password.to_string()))
            .build();

        let connected = transport
            .test_connection()
            .await
            .map_err(|e| transport_error("Could not connect to SMTP server", e))?;
        if !connected {
            return Err(FeedwatchError::Transport(format!(
                "SMTP server {}:{} refused the connection",
                config.server, config.port
            )));
        }

        tracing::info!("Connected to SMTP server {}:{}", config.server, config.port);
        Ok(Self { transport })
    }
}

/// Build the HTML message sent for a notification.
pub fn build_message(from: &str, to: &str, subject: &str, body: &str) -> Result<Message> {
    let from: Address = from
        .parse()
        .map_err(|e| transport_error("Invalid sender address", e))?;
    let to: Mailbox = to
        .parse()
        .map_err(|e| transport_error("Invalid recipient address", e))?;

    Message::builder()
        .from(Mailbox::new(Some(SENDER_NAME.to_string()), from))
        .to(to)
        .subject(subject)
        .header(ContentType::TEXT_HTML)
        .body(body.to_string())
        .map_err(|e| transport_error("Could not build message", e))
}

fn transport_error(context: &str, e: impl std::fmt::Display) -> FeedwatchError {
    FeedwatchError::Transport(format!("{}: {}", context, e))
}

#[async_trait]
impl Transport for SmtpMailer {
    async fn send(&self, from: &str, to: &str, subject: &str, body: &str) -> Result<()> {
        let message = build_message(from, to, subject, body)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| transport_error("Could not send message", e))?;
        Ok(())
    }
}

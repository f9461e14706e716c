use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials as SmtpCredentials;
use lettre::AsyncSmtpTransport;
use lettre::AsyncTransport;
use lettre::Message;
use lettre::Tokio1Executor;

use crate::account::errors::MailError;
use crate::account::ports::MailNotifier;
use crate::config::Config;

/// Activation mail delivery over SMTP (STARTTLS).
pub struct SmtpMailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    api_url: String,
}

impl SmtpMailNotifier {
    /// Create a new SMTP notifier from the application configuration.
    ///
    /// # Errors
    /// Relay construction or a malformed `from` address fail fast at
    /// startup rather than on first send.
    pub fn new(config: &Config) -> Result<Self, anyhow::Error> {
        tracing::info!(
            host = %config.smtp.host,
            port = config.smtp.port,
            from = %config.smtp.from,
            "Initializing SMTP transport for activation mail"
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp.host)?
            .port(config.smtp.port)
            .credentials(SmtpCredentials::new(
                config.smtp.username.clone(),
                config.smtp.password.clone(),
            ))
            .build();

        let from: Mailbox = config.smtp.from.parse()?;

        Ok(Self {
            transport,
            from,
            api_url: config.app.api_url.clone(),
        })
    }
}

fn activation_body(activation_url: &str) -> String {
    format!(
        r#"<div>
    <h1>Follow the link to activate your account</h1>
    <a href="{activation_url}">{activation_url}</a>
</div>"#
    )
}

#[async_trait]
impl MailNotifier for SmtpMailNotifier {
    async fn send_activation_mail(&self, to: &str, activation_url: &str) -> Result<(), MailError> {
        let recipient: Mailbox = to
            .parse()
            .map_err(|e| MailError::BuildFailed(format!("Invalid recipient address: {}", e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject(format!("Account activation on {}", self.api_url))
            .header(ContentType::TEXT_HTML)
            .body(activation_body(activation_url))
            .map_err(|e| MailError::BuildFailed(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::SendFailed(e.to_string()))?;

        tracing::debug!(to = %to, "Activation mail dispatched");

        Ok(())
    }
}

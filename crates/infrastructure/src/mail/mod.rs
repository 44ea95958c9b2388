use async_trait::async_trait;
use domain::{DomainError, MailSender};
use std::time::Duration;
use tracing::info;

/// Delivers mail by POSTing to an HTTP mail gateway. The request is
/// bounded by the client timeout; a failed delivery surfaces as a
/// `DeliveryError` and is never retried here.
pub struct HttpMailSender {
    client: reqwest::Client,
    gateway_url: String,
    from: String,
}

impl HttpMailSender {
    pub fn new(gateway_url: String, from: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            gateway_url,
            from,
        }
    }
}

#[async_trait]
impl MailSender for HttpMailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DomainError> {
        let response = self
            .client
            .post(&self.gateway_url)
            .json(&serde_json::json!({
                "from": self.from,
                "to": to,
                "subject": subject,
                "body": body,
            }))
            .send()
            .await
            .map_err(|e| DomainError::DeliveryError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DomainError::DeliveryError(format!(
                "mail gateway returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Development fallback when no gateway is configured: the code ends up
/// in the server log instead of a mailbox.
pub struct LogMailSender;

#[async_trait]
impl MailSender for LogMailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DomainError> {
        info!("📧 mail to {}: {} - {}", to, subject, body);
        Ok(())
    }
}

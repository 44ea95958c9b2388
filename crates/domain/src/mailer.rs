use crate::errors::DomainError;
use async_trait::async_trait;

/// Outbound mail port. Delivery is fallible and must be bounded by the
/// implementation; failures surface to the caller, nothing is retried.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DomainError>;
}

pub mod smtp;

pub use smtp::SmtpMailer;

use crate::error::Result;
use async_trait::async_trait;

/// Outbound mail transport, one message per call
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<()>;
}

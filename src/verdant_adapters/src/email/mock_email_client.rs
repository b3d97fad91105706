use std::sync::Arc;

use tokio::sync::RwLock;
use verdant_core::{EmailAddress, EmailClient};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub recipient: EmailAddress,
    pub subject: String,
    pub content: String,
}

/// Email client that keeps messages in memory instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct MockEmailClient {
    outbox: Arc<RwLock<Vec<SentEmail>>>,
}

impl MockEmailClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent_emails(&self) -> Vec<SentEmail> {
        self.outbox.read().await.clone()
    }

    pub async fn last_sent_to(&self, recipient: &EmailAddress) -> Option<SentEmail> {
        self.outbox
            .read()
            .await
            .iter()
            .rev()
            .find(|email| &email.recipient == recipient)
            .cloned()
    }
}

#[async_trait::async_trait]
impl EmailClient for MockEmailClient {
    async fn send_email(
        &self,
        recipient: &EmailAddress,
        subject: &str,
        content: &str,
    ) -> Result<(), String> {
        self.outbox.write().await.push(SentEmail {
            recipient: recipient.clone(),
            subject: subject.to_string(),
            content: content.to_string(),
        });
        Ok(())
    }
}

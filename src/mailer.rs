use crate::config::Config;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

/// Outbound transactional email transport.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<()>;
}

/// Posts `{from, to, subject, html}` to the provider's transactional
/// endpoint with a bearer key. Provider error bodies are logged here and
/// never travel further than this module.
pub struct HttpMailer {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn from_config(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(20))
            .build()
            .expect("Failed to create HTTP client for the mail provider");

        Self {
            client,
            api_url: config.email_api_url.clone(),
            api_key: config.email_api_key.clone(),
            from: config.email_from.clone(),
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<()> {
        let body = json!({
            "from": self.from,
            "to": to,
            "subject": subject,
            "html": html,
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            tracing::error!(%status, detail = %detail, "mail provider rejected the message");
            return Err(Error::Provider(format!("status {}", status)));
        }

        Ok(())
    }
}

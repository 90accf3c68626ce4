use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::sinks::Notifier;

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends messages through the Telegram bot API.
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
}

impl TelegramNotifier {
    pub fn new(api_base: impl Into<String>, bot_token: impl Into<String>) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| crate::Error::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_base: api_base.into(),
            bot_token: bot_token.into(),
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str, destination: &str) -> crate::Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);
        let payload = json!({ "chat_id": destination, "text": text });
        self.client
            .post(&url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| crate::Error::Notify(format!("send to {destination} failed: {e}")))?;
        info!("Sent alert to chat {destination}");
        Ok(())
    }
}

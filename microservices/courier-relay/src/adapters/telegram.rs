//! Telegram Bot API notifier for the operator channel

use async_trait::async_trait;
use serde_json::json;

use super::{AdapterError, AdapterResult, Notifier};

pub struct TelegramNotifier {
    bot_token: String,
    chat_id: String,
    http_client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            bot_token,
            chat_id,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) -> AdapterResult<()> {
        let payload = json!({
            "chat_id": self.chat_id,
            "text": text,
        });

        let response = self
            .http_client
            .post(format!(
                "https://api.telegram.org/bot{}/sendMessage",
                self.bot_token
            ))
            .json(&payload)
            .send()
            .await
            .map_err(|e| AdapterError::Network(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(AdapterError::Upstream(error_text))
        }
    }
}

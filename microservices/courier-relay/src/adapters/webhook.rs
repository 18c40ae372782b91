//! Automation-webhook delivery adapter
//!
//! The downstream automation service accepts a JSON POST with `Phone` and
//! `Message` keys; voice finalizations add an `AudioUrl` field.

use async_trait::async_trait;
use serde_json::json;

use super::{AdapterError, AdapterResult, Delivery};

pub struct WebhookDelivery {
    webhook_url: String,
    http_client: reqwest::Client,
}

impl WebhookDelivery {
    pub fn new(webhook_url: String) -> Self {
        Self {
            webhook_url,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Delivery for WebhookDelivery {
    async fn deliver(&self, phone: &str, text: &str, audio_url: Option<&str>) -> AdapterResult<()> {
        let mut payload = json!({
            "Phone": phone,
            "Message": text,
        });
        if let Some(url) = audio_url {
            payload["AudioUrl"] = json!(url);
        }

        let response = self
            .http_client
            .post(&self.webhook_url)
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

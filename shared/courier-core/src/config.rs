//! Configuration management for the relay

use crate::error::{CourierError, Result};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    pub http_bind: String,
    pub bot_token: String,
    pub operator_chat_id: String,
    pub delivery_webhook_url: String,
    pub contact_source_url: String,
    pub synthesis_url: String,
    pub synthesis_api_key: String,
    pub storage_upload_url: String,
    pub refresh_interval_secs: u64,
    pub dedup_window_secs: u64,
    pub log_level: String,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            http_bind: env::var("HTTP_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            bot_token: env::var("BOT_TOKEN")
                .map_err(|_| CourierError::Config("BOT_TOKEN is required".to_string()))?,
            operator_chat_id: env::var("OPERATOR_CHAT_ID")
                .map_err(|_| CourierError::Config("OPERATOR_CHAT_ID is required".to_string()))?,
            delivery_webhook_url: env::var("DELIVERY_WEBHOOK_URL")
                .map_err(|_| CourierError::Config("DELIVERY_WEBHOOK_URL is required".to_string()))?,
            contact_source_url: env::var("CONTACT_SOURCE_URL")
                .map_err(|_| CourierError::Config("CONTACT_SOURCE_URL is required".to_string()))?,
            synthesis_url: env::var("SYNTHESIS_URL").unwrap_or_default(),
            synthesis_api_key: env::var("SYNTHESIS_API_KEY").unwrap_or_default(),
            storage_upload_url: env::var("STORAGE_UPLOAD_URL").unwrap_or_default(),
            refresh_interval_secs: env::var("REFRESH_INTERVAL_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .map_err(|e| CourierError::Config(format!("Invalid REFRESH_INTERVAL_SECS: {}", e)))?,
            dedup_window_secs: env::var("DEDUP_WINDOW_SECS")
                .unwrap_or_else(|_| "600".to_string())
                .parse()
                .map_err(|e| CourierError::Config(format!("Invalid DEDUP_WINDOW_SECS: {}", e)))?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

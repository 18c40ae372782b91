//! Voice synthesis adapter

use async_trait::async_trait;
use serde_json::json;

use super::{AdapterError, AdapterResult, Synthesizer};
use crate::model::AudioArtifact;

pub struct HttpSynthesizer {
    synthesis_url: String,
    api_key: String,
    http_client: reqwest::Client,
}

impl HttpSynthesizer {
    pub fn new(synthesis_url: String, api_key: String) -> Self {
        Self {
            synthesis_url,
            api_key,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Synthesizer for HttpSynthesizer {
    async fn synthesize(&self, text: &str) -> AdapterResult<AudioArtifact> {
        let response = self
            .http_client
            .post(&self.synthesis_url)
            .header("xi-api-key", &self.api_key)
            .json(&json!({ "text": text }))
            .send()
            .await
            .map_err(|e| AdapterError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AdapterError::Upstream(error_text));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("audio/mpeg")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AdapterError::Network(e.to_string()))?;

        Ok(AudioArtifact {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

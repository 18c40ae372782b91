//! Audio hosting adapter for finalized voice drafts

use async_trait::async_trait;

use super::{AdapterError, AdapterResult, ArtifactStorage};
use crate::model::AudioArtifact;

pub struct HttpArtifactStorage {
    upload_url: String,
    http_client: reqwest::Client,
}

impl HttpArtifactStorage {
    pub fn new(upload_url: String) -> Self {
        Self {
            upload_url,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ArtifactStorage for HttpArtifactStorage {
    async fn upload(&self, audio: &AudioArtifact) -> AdapterResult<String> {
        let response = self
            .http_client
            .put(&self.upload_url)
            .header(reqwest::header::CONTENT_TYPE, &audio.content_type)
            .body(audio.bytes.clone())
            .send()
            .await
            .map_err(|e| AdapterError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AdapterError::Upstream(error_text));
        }

        // The host replies with the public URL of the stored file
        let url = response
            .text()
            .await
            .map_err(|e| AdapterError::Parse(e.to_string()))?;
        let url = url.trim().to_string();
        if url.is_empty() {
            return Err(AdapterError::Upstream("empty upload response".to_string()));
        }
        Ok(url)
    }
}

//! Tabular backend contact source
//!
//! Fetches the full contact sheet as JSON rows. A failed fetch skips the
//! refresh cycle; row-level validation happens later in the directory.

use async_trait::async_trait;

use super::{AdapterError, AdapterResult, ContactSource};
use crate::model::RawContactRecord;

pub struct SheetContactSource {
    source_url: String,
    http_client: reqwest::Client,
}

impl SheetContactSource {
    pub fn new(source_url: String) -> Self {
        Self {
            source_url,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ContactSource for SheetContactSource {
    async fn fetch_all(&self) -> AdapterResult<Vec<RawContactRecord>> {
        let response = self
            .http_client
            .get(&self.source_url)
            .send()
            .await
            .map_err(|e| AdapterError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AdapterError::Upstream(error_text));
        }

        response
            .json::<Vec<RawContactRecord>>()
            .await
            .map_err(|e| AdapterError::Parse(e.to_string()))
    }
}

//! External collaborator traits and implementations

pub mod sheets;
pub mod storage;
pub mod telegram;
pub mod voice;
pub mod webhook;

use async_trait::async_trait;

use crate::model::{AudioArtifact, RawContactRecord};

/// Result of adapter operations
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Adapter errors
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Tabular backend the contact directory refreshes from
#[async_trait]
pub trait ContactSource: Send + Sync {
    async fn fetch_all(&self) -> AdapterResult<Vec<RawContactRecord>>;
}

/// Voice synthesis provider
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> AdapterResult<AudioArtifact>;
}

/// Audio hosting for finalized drafts
#[async_trait]
pub trait ArtifactStorage: Send + Sync {
    /// Upload the artifact, returning a public URL for delivery payloads
    async fn upload(&self, audio: &AudioArtifact) -> AdapterResult<String>;
}

/// Outbound delivery webhook (plain text or voice finalization)
#[async_trait]
pub trait Delivery: Send + Sync {
    async fn deliver(&self, phone: &str, text: &str, audio_url: Option<&str>) -> AdapterResult<()>;
}

/// Operator notification channel, best-effort
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> AdapterResult<()>;
}

/// Re-export adapters
pub use sheets::SheetContactSource;
pub use storage::HttpArtifactStorage;
pub use telegram::TelegramNotifier;
pub use voice::HttpSynthesizer;
pub use webhook::WebhookDelivery;

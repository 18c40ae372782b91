//! Domain model for the relay: contacts, inbound messages, voice drafts

use serde::{Deserialize, Serialize};

/// One directory entry per message recipient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: u64,
    pub display_name: String,
    pub phone: String,
    pub engagement_score: Option<f64>,
    pub note: Option<String>,
    pub intent: String,
    pub duration_days: u32,
    pub status_tag: String,
}

/// Raw row fetched from the tabular backend, before validation.
///
/// `id` and `phone` are required; a row missing either is skipped during
/// refresh, never fatal for the whole batch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawContactRecord {
    pub id: Option<u64>,
    #[serde(default)]
    pub display_name: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub engagement_score: Option<f64>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub duration_days: Option<u32>,
    #[serde(default)]
    pub status_tag: Option<String>,
}

impl RawContactRecord {
    /// Validate the raw row into a `Contact`, or explain why it was skipped.
    pub fn into_contact(self) -> Result<Contact, String> {
        let id = self.id.ok_or("missing id")?;
        let phone = self.phone.filter(|p| !p.trim().is_empty()).ok_or("missing phone")?;
        Ok(Contact {
            id,
            display_name: self.display_name.unwrap_or_else(|| format!("ID {}", id)),
            phone,
            engagement_score: self.engagement_score,
            note: self.note,
            intent: self.intent.unwrap_or_default(),
            duration_days: self.duration_days.unwrap_or(0),
            status_tag: self.status_tag.unwrap_or_default(),
        })
    }
}

/// Normalized inbound chat message, transport details already stripped.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Opaque identifier used by the dedup filter
    pub id: String,
    pub text: String,
    pub sender_is_automated: bool,
}

/// Synthesized audio bytes plus the content type the provider reported
#[derive(Debug, Clone)]
pub struct AudioArtifact {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// The single in-flight synthesized-audio draft awaiting confirmation
#[derive(Debug, Clone)]
pub struct VoiceDraft {
    pub recipient_id: Option<u64>,
    pub source_text: String,
    pub audio: AudioArtifact,
}

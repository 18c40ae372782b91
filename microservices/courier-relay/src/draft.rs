//! Voice Draft Store - the single in-flight preview slot

use parking_lot::Mutex;
use std::sync::Arc;

use crate::model::{AudioArtifact, VoiceDraft};

/// Holds at most one synthesized-audio draft awaiting confirmation.
/// A new trigger overwrites any unresolved draft (last trigger wins).
#[derive(Clone, Default)]
pub struct VoiceDraftStore {
    slot: Arc<Mutex<Option<VoiceDraft>>>,
}

impl VoiceDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new draft, superseding any pending one.
    pub fn begin(&self, recipient_id: Option<u64>, source_text: String, audio: AudioArtifact) {
        *self.slot.lock() = Some(VoiceDraft {
            recipient_id,
            source_text,
            audio,
        });
    }

    pub fn has_pending(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Replace the pending draft's audio. Returns false if nothing is pending.
    pub fn regenerate(&self, audio: AudioArtifact) -> bool {
        match self.slot.lock().as_mut() {
            Some(draft) => {
                draft.audio = audio;
                true
            }
            None => false,
        }
    }

    /// Take the pending draft out for finalization, clearing the slot.
    pub fn resolve_and_clear(&self) -> Option<VoiceDraft> {
        self.slot.lock().take()
    }

    /// Discard the pending draft without acting on it.
    pub fn clear(&self) {
        *self.slot.lock() = None;
    }

    /// Source text of the pending draft, for regeneration.
    pub fn pending_source_text(&self) -> Option<String> {
        self.slot.lock().as_ref().map(|d| d.source_text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio(tag: &str) -> AudioArtifact {
        AudioArtifact {
            bytes: tag.as_bytes().to_vec(),
            content_type: "audio/mpeg".to_string(),
        }
    }

    #[test]
    fn test_begin_overwrites_pending_draft() {
        let store = VoiceDraftStore::new();
        store.begin(Some(1), "first".to_string(), audio("a"));
        store.begin(Some(2), "second".to_string(), audio("b"));

        let draft = store.resolve_and_clear().unwrap();
        assert_eq!(draft.recipient_id, Some(2));
        assert_eq!(draft.source_text, "second");
        assert!(!store.has_pending());
    }

    #[test]
    fn test_regenerate_requires_pending_draft() {
        let store = VoiceDraftStore::new();
        assert!(!store.regenerate(audio("x")));

        store.begin(None, "hello".to_string(), audio("a"));
        assert!(store.regenerate(audio("b")));

        let draft = store.resolve_and_clear().unwrap();
        assert_eq!(draft.audio.bytes, b"b");
    }

    #[test]
    fn test_resolve_and_clear_empties_slot() {
        let store = VoiceDraftStore::new();
        store.begin(Some(42), "hello there".to_string(), audio("a"));

        assert!(store.resolve_and_clear().is_some());
        assert!(store.resolve_and_clear().is_none());
    }

    #[test]
    fn test_clear_discards() {
        let store = VoiceDraftStore::new();
        store.begin(None, "hello".to_string(), audio("a"));
        store.clear();
        assert!(!store.has_pending());
    }
}

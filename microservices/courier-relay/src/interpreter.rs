//! Message Interpreter - classifies one inbound chat message into exactly
//! one action and executes it
//!
//! Classification runs in a fixed precedence order (first match wins):
//! confirmation tokens, voice trigger, smart substitution, listing and
//! note-mode commands, then the default id-addressed forward. Each message
//! produces exactly one operator notice and at most one delivery call;
//! failures travel as `CourierError` and are rendered into that notice.

use parking_lot::Mutex;
use rand::seq::SliceRandom;
use regex::Regex;
use std::sync::Arc;
use tracing::{info, warn};

use courier_core::{CourierError, Result};

use crate::adapters::{ArtifactStorage, Delivery, Notifier, Synthesizer};
use crate::directory::ContactDirectory;
use crate::draft::VoiceDraftStore;
use crate::engagement;
use crate::model::Contact;
use crate::substitution::{Expansion, SubstitutionTable};

/// Marker splitting a voice-trigger message into recipient prefix and the
/// text to synthesize, e.g. `42 v/hello there`. Only honored at a token
/// boundary so ordinary words containing `v/` do not trigger.
const VOICE_MARKER: &str = "v/";

const SEND_TOKENS: &[&str] = &["yes", "send", "send it", "perfect", "ok", "go"];
const REGENERATE_TOKENS: &[&str] = &["no", "another", "more", "again", "regenerate"];
const CANCEL_TOKENS: &[&str] = &["cancel"];

const NOTE_ACK_PHRASES: &[&str] = &["Noted for", "Saved for", "Logged for", "Diary updated for"];

/// One classified inbound message. Evaluated strictly in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ConfirmSend,
    ConfirmRegenerate,
    Cancel,
    /// Confirmation token with no draft pending and note-mode unarmed
    NothingPending,
    VoiceTrigger {
        recipient_id: Option<u64>,
        text: String,
    },
    /// Smart-substitution hit an unresolvable placeholder
    SubstitutionFailure(String),
    ListSubstitutions,
    ListDiary,
    EnterNoteMode,
    /// Note-mode follow-up, still unparsed
    NoteUpdate {
        raw: String,
    },
    ListContacts,
    /// Fallback `<id> <text>` forward, still unparsed
    DefaultForward {
        raw: String,
    },
}

pub struct Interpreter {
    directory: ContactDirectory,
    drafts: VoiceDraftStore,
    substitutions: SubstitutionTable,
    awaiting_note_target: Mutex<bool>,
    leading_id: Regex,
    synthesizer: Arc<dyn Synthesizer>,
    storage: Arc<dyn ArtifactStorage>,
    delivery: Arc<dyn Delivery>,
    notifier: Arc<dyn Notifier>,
}

impl Interpreter {
    pub fn new(
        directory: ContactDirectory,
        drafts: VoiceDraftStore,
        synthesizer: Arc<dyn Synthesizer>,
        storage: Arc<dyn ArtifactStorage>,
        delivery: Arc<dyn Delivery>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            directory,
            drafts,
            substitutions: SubstitutionTable::new(),
            awaiting_note_target: Mutex::new(false),
            // Id must be separated from the trailing text by whitespace;
            // "12abc" is a parse failure, not id=12 text="abc".
            leading_id: Regex::new(r"^(\d+)\s+(\S(?s:.*))$").expect("static leading-id pattern"),
            synthesizer,
            storage,
            delivery,
            notifier,
        }
    }

    /// Handle one deduplicated inbound message end to end. Every path,
    /// success or failure, ends in exactly one operator notice.
    pub async fn handle(&self, text: &str) {
        let command = self.classify(text);
        info!(?command, "Classified inbound message");

        let notice = match self.execute(command).await {
            Ok(notice) => notice,
            Err(e) => Self::render_failure(&e),
        };
        self.notify(&notice).await;
    }

    async fn execute(&self, command: Command) -> Result<String> {
        match command {
            Command::ConfirmSend => self.finalize_draft().await,
            Command::ConfirmRegenerate => self.regenerate_draft().await,
            Command::Cancel => {
                self.drafts.clear();
                Ok("Draft discarded.".to_string())
            }
            Command::NothingPending => Err(CourierError::NoPendingDraft),
            Command::VoiceTrigger { recipient_id, text } => {
                self.begin_draft(recipient_id, &text).await
            }
            Command::SubstitutionFailure(token) => Err(CourierError::UnknownPlaceholder(token)),
            Command::ListSubstitutions => Ok(self.substitutions.render_listing()),
            Command::ListDiary => Ok(self.render_diary()),
            Command::EnterNoteMode => {
                *self.awaiting_note_target.lock() = true;
                Ok("Note mode. Send \"<id> <note text>\".".to_string())
            }
            Command::NoteUpdate { raw } => self.apply_note(&raw).await,
            Command::ListContacts => Ok(self.render_contacts()),
            Command::DefaultForward { raw } => self.forward(&raw).await,
        }
    }

    /// One operator-facing line per failure kind.
    fn render_failure(error: &CourierError) -> String {
        match error {
            CourierError::NoPendingDraft => "Nothing is pending confirmation.".to_string(),
            CourierError::UnknownPlaceholder(token) => format!("Failed: cannot find [{}]", token),
            CourierError::NotFound(what) => format!("{} not found.", what),
            CourierError::ParseFailure(expected) => {
                format!("Could not extract {}, try again.", expected)
            }
            CourierError::Upstream(detail) => detail.clone(),
            other => other.to_string(),
        }
    }

    /// Classify one message. Pure except for reading the two mode latches.
    fn classify(&self, text: &str) -> Command {
        let trimmed = text.trim();
        let lower = trimmed.to_lowercase();

        // 1. Confirmation tokens. They consume the input only while a voice
        // draft is pending; otherwise note-mode (if armed) claims it, and
        // failing that the operator gets a "nothing pending" notice.
        if let Some(command) = Self::confirmation(&lower) {
            if self.drafts.has_pending() {
                return command;
            }
            if !*self.awaiting_note_target.lock() {
                return Command::NothingPending;
            }
        }

        // 2. Voice trigger marker
        if let Some(index) = Self::find_voice_marker(trimmed) {
            let prefix = &trimmed[..index];
            let source = trimmed[index + VOICE_MARKER.len()..].trim();
            return Command::VoiceTrigger {
                recipient_id: Self::leading_digits(prefix),
                text: source.to_string(),
            };
        }

        // 3. Smart substitution, all-or-nothing
        let expanded = match self.substitutions.expand(trimmed) {
            Expansion::Unchanged => trimmed.to_string(),
            Expansion::Expanded(text) => text,
            Expansion::UnknownToken(token) => return Command::SubstitutionFailure(token),
        };
        let lower = expanded.to_lowercase();

        // 4-6. Listing and note-mode commands
        match lower.as_str() {
            "/shortcuts" => return Command::ListSubstitutions,
            "/notes" => return Command::ListDiary,
            "/note" => return Command::EnterNoteMode,
            _ => {}
        }

        // 7. An armed note mode claims whatever comes next
        if *self.awaiting_note_target.lock() {
            return Command::NoteUpdate { raw: expanded };
        }

        // 8. Contact listing
        if lower == "/contacts" {
            return Command::ListContacts;
        }

        // 9. Default id-addressed forward
        Command::DefaultForward { raw: expanded }
    }

    fn confirmation(lower: &str) -> Option<Command> {
        if SEND_TOKENS.contains(&lower) {
            Some(Command::ConfirmSend)
        } else if REGENERATE_TOKENS.contains(&lower) {
            Some(Command::ConfirmRegenerate)
        } else if CANCEL_TOKENS.contains(&lower) {
            Some(Command::Cancel)
        } else {
            None
        }
    }

    /// First occurrence of the voice marker at a token boundary: start of
    /// the message or preceded by whitespace.
    fn find_voice_marker(text: &str) -> Option<usize> {
        let mut search_from = 0;
        while let Some(pos) = text[search_from..].find(VOICE_MARKER) {
            let index = search_from + pos;
            let at_boundary = index == 0
                || text[..index]
                    .chars()
                    .next_back()
                    .is_some_and(|c| c.is_whitespace());
            if at_boundary {
                return Some(index);
            }
            search_from = index + VOICE_MARKER.len();
        }
        None
    }

    /// Best-effort leading digit run from a voice-trigger prefix.
    fn leading_digits(prefix: &str) -> Option<u64> {
        let trimmed = prefix.trim();
        let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    }

    /// Strict `<id> <text>` split used by the note and forward rules.
    fn parse_leading_id<'a>(&self, text: &'a str) -> Option<(u64, &'a str)> {
        let captures = self.leading_id.captures(text.trim())?;
        let id = captures.get(1)?.as_str().parse().ok()?;
        let rest = captures.get(2)?.as_str().trim();
        Some((id, rest))
    }

    async fn begin_draft(&self, recipient_id: Option<u64>, text: &str) -> Result<String> {
        let audio = self
            .synthesizer
            .synthesize(text)
            .await
            .map_err(|e| CourierError::Upstream(format!("Voice synthesis failed: {}", e)))?;

        self.drafts.begin(recipient_id, text.to_string(), audio);
        let target = match recipient_id.and_then(|id| self.directory.find_by_id(id)) {
            Some(contact) => contact.display_name.clone(),
            None => match recipient_id {
                Some(id) => format!("ID {}", id),
                None => "no recipient".to_string(),
            },
        };
        Ok(format!(
            "Voice preview ready ({}): \"{}\"\nReply send / another / cancel.",
            target, text
        ))
    }

    async fn regenerate_draft(&self) -> Result<String> {
        let source_text = self
            .drafts
            .pending_source_text()
            .ok_or(CourierError::NoPendingDraft)?;

        let audio = self
            .synthesizer
            .synthesize(&source_text)
            .await
            .map_err(|e| CourierError::Upstream(format!("Voice synthesis failed: {}", e)))?;

        // The slot may have been cleared while the provider ran
        if self.drafts.regenerate(audio) {
            Ok(format!(
                "New voice preview ready: \"{}\"\nReply send / another / cancel.",
                source_text
            ))
        } else {
            Err(CourierError::NoPendingDraft)
        }
    }

    async fn finalize_draft(&self) -> Result<String> {
        let draft = self
            .drafts
            .resolve_and_clear()
            .ok_or(CourierError::NoPendingDraft)?;

        let contact = draft
            .recipient_id
            .and_then(|id| self.directory.find_by_id(id))
            .ok_or_else(|| CourierError::NotFound("Draft recipient".to_string()))?;

        let url = self
            .storage
            .upload(&draft.audio)
            .await
            .map_err(|e| CourierError::Upstream(format!("Audio upload failed: {}", e)))?;

        self.delivery
            .deliver(&contact.phone, &draft.source_text, Some(&url))
            .await
            .map_err(|e| CourierError::Upstream(format!("Delivery failed: {}", e)))?;

        Ok(format!("Voice message sent to {}.", contact.display_name))
    }

    async fn apply_note(&self, raw: &str) -> Result<String> {
        // Parse failure leaves the mode armed so the operator can retry
        let (id, note) = self
            .parse_leading_id(raw)
            .ok_or_else(|| CourierError::ParseFailure("\"<id> <note text>\"".to_string()))?;

        *self.awaiting_note_target.lock() = false;

        let name = match self.directory.find_by_id(id) {
            Some(contact) => contact.display_name.clone(),
            None => format!("ID {}", id),
        };
        if !self.directory.update_note(id, note) {
            warn!(id, "Note target not present in directory");
        }

        let phrase = NOTE_ACK_PHRASES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or("Noted for");
        Ok(format!("{} {}", phrase, name))
    }

    async fn forward(&self, raw: &str) -> Result<String> {
        let (id, text) = self
            .parse_leading_id(raw)
            .ok_or_else(|| CourierError::ParseFailure("\"<id> <message>\"".to_string()))?;

        let contact = self
            .directory
            .find_by_id(id)
            .ok_or_else(|| CourierError::NotFound(format!("Contact {}", id)))?;

        self.delivery
            .deliver(&contact.phone, text, None)
            .await
            .map_err(|e| CourierError::Upstream(format!("Delivery failed: {}", e)))?;

        Ok(format!("Forwarded to {}.", contact.display_name))
    }

    fn render_diary(&self) -> String {
        let contacts = self.directory.all_by_id_desc();
        if contacts.is_empty() {
            return "Directory is empty.".to_string();
        }
        let mut output = String::new();
        for contact in contacts {
            output.push_str(&format!(
                "{} {} | {} | {}\n",
                Self::symbol(&contact),
                contact.id,
                contact.display_name,
                contact.note.as_deref().unwrap_or("empty"),
            ));
        }
        output
    }

    fn render_contacts(&self) -> String {
        let contacts = self.directory.all_by_id_desc();
        if contacts.is_empty() {
            return "Directory is empty.".to_string();
        }
        let mut output = String::new();
        for contact in contacts {
            output.push_str(&format!(
                "{} {} | {} | {} | {} days\n",
                Self::symbol(&contact),
                contact.id,
                contact.display_name,
                contact.intent,
                contact.duration_days,
            ));
        }
        output
    }

    fn symbol(contact: &Contact) -> &'static str {
        engagement::classify(contact.engagement_score).glyph()
    }

    /// Operator channel is best-effort; failures are logged, never escalated.
    async fn notify(&self, text: &str) {
        if let Err(e) = self.notifier.notify(text).await {
            warn!(error = %e, "Operator notification failed");
        }
    }

    #[cfg(test)]
    fn note_mode_armed(&self) -> bool {
        *self.awaiting_note_target.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{AdapterError, AdapterResult};
    use crate::model::{AudioArtifact, RawContactRecord};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Records every collaborator call; failure modes are switchable.
    #[derive(Default)]
    struct MockCollaborators {
        notices: Mutex<Vec<String>>,
        deliveries: Mutex<Vec<(String, String, Option<String>)>>,
        synth_calls: Mutex<Vec<String>>,
        uploads: Mutex<Vec<usize>>,
        fail_synthesis: AtomicBool,
        fail_delivery: AtomicBool,
    }

    impl MockCollaborators {
        fn notices(&self) -> Vec<String> {
            self.notices.lock().clone()
        }

        fn deliveries(&self) -> Vec<(String, String, Option<String>)> {
            self.deliveries.lock().clone()
        }

        fn synth_calls(&self) -> Vec<String> {
            self.synth_calls.lock().clone()
        }
    }

    #[async_trait]
    impl Synthesizer for MockCollaborators {
        async fn synthesize(&self, text: &str) -> AdapterResult<AudioArtifact> {
            self.synth_calls.lock().push(text.to_string());
            if self.fail_synthesis.load(Ordering::SeqCst) {
                return Err(AdapterError::Upstream("synth down".to_string()));
            }
            Ok(AudioArtifact {
                bytes: text.as_bytes().to_vec(),
                content_type: "audio/mpeg".to_string(),
            })
        }
    }

    #[async_trait]
    impl ArtifactStorage for MockCollaborators {
        async fn upload(&self, audio: &AudioArtifact) -> AdapterResult<String> {
            self.uploads.lock().push(audio.bytes.len());
            Ok("https://files.example/audio.mp3".to_string())
        }
    }

    #[async_trait]
    impl Delivery for MockCollaborators {
        async fn deliver(
            &self,
            phone: &str,
            text: &str,
            audio_url: Option<&str>,
        ) -> AdapterResult<()> {
            if self.fail_delivery.load(Ordering::SeqCst) {
                return Err(AdapterError::Network("webhook down".to_string()));
            }
            self.deliveries.lock().push((
                phone.to_string(),
                text.to_string(),
                audio_url.map(str::to_string),
            ));
            Ok(())
        }
    }

    #[async_trait]
    impl Notifier for MockCollaborators {
        async fn notify(&self, text: &str) -> AdapterResult<()> {
            self.notices.lock().push(text.to_string());
            Ok(())
        }
    }

    fn contact(id: u64, name: &str, phone: &str) -> RawContactRecord {
        RawContactRecord {
            id: Some(id),
            display_name: Some(name.to_string()),
            phone: Some(phone.to_string()),
            ..Default::default()
        }
    }

    fn setup(records: Vec<RawContactRecord>) -> (Interpreter, Arc<MockCollaborators>) {
        let directory = ContactDirectory::new();
        directory.replace_all(records);
        let mocks = Arc::new(MockCollaborators::default());
        let interpreter = Interpreter::new(
            directory,
            VoiceDraftStore::new(),
            mocks.clone(),
            mocks.clone(),
            mocks.clone(),
            mocks.clone(),
        );
        (interpreter, mocks)
    }

    #[tokio::test]
    async fn test_default_forward() {
        let (interpreter, mocks) = setup(vec![contact(17, "Maya", "555-0101")]);

        interpreter.handle("17 running late").await;

        assert_eq!(
            mocks.deliveries(),
            vec![("555-0101".to_string(), "running late".to_string(), None)]
        );
        assert_eq!(mocks.notices(), vec!["Forwarded to Maya.".to_string()]);
    }

    #[tokio::test]
    async fn test_forward_unknown_contact() {
        let (interpreter, mocks) = setup(vec![]);

        interpreter.handle("17 running late").await;

        assert!(mocks.deliveries().is_empty());
        assert_eq!(mocks.notices(), vec!["Contact 17 not found.".to_string()]);
    }

    #[tokio::test]
    async fn test_digits_glued_to_text_is_a_parse_failure() {
        let (interpreter, mocks) = setup(vec![contact(12, "Ana", "555-0012")]);

        interpreter.handle("12abc").await;

        assert!(mocks.deliveries().is_empty());
        assert_eq!(mocks.notices().len(), 1);
        assert!(mocks.notices()[0].contains("Could not extract"));
    }

    #[tokio::test]
    async fn test_voice_flow_trigger_confirm_then_nothing_pending() {
        let (interpreter, mocks) = setup(vec![contact(42, "Iris", "555-0042")]);

        interpreter.handle("42 v/hello there").await;
        assert_eq!(mocks.synth_calls(), vec!["hello there".to_string()]);
        assert!(mocks.notices()[0].contains("Voice preview ready"));
        assert!(mocks.deliveries().is_empty());

        interpreter.handle("yes").await;
        let deliveries = mocks.deliveries();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].0, "555-0042");
        assert_eq!(deliveries[0].1, "hello there");
        assert!(deliveries[0].2.is_some());

        interpreter.handle("yes").await;
        assert_eq!(mocks.deliveries().len(), 1);
        assert_eq!(
            mocks.notices().last().unwrap(),
            "Nothing is pending confirmation."
        );
    }

    #[tokio::test]
    async fn test_voice_regenerate_replaces_audio() {
        let (interpreter, mocks) = setup(vec![contact(42, "Iris", "555-0042")]);

        interpreter.handle("42 v/hello there").await;
        interpreter.handle("another").await;

        assert_eq!(
            mocks.synth_calls(),
            vec!["hello there".to_string(), "hello there".to_string()]
        );
        assert!(mocks.notices().last().unwrap().contains("New voice preview"));

        interpreter.handle("cancel").await;
        assert_eq!(mocks.notices().last().unwrap(), "Draft discarded.");
        assert!(mocks.deliveries().is_empty());
    }

    #[tokio::test]
    async fn test_new_trigger_supersedes_pending_draft() {
        let (interpreter, mocks) = setup(vec![
            contact(1, "Ada", "555-0001"),
            contact(2, "Grace", "555-0002"),
        ]);

        interpreter.handle("1 v/first take").await;
        interpreter.handle("2 v/second take").await;
        interpreter.handle("send").await;

        let deliveries = mocks.deliveries();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].0, "555-0002");
        assert_eq!(deliveries[0].1, "second take");
    }

    #[tokio::test]
    async fn test_voice_trigger_without_resolvable_recipient() {
        let (interpreter, mocks) = setup(vec![]);

        interpreter.handle("v/hello out there").await;
        assert!(mocks.notices()[0].contains("no recipient"));

        // Finalization cannot address anyone, the draft is discarded
        interpreter.handle("yes").await;
        assert!(mocks.deliveries().is_empty());
        assert!(mocks.notices().last().unwrap().contains("Draft recipient"));
    }

    #[tokio::test]
    async fn test_marker_inside_a_word_is_not_a_trigger() {
        let (interpreter, mocks) = setup(vec![contact(17, "Maya", "555-0101")]);

        interpreter.handle("17 tv/series tonight").await;

        assert!(mocks.synth_calls().is_empty());
        assert_eq!(
            mocks.deliveries(),
            vec![(
                "555-0101".to_string(),
                "tv/series tonight".to_string(),
                None
            )]
        );
    }

    #[tokio::test]
    async fn test_synthesis_failure_discards_attempt() {
        let (interpreter, mocks) = setup(vec![contact(42, "Iris", "555-0042")]);
        mocks.fail_synthesis.store(true, Ordering::SeqCst);

        interpreter.handle("42 v/hello there").await;

        assert!(mocks.notices()[0].contains("Voice synthesis failed"));
        interpreter.handle("yes").await;
        assert_eq!(
            mocks.notices().last().unwrap(),
            "Nothing is pending confirmation."
        );
    }

    #[tokio::test]
    async fn test_confirmation_without_draft_reports_nothing_pending() {
        let (interpreter, mocks) = setup(vec![]);

        interpreter.handle("yes").await;

        assert_eq!(mocks.notices(), vec!["Nothing is pending confirmation.".to_string()]);
    }

    #[tokio::test]
    async fn test_substitution_failure_aborts_without_delivery() {
        let (interpreter, mocks) = setup(vec![contact(12, "Ana", "555-0012")]);

        interpreter.handle("12 [gm] and [nosuchtoken]").await;

        assert!(mocks.deliveries().is_empty());
        assert_eq!(mocks.notices(), vec!["Failed: cannot find [nosuchtoken]".to_string()]);
    }

    #[tokio::test]
    async fn test_substitution_expands_before_forwarding() {
        let (interpreter, mocks) = setup(vec![contact(12, "Ana", "555-0012")]);

        interpreter.handle("12 [gm]").await;

        let deliveries = mocks.deliveries();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].1, "Good morning, hope you slept well");
    }

    #[tokio::test]
    async fn test_note_flow() {
        let (interpreter, mocks) = setup(vec![contact(8, "Lin", "555-0008")]);

        interpreter.handle("/note").await;
        assert!(interpreter.note_mode_armed());
        assert!(mocks.notices()[0].contains("Note mode"));

        interpreter.handle("8 pays on thursdays").await;
        assert!(!interpreter.note_mode_armed());
        assert_eq!(
            interpreter.directory.find_by_id(8).unwrap().note.as_deref(),
            Some("pays on thursdays")
        );
        assert!(mocks.notices().last().unwrap().contains("Lin"));
        assert!(mocks.deliveries().is_empty());
    }

    #[tokio::test]
    async fn test_note_mode_survives_unparseable_target() {
        let (interpreter, mocks) = setup(vec![contact(8, "Lin", "555-0008")]);

        interpreter.handle("/note").await;
        interpreter.handle("no id here").await;

        assert!(interpreter.note_mode_armed());
        assert!(mocks.notices().last().unwrap().contains("try again"));
    }

    #[tokio::test]
    async fn test_note_mode_claims_confirmation_token_when_no_draft() {
        let (interpreter, mocks) = setup(vec![]);

        interpreter.handle("/note").await;
        interpreter.handle("yes").await;

        // "yes" is treated as a note target attempt, not a confirmation
        assert!(interpreter.note_mode_armed());
        assert!(mocks.notices().last().unwrap().contains("try again"));
    }

    #[tokio::test]
    async fn test_note_ack_falls_back_to_id_for_unknown_contact() {
        let (interpreter, mocks) = setup(vec![]);

        interpreter.handle("/note").await;
        interpreter.handle("99 some note").await;

        assert!(!interpreter.note_mode_armed());
        assert!(mocks.notices().last().unwrap().contains("ID 99"));
    }

    #[tokio::test]
    async fn test_diary_listing_orders_by_id_descending() {
        let (interpreter, mocks) = setup(vec![
            contact(1, "Ada", "555-0001"),
            contact(3, "Joan", "555-0003"),
        ]);
        interpreter.directory.update_note(3, "likes jazz");

        interpreter.handle("/notes").await;

        let listing = mocks.notices().pop().unwrap();
        let joan = listing.find("3 | Joan | likes jazz").unwrap();
        let ada = listing.find("1 | Ada | empty").unwrap();
        assert!(joan < ada);
    }

    #[tokio::test]
    async fn test_contact_listing_renders_intent_and_duration() {
        let (interpreter, mocks) = setup(vec![RawContactRecord {
            id: Some(5),
            display_name: Some("Vera".to_string()),
            phone: Some("555-0005".to_string()),
            engagement_score: Some(95.0),
            intent: Some("casual".to_string()),
            duration_days: Some(30),
            ..Default::default()
        }]);

        interpreter.handle("/contacts").await;

        let listing = mocks.notices().pop().unwrap();
        assert!(listing.contains("5 | Vera | casual | 30 days"));
        assert!(listing.contains('💎'));
    }

    #[tokio::test]
    async fn test_delivery_failure_produces_single_notice() {
        let (interpreter, mocks) = setup(vec![contact(17, "Maya", "555-0101")]);
        mocks.fail_delivery.store(true, Ordering::SeqCst);

        interpreter.handle("17 running late").await;

        assert_eq!(mocks.notices().len(), 1);
        assert!(mocks.notices()[0].contains("Delivery failed"));
    }
}

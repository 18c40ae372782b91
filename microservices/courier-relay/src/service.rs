//! Relay service wiring: dedup -> interpreter, directory refresh loop,
//! inbound-SMS surfacing

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use courier_core::RelayConfig;

use crate::adapters::{
    ContactSource, Delivery, HttpArtifactStorage, HttpSynthesizer, Notifier, SheetContactSource,
    TelegramNotifier, WebhookDelivery,
};
use crate::dedup::DedupFilter;
use crate::directory::ContactDirectory;
use crate::draft::VoiceDraftStore;
use crate::engagement;
use crate::interpreter::Interpreter;
use crate::model::InboundMessage;

#[derive(Clone)]
pub struct RelayService {
    directory: ContactDirectory,
    dedup: DedupFilter,
    interpreter: Arc<Interpreter>,
    source: Arc<dyn ContactSource>,
    notifier: Arc<dyn Notifier>,
    refresh_interval: Duration,
    last_refresh: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl RelayService {
    pub fn new(config: &RelayConfig) -> Self {
        let source = Arc::new(SheetContactSource::new(config.contact_source_url.clone()));
        let notifier = Arc::new(TelegramNotifier::new(
            config.bot_token.clone(),
            config.operator_chat_id.clone(),
        ));
        let synthesizer = Arc::new(HttpSynthesizer::new(
            config.synthesis_url.clone(),
            config.synthesis_api_key.clone(),
        ));
        let storage = Arc::new(HttpArtifactStorage::new(config.storage_upload_url.clone()));
        let delivery = Arc::new(WebhookDelivery::new(config.delivery_webhook_url.clone()));

        Self::with_collaborators(
            source,
            synthesizer,
            storage,
            delivery,
            notifier,
            Duration::from_secs(config.refresh_interval_secs),
            Duration::from_secs(config.dedup_window_secs),
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn with_collaborators(
        source: Arc<dyn ContactSource>,
        synthesizer: Arc<dyn crate::adapters::Synthesizer>,
        storage: Arc<dyn crate::adapters::ArtifactStorage>,
        delivery: Arc<dyn Delivery>,
        notifier: Arc<dyn Notifier>,
        refresh_interval: Duration,
        dedup_window: Duration,
    ) -> Self {
        let directory = ContactDirectory::new();
        let interpreter = Arc::new(Interpreter::new(
            directory.clone(),
            VoiceDraftStore::new(),
            synthesizer,
            storage,
            delivery,
            notifier.clone(),
        ));

        Self {
            directory,
            dedup: DedupFilter::new(dedup_window),
            interpreter,
            source,
            notifier,
            refresh_interval,
            last_refresh: Arc::new(Mutex::new(None)),
        }
    }

    pub fn directory_len(&self) -> usize {
        self.directory.len()
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.lock()
    }

    /// Handle one chat-platform message: drop automated senders, reject
    /// duplicates, then hand the text to the interpreter.
    pub async fn handle_chat_message(&self, message: InboundMessage) {
        if message.sender_is_automated {
            info!(message_id = %message.id, "Ignoring automated sender");
            return;
        }
        if self.dedup.seen(&message.id) {
            info!(message_id = %message.id, "Duplicate message suppressed");
            return;
        }
        self.interpreter.handle(&message.text).await;
    }

    /// Surface an inbound SMS (relayed by the automation service) to the
    /// operator, resolving the sender through the directory.
    pub async fn handle_inbound_sms(&self, phone: &str, text: &str) {
        let line = match self.directory.find_by_phone(phone) {
            Some(contact) => format!(
                "{} {} | {}: {}",
                engagement::classify(contact.engagement_score).glyph(),
                contact.id,
                contact.display_name,
                text
            ),
            None => format!("{}: {}", phone, text),
        };
        if let Err(e) = self.notifier.notify(&line).await {
            warn!(error = %e, "Operator notification failed");
        }
    }

    /// One refresh cycle. A fetch failure keeps the prior directory.
    pub async fn refresh_directory(&self) {
        match self.source.fetch_all().await {
            Ok(records) => {
                let fetched = records.len();
                let (inserted, skipped) = self.directory.replace_all(records);
                *self.last_refresh.lock() = Some(Utc::now());
                info!(fetched, inserted, skipped, "Contact directory refreshed");
            }
            Err(e) => {
                warn!(error = %e, "Contact fetch failed, keeping previous directory");
            }
        }
        self.dedup.purge_expired();
    }

    /// Periodic refresh task, runs for the life of the process.
    pub fn spawn_refresh_loop(&self) -> tokio::task::JoinHandle<()> {
        let service = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(service.refresh_interval);
            loop {
                ticker.tick().await;
                service.refresh_directory().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{AdapterError, AdapterResult, ArtifactStorage, Synthesizer};
    use crate::model::{AudioArtifact, RawContactRecord};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct MockBackends {
        records: Mutex<Vec<RawContactRecord>>,
        fail_fetch: AtomicBool,
        notices: Mutex<Vec<String>>,
        deliveries: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl ContactSource for MockBackends {
        async fn fetch_all(&self) -> AdapterResult<Vec<RawContactRecord>> {
            if self.fail_fetch.load(Ordering::SeqCst) {
                return Err(AdapterError::Network("source down".to_string()));
            }
            Ok(self.records.lock().clone())
        }
    }

    #[async_trait]
    impl Synthesizer for MockBackends {
        async fn synthesize(&self, text: &str) -> AdapterResult<AudioArtifact> {
            Ok(AudioArtifact {
                bytes: text.as_bytes().to_vec(),
                content_type: "audio/mpeg".to_string(),
            })
        }
    }

    #[async_trait]
    impl ArtifactStorage for MockBackends {
        async fn upload(&self, _audio: &AudioArtifact) -> AdapterResult<String> {
            Ok("https://files.example/audio.mp3".to_string())
        }
    }

    #[async_trait]
    impl Delivery for MockBackends {
        async fn deliver(
            &self,
            phone: &str,
            text: &str,
            _audio_url: Option<&str>,
        ) -> AdapterResult<()> {
            self.deliveries.lock().push((phone.to_string(), text.to_string()));
            Ok(())
        }
    }

    #[async_trait]
    impl Notifier for MockBackends {
        async fn notify(&self, text: &str) -> AdapterResult<()> {
            self.notices.lock().push(text.to_string());
            Ok(())
        }
    }

    fn record(id: u64, name: &str, phone: &str) -> RawContactRecord {
        RawContactRecord {
            id: Some(id),
            display_name: Some(name.to_string()),
            phone: Some(phone.to_string()),
            ..Default::default()
        }
    }

    fn setup() -> (RelayService, Arc<MockBackends>) {
        let mocks = Arc::new(MockBackends::default());
        let service = RelayService::with_collaborators(
            mocks.clone(),
            mocks.clone(),
            mocks.clone(),
            mocks.clone(),
            mocks.clone(),
            Duration::from_secs(300),
            Duration::from_secs(600),
        );
        (service, mocks)
    }

    fn message(id: &str, text: &str) -> InboundMessage {
        InboundMessage {
            id: id.to_string(),
            text: text.to_string(),
            sender_is_automated: false,
        }
    }

    #[tokio::test]
    async fn test_duplicate_message_yields_one_side_effect() {
        let (service, mocks) = setup();
        mocks.records.lock().push(record(17, "Maya", "555-0101"));
        service.refresh_directory().await;

        service.handle_chat_message(message("900", "17 running late")).await;
        service.handle_chat_message(message("900", "17 running late")).await;

        assert_eq!(mocks.deliveries.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_automated_sender_is_discarded() {
        let (service, mocks) = setup();

        service
            .handle_chat_message(InboundMessage {
                id: "901".to_string(),
                text: "17 hello".to_string(),
                sender_is_automated: true,
            })
            .await;

        assert!(mocks.deliveries.lock().is_empty());
        assert!(mocks.notices.lock().is_empty());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_directory() {
        let (service, mocks) = setup();
        mocks.records.lock().push(record(1, "Ada", "555-0001"));
        service.refresh_directory().await;
        assert_eq!(service.directory_len(), 1);

        mocks.fail_fetch.store(true, Ordering::SeqCst);
        service.refresh_directory().await;
        assert_eq!(service.directory_len(), 1);
    }

    #[tokio::test]
    async fn test_inbound_sms_resolves_sender_through_directory() {
        let (service, mocks) = setup();
        mocks.records.lock().push(RawContactRecord {
            engagement_score: Some(95.0),
            ..record(7, "Noor", "555-0007")
        });
        service.refresh_directory().await;

        service.handle_inbound_sms("555-0007", "see you at 8").await;
        service.handle_inbound_sms("555-9999", "who dis").await;

        let notices = mocks.notices.lock().clone();
        assert_eq!(notices[0], "💎 7 | Noor: see you at 8");
        assert_eq!(notices[1], "555-9999: who dis");
    }
}

//! Courier Relay - webhook relay between a chat platform, an automation
//! trigger service, and a tabular contact backend
//!
//! Inbound surfaces:
//! - POST /webhook/telegram  chat-platform updates (operator commands)
//! - POST /webhook/inbound   automation service relaying a received SMS
//! - POST /webhook/refresh   tabular backend change notification

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use courier_core::{
    CourierService, DependencyStatus, HealthStatus, ReadinessStatus, RelayConfig, Result,
    ServiceRuntime,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

mod adapters;
mod dedup;
mod directory;
mod draft;
mod engagement;
mod interpreter;
mod model;
mod service;
mod substitution;

use model::InboundMessage;
use service::RelayService;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("courier_relay=debug".parse().unwrap()),
        )
        .json()
        .init();

    info!("Starting Courier Relay");

    let config = RelayConfig::from_env()?;
    let service = Arc::new(RelayServiceWrapper::new(config));
    ServiceRuntime::run(service).await
}

pub struct RelayServiceWrapper {
    inner: RelayService,
    config: RelayConfig,
    start_time: std::time::Instant,
}

impl RelayServiceWrapper {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            inner: RelayService::new(&config),
            config,
            start_time: std::time::Instant::now(),
        }
    }
}

#[async_trait::async_trait]
impl CourierService for RelayServiceWrapper {
    fn service_id(&self) -> &'static str {
        "courier-relay"
    }

    async fn health(&self) -> HealthStatus {
        health_status(self.start_time)
    }

    async fn ready(&self) -> ReadinessStatus {
        readiness(&self.inner)
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Shutting down Courier Relay");
        Ok(())
    }

    async fn start(&self) -> Result<()> {
        // Prime the directory before accepting traffic, then keep it fresh
        self.inner.refresh_directory().await;
        self.inner.spawn_refresh_loop();

        info!(bind = %self.config.http_bind, "Starting relay server");

        let state = AppState {
            service: self.inner.clone(),
            started_at: self.start_time,
        };
        let app = Router::new()
            .route("/health", get(health))
            .route("/ready", get(ready))
            .route("/webhook/telegram", post(handle_telegram))
            .route("/webhook/inbound", post(handle_inbound_sms))
            .route("/webhook/refresh", post(handle_refresh))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind(&self.config.http_bind).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

#[derive(Clone)]
struct AppState {
    service: RelayService,
    started_at: std::time::Instant,
}

fn health_status(started_at: std::time::Instant) -> HealthStatus {
    HealthStatus {
        healthy: true,
        service_id: "courier-relay".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: started_at.elapsed().as_secs(),
    }
}

fn readiness(service: &RelayService) -> ReadinessStatus {
    let contacts = service.directory_len();
    ReadinessStatus {
        ready: contacts > 0,
        dependencies: vec![DependencyStatus {
            name: "contact-directory".to_string(),
            available: contacts > 0,
            latency_ms: None,
        }],
    }
}

async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(health_status(state.started_at))
}

async fn ready(State(state): State<AppState>) -> Json<ReadinessStatus> {
    Json(readiness(&state.service))
}

#[derive(Deserialize)]
struct TelegramUpdate {
    message: Option<TelegramMessage>,
}

#[derive(Deserialize)]
struct TelegramMessage {
    message_id: i64,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    from: Option<TelegramSender>,
}

#[derive(Deserialize, Default)]
struct TelegramSender {
    #[serde(default)]
    is_bot: bool,
}

async fn handle_telegram(
    State(state): State<AppState>,
    Json(update): Json<TelegramUpdate>,
) -> Json<serde_json::Value> {
    let Some(message) = update.message else {
        return Json(json!({ "status": "ignored", "reason": "no message in update" }));
    };
    let Some(text) = message.text else {
        return Json(json!({ "status": "ignored", "reason": "no text in message" }));
    };

    state
        .service
        .handle_chat_message(InboundMessage {
            id: message.message_id.to_string(),
            text,
            sender_is_automated: message.from.unwrap_or_default().is_bot,
        })
        .await;

    Json(json!({ "status": "processed" }))
}

#[derive(Deserialize)]
struct InboundSmsRequest {
    phone: String,
    message: String,
}

async fn handle_inbound_sms(
    State(state): State<AppState>,
    Json(req): Json<InboundSmsRequest>,
) -> Json<serde_json::Value> {
    state.service.handle_inbound_sms(&req.phone, &req.message).await;
    Json(json!({ "status": "relayed" }))
}

async fn handle_refresh(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.service.refresh_directory().await;
    Json(json!({
        "status": "refreshed",
        "contacts": state.service.directory_len(),
        "refreshed_at": state.service.last_refresh(),
    }))
}

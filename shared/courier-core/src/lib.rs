//! Courier Core - Shared infrastructure for the relay services
//!
//! This crate provides:
//! - Standard service trait the relay binaries implement
//! - Error handling utilities
//! - Configuration management

pub mod config;
pub mod error;
pub mod service;

pub use config::RelayConfig;
pub use error::{CourierError, Result};
pub use service::{CourierService, DependencyStatus, HealthStatus, ReadinessStatus, ServiceRuntime};

//! Shared types and configuration for Collecta.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for clients, collectors and payment records
//! - Pagination types for history listings
//! - Configuration management
//! - Tracing subscriber bootstrap

pub mod config;
pub mod telemetry;
pub mod types;

pub use config::{AppConfig, DatabaseConfig, LogFormat, LoggingConfig};

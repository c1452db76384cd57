//! Shared types, errors, and configuration for the ITC reversal engine.
//!
//! This crate provides common types used across all other crates:
//! - Named and typed identifiers for host-system records
//! - Decimal precision and rounding helpers
//! - Application-wide error types
//! - Configuration management
//! - Tracing subscriber setup

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

pub use config::EngineConfig;
pub use error::AppError;

//! Common types used across the engine.

pub mod id;
pub mod precision;

pub use id::*;
pub use precision::Precision;

//! Shared types for the booking platform
//!
//! Plain data models, the unified error type, and common value types used
//! by the core engine and by the (external) transport layer. No persistence
//! or framework code lives here.

pub mod error;
pub mod models;
pub mod types;

// Re-exports
pub use error::{AppError, AppResult};
pub use serde::{Deserialize, Serialize};

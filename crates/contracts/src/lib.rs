//! # Contracts
//!
//! Frozen interface contracts shared across the workspace: domain types,
//! the transport boundary trait, classified transport errors, and polling
//! configuration. All business crates depend only on this crate; reverse
//! dependencies are prohibited.
//!
//! ## Cursor Model
//! - Message ids double as the update cursor (`UpdateId`, i64)
//! - The cursor is owned exclusively by the updater poll loop

mod config;
mod error;
mod source;
mod types;

pub use config::{ConfigValidationError, PollingConfig};
pub use error::TransportError;
pub use source::UpdateSource;
pub use types::{Chat, FileInfo, Message, PhotoSize, Update, UpdateId, User};

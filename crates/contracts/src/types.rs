//! Domain types - wire-decoded updates consumed by handlers
//!
//! All types here are immutable after decoding; the engine never mutates an
//! `Update` on its way to a handler.

use serde::{Deserialize, Serialize};

/// Identifier assigned by the service to each message.
///
/// Ids are strictly ascending, so the id of the last dispatched update
/// doubles as the polling cursor.
pub type UpdateId = i64;

/// A conversation the bot participates in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// The author of a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
}

/// One rendition of an attached photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoSize {
    /// Opaque reference usable with `get_file` / `download_file`
    pub file_id: String,
    pub width: u32,
    pub height: u32,
    pub file_size: Option<u64>,
}

impl PhotoSize {
    /// Pixel area, used to rank renditions by quality
    pub fn pixel_area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// An inbound message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: UpdateId,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
    /// Photo renditions, largest area first
    #[serde(default)]
    pub photo: Vec<PhotoSize>,
    /// Service-side creation timestamp, passed through verbatim
    pub sent_at: Option<String>,
}

impl Message {
    /// True when the message carries a non-empty textual payload
    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// True when at least one photo rendition is attached
    pub fn has_photo(&self) -> bool {
        !self.photo.is_empty()
    }

    /// Highest-quality photo rendition, if any
    pub fn best_photo(&self) -> Option<&PhotoSize> {
        self.photo.first()
    }
}

/// One unit of work for the dispatch engine
///
/// The service exposes a plain message feed, so each message becomes its own
/// update and the message id is the update id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    pub id: UpdateId,
    pub message: Message,
}

impl Update {
    /// Wrap a decoded message, lifting its id to the update id
    pub fn from_message(message: Message) -> Self {
        Self {
            id: message.id,
            message,
        }
    }
}

/// File metadata returned by the `get-file` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub file_path: String,
    #[serde(default)]
    pub file_size: Option<u64>,
}

//! Wire-format decoding
//!
//! The service exposes a plain message feed; these raw shapes mirror its
//! JSON exactly and are converted into the contract types in one place so
//! the rest of the workspace never sees the wire layout.

use contracts::{Chat, FileInfo, Message, PhotoSize, TransportError, Update, User};
use serde::Deserialize;

/// Username substituted when the service omits or blanks the author name
const UNKNOWN_USERNAME: &str = "unknown";

#[derive(Debug, Deserialize)]
pub(crate) struct WireMessage {
    id: i64,
    chat_room_id: i64,
    #[serde(default)]
    user: Option<WireUser>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    photo: Option<Vec<WirePhoto>>,
    #[serde(default)]
    created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    #[serde(default)]
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WirePhoto {
    file_id: String,
    width: u32,
    height: u32,
    #[serde(default)]
    file_size: Option<u64>,
}

impl From<WireMessage> for Message {
    fn from(raw: WireMessage) -> Self {
        let mut photo: Vec<PhotoSize> = raw
            .photo
            .unwrap_or_default()
            .into_iter()
            .map(|p| PhotoSize {
                file_id: p.file_id,
                width: p.width,
                height: p.height,
                file_size: p.file_size,
            })
            .collect();
        // Largest rendition first so callers can grab the best quality
        photo.sort_by_key(|p| std::cmp::Reverse(p.pixel_area()));

        Message {
            id: raw.id,
            chat: Chat {
                id: raw.chat_room_id,
            },
            from: raw.user.map(|u| User {
                username: u
                    .username
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| UNKNOWN_USERNAME.to_string()),
            }),
            text: raw.text,
            photo,
            sent_at: raw.created_at,
        }
    }
}

/// Decode an update batch from the `updates/` endpoint body
pub(crate) fn decode_updates(body: &[u8]) -> Result<Vec<Update>, TransportError> {
    let raw: Vec<WireMessage> = serde_json::from_slice(body)
        .map_err(|e| TransportError::decode(format!("update batch: {e}")))?;
    Ok(raw
        .into_iter()
        .map(|msg| Update::from_message(msg.into()))
        .collect())
}

/// Decode a single message record (e.g. the `send-message` response)
pub(crate) fn decode_message(body: &[u8]) -> Result<Message, TransportError> {
    let raw: WireMessage = serde_json::from_slice(body)
        .map_err(|e| TransportError::decode(format!("message record: {e}")))?;
    Ok(raw.into())
}

/// Decode the `get-file` response
pub(crate) fn decode_file_info(body: &[u8]) -> Result<FileInfo, TransportError> {
    serde_json::from_slice(body).map_err(|e| TransportError::decode(format!("file info: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_update_batch() {
        let body = br#"[
            {"id": 101, "chat_room_id": 5, "user": {"username": "ada"},
             "text": "hello", "created_at": "2026-08-01T10:00:00Z"},
            {"id": 102, "chat_room_id": 5, "text": null}
        ]"#;
        let updates = decode_updates(body).unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].id, 101);
        assert_eq!(updates[0].message.from.as_ref().unwrap().username, "ada");
        assert_eq!(updates[0].message.text.as_deref(), Some("hello"));
        assert_eq!(updates[1].id, 102);
        assert!(updates[1].message.text.is_none());
    }

    #[test]
    fn test_decode_sorts_photos_largest_first() {
        let body = br#"[{"id": 1, "chat_room_id": 1, "photo": [
            {"file_id": "s", "width": 90, "height": 60},
            {"file_id": "l", "width": 900, "height": 600, "file_size": 4096},
            {"file_id": "m", "width": 300, "height": 200}
        ]}]"#;
        let updates = decode_updates(body).unwrap();
        let ids: Vec<&str> = updates[0]
            .message
            .photo
            .iter()
            .map(|p| p.file_id.as_str())
            .collect();
        assert_eq!(ids, vec!["l", "m", "s"]);
    }

    #[test]
    fn test_decode_missing_username_gets_placeholder() {
        let body = br#"[{"id": 1, "chat_room_id": 1, "user": {}}]"#;
        let updates = decode_updates(body).unwrap();
        assert_eq!(
            updates[0].message.from.as_ref().unwrap().username,
            UNKNOWN_USERNAME
        );
    }

    #[test]
    fn test_decode_rejects_malformed_batch() {
        let err = decode_updates(b"{\"not\": \"a list\"}").unwrap_err();
        assert!(matches!(err, TransportError::Decode { .. }));
    }

    #[test]
    fn test_decode_file_info() {
        let info = decode_file_info(br#"{"file_path": "/media/photos/a.jpg"}"#).unwrap();
        assert_eq!(info.file_path, "/media/photos/a.jpg");
        assert!(info.file_size.is_none());
    }
}

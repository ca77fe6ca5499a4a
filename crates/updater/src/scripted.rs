//! Scripted in-memory update source
//!
//! Drives the poll loop without a network: each fetch consumes the next
//! scripted step, and once the script is exhausted a bound stop handle is
//! triggered so loops wind down deterministically. Used by the integration
//! tests and the offline demo.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use contracts::{Chat, Message, PhotoSize, TransportError, Update, UpdateId, UpdateSource};

use crate::lifecycle::StopHandle;

/// One scripted fetch outcome
pub type ScriptStep = Result<Vec<Update>, TransportError>;

#[derive(Debug, Default)]
struct ScriptState {
    script: Mutex<VecDeque<ScriptStep>>,
    stop: Mutex<Option<StopHandle>>,
    fetch_cursors: Mutex<Vec<UpdateId>>,
}

/// In-memory [`UpdateSource`] fed from a fixed script
///
/// Clones share the same script; a fetch past the end of the script stops
/// the bound updater (if any) and reports an empty batch.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    state: Arc<ScriptState>,
}

impl ScriptedSource {
    /// Create a source that plays back `steps` in order
    pub fn new(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        Self {
            state: Arc::new(ScriptState {
                script: Mutex::new(steps.into_iter().collect()),
                stop: Mutex::new(None),
                fetch_cursors: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Stop this handle once the script runs out
    pub fn stop_when_exhausted(&self, handle: StopHandle) {
        *self.state.stop.lock().unwrap() = Some(handle);
    }

    /// Cursor passed to each fetch, in call order
    pub fn fetch_cursors(&self) -> Vec<UpdateId> {
        self.state.fetch_cursors.lock().unwrap().clone()
    }
}

impl UpdateSource for ScriptedSource {
    async fn fetch_updates(
        &self,
        cursor: i64,
        _timeout: Duration,
    ) -> Result<Vec<Update>, TransportError> {
        self.state.fetch_cursors.lock().unwrap().push(cursor);
        let step = self.state.script.lock().unwrap().pop_front();
        match step {
            Some(step) => step,
            None => {
                if let Some(handle) = self.state.stop.lock().unwrap().as_ref() {
                    handle.stop();
                }
                Ok(Vec::new())
            }
        }
    }
}

/// Build a text update for scripts
pub fn text_update(id: UpdateId, text: &str) -> Update {
    Update::from_message(Message {
        id,
        chat: Chat { id: 1 },
        from: None,
        text: Some(text.to_string()),
        photo: vec![],
        sent_at: None,
    })
}

/// Build a photo-only update for scripts
pub fn photo_update(id: UpdateId, file_id: &str) -> Update {
    Update::from_message(Message {
        id,
        chat: Chat { id: 1 },
        from: None,
        text: None,
        photo: vec![PhotoSize {
            file_id: file_id.to_string(),
            width: 640,
            height: 480,
            file_size: None,
        }],
        sent_at: None,
    })
}

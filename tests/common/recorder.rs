//! In-memory chat that records every outgoing call
//!
//! Behaves like the Bot API where it matters to the pipeline: message ids
//! are handed out in order, and editing a message to its current text fails
//! with "message is not modified".

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use teloxide::types::MessageId;
use vidrelay::core::TransportError;
use vidrelay::ChatTransport;

/// One call that reached the chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    SendText { id: i32, text: String },
    EditText { id: i32, text: String },
    DeleteMessage { id: i32 },
    /// `size` is the file length at upload time, `None` if the file was missing
    SendDocument { caption: String, size: Option<u64> },
}

#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<ApiCall>>,
    texts: Mutex<HashMap<i32, String>>,
    next_id: AtomicI32,
    sends: AtomicUsize,
    fail_send_index: Option<usize>,
    fail_documents: bool,
    fail_edits: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI32::new(1),
            ..Self::default()
        }
    }

    /// The n-th `send_text` call (0-based) fails.
    pub fn failing_send(mut self, index: usize) -> Self {
        self.fail_send_index = Some(index);
        self
    }

    pub fn failing_documents(mut self) -> Self {
        self.fail_documents = true;
        self
    }

    pub fn failing_edits(mut self) -> Self {
        self.fail_edits = true;
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Texts of all edits, in order.
    pub fn edits(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::EditText { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Texts of all sent messages, in order.
    pub fn sent_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::SendText { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn documents(&self) -> Vec<(String, Option<u64>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::SendDocument { caption, size } => Some((caption, size)),
                _ => None,
            })
            .collect()
    }

    pub fn deleted(&self) -> Vec<i32> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::DeleteMessage { id } => Some(id),
                _ => None,
            })
            .collect()
    }

    /// Messages that are still visible in the chat.
    pub fn visible_messages(&self) -> HashMap<i32, String> {
        self.texts.lock().unwrap().clone()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_text(&self, text: &str) -> Result<MessageId, TransportError> {
        let index = self.sends.fetch_add(1, Ordering::SeqCst);
        if self.fail_send_index == Some(index) {
            return Err(TransportError::Other("Bad Request: chat not found".to_string()));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.texts.lock().unwrap().insert(id, text.to_string());
        self.record(ApiCall::SendText {
            id,
            text: text.to_string(),
        });
        Ok(MessageId(id))
    }

    async fn edit_text(&self, message: MessageId, text: &str) -> Result<(), TransportError> {
        if self.fail_edits {
            return Err(TransportError::Other("Too Many Requests: retry after 5".to_string()));
        }

        let mut texts = self.texts.lock().unwrap();
        match texts.get(&message.0) {
            None => return Err(TransportError::Other("Bad Request: message to edit not found".to_string())),
            Some(current) if current == text => return Err(TransportError::NotModified),
            Some(_) => {}
        }
        texts.insert(message.0, text.to_string());
        drop(texts);

        self.record(ApiCall::EditText {
            id: message.0,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn delete_message(&self, message: MessageId) -> Result<(), TransportError> {
        self.texts.lock().unwrap().remove(&message.0);
        self.record(ApiCall::DeleteMessage { id: message.0 });
        Ok(())
    }

    async fn send_document(&self, path: &Path, caption: &str) -> Result<(), TransportError> {
        if self.fail_documents {
            return Err(TransportError::Other("Request Entity Too Large".to_string()));
        }

        let size = std::fs::metadata(path).ok().map(|meta| meta.len());
        self.record(ApiCall::SendDocument {
            caption: caption.to_string(),
            size,
        });
        Ok(())
    }
}

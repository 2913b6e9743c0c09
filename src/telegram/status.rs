use teloxide::types::MessageId;

use crate::core::error::TransportError;
use crate::telegram::transport::ChatTransport;

/// Edits the status message in place.
///
/// An edit rejected as "message is not modified" already shows the requested
/// text, so it counts as success. Every other failure goes back to the caller.
pub async fn report_status<T>(transport: &T, message: MessageId, text: &str) -> Result<(), TransportError>
where
    T: ChatTransport + ?Sized,
{
    match transport.edit_text(message, text).await {
        Err(TransportError::NotModified) => {
            log::debug!("Status message {} already shows {:?}", message.0, text);
            Ok(())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Mutex;

    /// Behaves like Telegram: editing to the current text is rejected.
    struct EditOnly {
        text: Mutex<String>,
        broken: bool,
    }

    #[async_trait]
    impl ChatTransport for EditOnly {
        async fn send_text(&self, _text: &str) -> Result<MessageId, TransportError> {
            Ok(MessageId(1))
        }

        async fn edit_text(&self, _message: MessageId, text: &str) -> Result<(), TransportError> {
            if self.broken {
                return Err(TransportError::Other("Bad Request: message to edit not found".to_string()));
            }
            let mut current = self.text.lock().unwrap();
            if *current == text {
                return Err(TransportError::NotModified);
            }
            *current = text.to_string();
            Ok(())
        }

        async fn delete_message(&self, _message: MessageId) -> Result<(), TransportError> {
            Ok(())
        }

        async fn send_document(&self, _path: &Path, _caption: &str) -> Result<(), TransportError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_identical_edit_is_swallowed() {
        let transport = EditOnly {
            text: Mutex::new(String::new()),
            broken: false,
        };
        report_status(&transport, MessageId(1), "⬇️ Downloading... 10%").await.unwrap();
        report_status(&transport, MessageId(1), "⬇️ Downloading... 10%").await.unwrap();
        assert_eq!(*transport.text.lock().unwrap(), "⬇️ Downloading... 10%");
    }

    #[tokio::test]
    async fn test_other_errors_surface() {
        let transport = EditOnly {
            text: Mutex::new(String::new()),
            broken: true,
        };
        let err = report_status(&transport, MessageId(1), "x").await.unwrap_err();
        assert!(!err.is_not_modified());
    }
}

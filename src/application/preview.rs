use crate::domain::attachment::{AttachmentId, Preview};
use crate::error::{OrderError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// A pending decode of a committed attachment into a [`Preview`].
#[derive(Debug, Clone)]
pub struct PreviewJob {
    pub attachment: AttachmentId,
    media_type: String,
    bytes: Arc<[u8]>,
}

/// Result of a [`PreviewJob`], tagged with the attachment it was decoded from.
#[derive(Debug)]
pub struct PreviewResult {
    pub attachment: AttachmentId,
    pub preview: Result<Preview>,
}

impl PreviewJob {
    pub(crate) fn new(attachment: AttachmentId, media_type: String, bytes: Arc<[u8]>) -> Self {
        Self {
            attachment,
            media_type,
            bytes,
        }
    }

    /// Decodes the attachment off the async runtime's worker threads.
    pub async fn run(self) -> PreviewResult {
        let attachment = self.attachment;
        let preview = tokio::task::spawn_blocking(move || encode_data_uri(&self.media_type, &self.bytes))
            .await
            .map_err(|e| OrderError::Io(std::io::Error::other(e)))
            .and_then(|encoded| encoded)
            .map(|data_uri| Preview {
                attachment,
                data_uri,
            });
        debug!(%attachment, ok = preview.is_ok(), "Preview decoded");
        PreviewResult {
            attachment,
            preview,
        }
    }

    /// Fire-and-forget: decodes in the background and posts the result to `results`.
    pub fn spawn(self, results: mpsc::UnboundedSender<PreviewResult>) {
        tokio::spawn(async move {
            // The receiver going away just means nobody wants the preview anymore.
            let _ = results.send(self.run().await);
        });
    }
}

fn encode_data_uri(media_type: &str, bytes: &[u8]) -> Result<String> {
    if bytes.is_empty() {
        return Err(OrderError::InvalidInput("image file is empty".to_string()));
    }
    Ok(format!(
        "data:{};base64,{}",
        media_type.trim().to_ascii_lowercase(),
        STANDARD.encode(bytes)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_preview_is_data_uri() {
        let job = PreviewJob::new(AttachmentId(7), "image/png".to_string(), Arc::from(&b"abc"[..]));
        let result = job.run().await;
        assert_eq!(result.attachment, AttachmentId(7));
        let preview = result.preview.unwrap();
        assert_eq!(preview.data_uri, "data:image/png;base64,YWJj");
        assert_eq!(preview.attachment, AttachmentId(7));
    }

    #[tokio::test]
    async fn test_empty_image_fails_to_decode() {
        let job = PreviewJob::new(AttachmentId(1), "image/gif".to_string(), Arc::from(&[][..]));
        let result = job.run().await;
        assert!(matches!(result.preview, Err(OrderError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_spawned_job_reports_back() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        PreviewJob::new(AttachmentId(3), "image/jpeg".to_string(), Arc::from(&b"x"[..])).spawn(tx);
        let result = rx.recv().await.unwrap();
        assert_eq!(result.attachment, AttachmentId(3));
        assert!(result.preview.is_ok());
    }
}

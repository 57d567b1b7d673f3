use crate::error::{OrderError, Result};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// How a candidate file reached the order form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentSource {
    /// The file picker, which only offers image types.
    Selector,
    /// A drag-and-drop onto the form; anything can arrive this way.
    Drop,
}

/// A file offered for attachment, not yet validated.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentCandidate {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Arc<[u8]>,
}

impl AttachmentCandidate {
    pub fn new(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn is_image(&self) -> bool {
        self.media_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
    }

    /// Rejects anything that does not declare an image media type.
    pub fn validate(self) -> Result<Self> {
        if self.is_image() {
            Ok(self)
        } else {
            Err(OrderError::InvalidInput(format!(
                "'{}' is {}, not an image",
                self.file_name, self.media_type
            )))
        }
    }
}

/// Identity of a committed attachment. Increases with every selection so a
/// preview can be matched to the attachment it was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AttachmentId(pub u64);

impl fmt::Display for AttachmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An image committed to the order.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub id: AttachmentId,
    pub file_name: String,
    pub media_type: String,
    pub bytes: Arc<[u8]>,
}

impl Attachment {
    pub fn from_candidate(id: AttachmentId, candidate: AttachmentCandidate) -> Self {
        Self {
            id,
            file_name: candidate.file_name,
            media_type: candidate.media_type,
            bytes: candidate.bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Displayable rendering of an attachment, as a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub attachment: AttachmentId,
    pub data_uri: String,
}

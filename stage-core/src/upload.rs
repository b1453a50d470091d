//! Files handed over by the host's file picker

use crate::media::{MediaKind, MediaSource};

/// One file delivered by the upload collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    /// MIME type reported by the host, may be empty
    pub mime: String,
    /// Playable handle created by the host for this file
    pub source: MediaSource,
}

impl UploadedFile {
    /// Creates an upload entry from a MIME type and a playable handle
    pub fn new(mime: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            mime: mime.into(),
            source: MediaSource::new(source),
        }
    }

    /// Media kind derived from the MIME type
    pub fn kind(&self) -> MediaKind {
        MediaKind::from_mime(&self.mime)
    }
}

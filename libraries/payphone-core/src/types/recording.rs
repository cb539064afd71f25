/// The user-supplied recording: an opaque binary blob with a declared
/// media type and a display name.
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// An uploaded audio recording.
///
/// Content bytes are shared via `Arc`, so cloning a recording (or
/// publishing the enhanced pass-through copy) never duplicates the blob.
/// The bytes are released when the last owner is dropped; the booth holds
/// at most one original and one enhanced reference at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    /// Raw undecoded file content
    content: Arc<[u8]>,

    /// Declared media type (e.g. "audio/wav"). Trusted as declared;
    /// no content sniffing is performed.
    media_type: String,

    /// Display name shown on the booth panel
    name: String,
}

impl Recording {
    /// Create a new recording from raw bytes
    pub fn new(
        content: impl Into<Vec<u8>>,
        media_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into().into(),
            media_type: media_type.into(),
            name: name.into(),
        }
    }

    /// Raw file content
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Shared handle to the raw content, for zero-copy decoding
    pub fn shared_content(&self) -> Arc<[u8]> {
        Arc::clone(&self.content)
    }

    /// Declared media type
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Length of the content in bytes
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Check if the content is empty
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Whether the declared media type indicates audio
    pub fn is_audio(&self) -> bool {
        self.media_type.starts_with("audio/")
    }

    /// Produce the published "enhanced" recording: same content, same
    /// declared type. The filter chain output is heard live only; it is
    /// never captured into this copy.
    pub fn enhanced_copy(&self) -> Self {
        Self {
            content: Arc::clone(&self.content),
            media_type: self.media_type.clone(),
            name: self.name.clone(),
        }
    }

    /// File extension hinted by the declared media type, used to help the
    /// decoder's format probe
    pub fn extension_hint(&self) -> Option<&str> {
        match self.media_type.as_str() {
            "audio/mpeg" | "audio/mp3" => Some("mp3"),
            "audio/wav" | "audio/wave" | "audio/x-wav" => Some("wav"),
            "audio/flac" | "audio/x-flac" => Some("flac"),
            "audio/ogg" => Some("ogg"),
            "audio/opus" => Some("opus"),
            "audio/aac" => Some("aac"),
            "audio/mp4" | "audio/x-m4a" => Some("m4a"),
            _ => None,
        }
    }
}

impl PartialEq for Recording {
    fn eq(&self, other: &Self) -> bool {
        self.media_type == other.media_type
            && self.name == other.name
            && self.content == other.content
    }
}

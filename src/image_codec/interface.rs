use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Handle to the image the user picked. Empty means nothing is selected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageReference {
    location: String,
}

impl ImageReference {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn path(&self) -> &Path {
        Path::new(&self.location)
    }

    pub fn is_empty(&self) -> bool {
        self.location.is_empty()
    }
}

/// Base64 text of the re-encoded image. Cloning shares the same buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload(Arc<str>);

impl EncodedPayload {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when both handles point at the same encoded buffer.
    pub fn shares_buffer_with(&self, other: &EncodedPayload) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("no image selected")]
    EmptyReference,

    #[error("cannot read {location}: {source}")]
    Read {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode image: {0}")]
    Image(#[from] image::ImageError),
}

pub trait ImageCodec: Send + Sync {
    fn encode(&self, image: &ImageReference) -> Result<EncodedPayload, DecodeError>;
}

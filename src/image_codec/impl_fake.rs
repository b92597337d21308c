use crate::image_codec::interface::{DecodeError, EncodedPayload, ImageCodec, ImageReference};
use crate::library::logger::interface::Logger;
use base64::{engine::general_purpose, Engine as _};
use std::collections::HashSet;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Encodes the location string itself, so each image gets a distinct payload
/// without touching the filesystem.
pub struct ImageCodecFake {
    logger: Arc<dyn Logger + Send + Sync>,
    unreadable: Mutex<HashSet<String>>,
    calls: AtomicUsize,
}

impl ImageCodecFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("image_codec").with_namespace("fake"),
            unreadable: Mutex::new(HashSet::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn mark_unreadable(&self, location: &str) {
        self.unreadable
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(location.to_string());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ImageCodec for ImageCodecFake {
    fn encode(&self, image: &ImageReference) -> Result<EncodedPayload, DecodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _ = self.logger.info(&format!("Encoding {}...", image.location()));

        if image.is_empty() {
            return Err(DecodeError::EmptyReference);
        }

        let unreadable = self
            .unreadable
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(image.location());
        if unreadable {
            return Err(DecodeError::Read {
                location: image.location().to_string(),
                source: io::Error::new(io::ErrorKind::InvalidData, "corrupt image"),
            });
        }

        Ok(EncodedPayload::new(
            general_purpose::STANDARD.encode(image.location()),
        ))
    }
}

use crate::image_codec::interface::ImageReference;

/// The image currently picked for classification, kept apart from request state.
///
/// No validation happens here; the codec rejects bad references when it encodes them.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    current: ImageReference,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, image: ImageReference) {
        self.current = image;
    }

    pub fn reset(&mut self) {
        self.current = ImageReference::empty();
    }

    pub fn current(&self) -> &ImageReference {
        &self.current
    }
}

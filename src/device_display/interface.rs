use std::error::Error;

/// A line-oriented text surface the classifier state is rendered onto.
pub trait DeviceDisplay: Send + Sync {
    /// Clear all text from the display
    fn clear(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Write text to a specific line (0-based), replacing what was there
    fn write_line(&mut self, line: usize, text: &str) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Show what has been written since the last clear
    fn flush(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;
}

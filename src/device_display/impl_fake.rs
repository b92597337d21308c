use crate::device_display::interface::DeviceDisplay;
use crate::library::logger::interface::Logger;
use std::error::Error;
use std::sync::Arc;

/// Keeps the last flushed frame so tests can inspect what would be shown.
pub struct DeviceDisplayFake {
    logger: Arc<dyn Logger + Send + Sync>,
    pending: Vec<String>,
    shown: Vec<String>,
}

impl DeviceDisplayFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("device_display").with_namespace("fake"),
            pending: Vec::new(),
            shown: Vec::new(),
        }
    }

    pub fn shown(&self) -> Vec<String> {
        self.shown.clone()
    }
}

impl DeviceDisplay for DeviceDisplayFake {
    fn clear(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.logger.info("DeviceDisplayFake::clear()")?;
        self.pending.clear();
        Ok(())
    }

    fn write_line(&mut self, line: usize, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.logger.info(&format!(
            "DeviceDisplayFake::write_line({}, {})",
            line, text
        ))?;
        if self.pending.len() <= line {
            self.pending.resize(line + 1, String::new());
        }
        self.pending[line] = text.to_string();
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.logger.info("DeviceDisplayFake::flush()")?;
        self.shown = self.pending.clone();
        Ok(())
    }
}

use crate::device_display::interface::DeviceDisplay;
use std::error::Error;

const MAX_LINES: usize = 16;

pub struct DeviceDisplayConsole {
    display_buffer: Vec<String>,
}

impl DeviceDisplayConsole {
    pub fn new() -> Self {
        Self {
            display_buffer: Vec::new(),
        }
    }

    fn render_display(&self) -> String {
        let width = self
            .display_buffer
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let border = "─".repeat(width + 2);

        let mut out = format!("┌{}┐\n", border);
        for line in &self.display_buffer {
            let padding = " ".repeat(width - line.chars().count());
            out.push_str(&format!("│ {}{} │\n", line, padding));
        }
        out.push_str(&format!("└{}┘", border));
        out
    }
}

impl Default for DeviceDisplayConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceDisplay for DeviceDisplayConsole {
    fn clear(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.display_buffer.clear();
        Ok(())
    }

    fn write_line(&mut self, line: usize, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        if line >= MAX_LINES {
            return Err("Invalid line number".into());
        }

        if self.display_buffer.len() <= line {
            self.display_buffer.resize(line + 1, String::new());
        }
        self.display_buffer[line] = text.to_string();

        Ok(())
    }

    fn flush(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        println!("{}", self.render_display());
        Ok(())
    }
}

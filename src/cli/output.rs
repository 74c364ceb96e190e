use anyhow::{Context, Result};
use console::{style, Color};
use dialoguer::Confirm;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub struct OutputFormatter {
    use_colors: bool,
}

impl OutputFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: console::colors_enabled(),
        }
    }

    pub fn format_error(&self, message: &str) -> String {
        format!("{} {}", self.style_text("Error:", Color::Red), message)
    }

    pub fn format_success(&self, message: &str) -> String {
        format!("{} {}", self.style_text("✓", Color::Green), message)
    }

    pub fn format_warning(&self, message: &str) -> String {
        format!("{} {}", self.style_text("⚠", Color::Yellow), message)
    }

    pub fn format_info(&self, message: &str) -> String {
        format!("{} {}", self.style_text("ℹ", Color::Blue), message)
    }

    /// Interactive yes/no gate for dangerous operations. `skip` bypasses
    /// the prompt (the `system.confirm_dangerous = false` escape hatch).
    pub fn confirm(&self, prompt: &str, skip: bool) -> Result<bool> {
        if skip {
            return Ok(true);
        }
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .context("Failed to read confirmation")
    }

    fn style_text(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            style(text).fg(color).to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Threaded stderr spinner shown while an AI request is in flight.
pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();
        let message = message.to_string();

        let handle = thread::spawn(move || {
            let frames = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
            let mut frame_index = 0;

            while running_clone.load(Ordering::Relaxed) {
                eprint!("\r{} {}", frames[frame_index], message);
                let _ = io::stderr().flush();
                frame_index = (frame_index + 1) % frames.len();
                thread::sleep(Duration::from_millis(100));
            }

            // Clear the spinner line
            eprint!("\r{}\r", " ".repeat(message.len() + 3));
            let _ = io::stderr().flush();
        });

        Self {
            running,
            handle: Some(handle),
        }
    }

    pub fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_skip_bypasses_the_prompt() {
        let formatter = OutputFormatter::new();
        assert!(formatter.confirm("never shown", true).unwrap());
    }

    #[test]
    fn plain_formatting_without_colors() {
        let formatter = OutputFormatter { use_colors: false };
        assert_eq!(formatter.format_error("boom"), "Error: boom");
        assert_eq!(formatter.format_success("done"), "✓ done");
    }
}

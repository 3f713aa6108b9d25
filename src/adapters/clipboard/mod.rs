// Clipboard adapter - System clipboard access using arboard

use tracing::debug;

use crate::ports::ClipboardPort;

/// System clipboard adapter
///
/// A fresh handle is opened per read; clipboard access failures (no display
/// server, non-text content) are reported as an empty clipboard.
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardPort for SystemClipboard {
    fn read_text(&self) -> Option<String> {
        let mut clipboard = match arboard::Clipboard::new() {
            Ok(clipboard) => clipboard,
            Err(e) => {
                debug!("Clipboard unavailable: {}", e);
                return None;
            }
        };

        match clipboard.get_text() {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => None,
            Err(e) => {
                debug!("Clipboard holds no text: {}", e);
                None
            }
        }
    }
}

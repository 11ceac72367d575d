use crate::error::{Result, SnipvaultError};
use arboard::Clipboard;

/// Get the current clipboard content as text
pub fn get_clipboard_text() -> Result<String> {
    let mut clipboard = Clipboard::new().map_err(|e| SnipvaultError::Clipboard(e.to_string()))?;
    clipboard
        .get_text()
        .map_err(|e| SnipvaultError::Clipboard(e.to_string()))
}

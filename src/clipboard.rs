//! Clipboard collaborator used by the copy operation.

use crate::error::ClipboardError;
use std::sync::Mutex;

/// Destination for copied command text.
pub trait Clipboard: Send + Sync {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard backed by `arboard`.
///
/// The handle is opened on first use; headless sessions only fail when a copy
/// is actually attempted.
#[derive(Default)]
pub struct SystemClipboard {
    handle: Mutex<Option<arboard::Clipboard>>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut guard = self.handle.lock().map_err(|_| ClipboardError::Poisoned)?;
        if guard.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            *guard = Some(clipboard);
        }
        match guard.as_mut() {
            Some(clipboard) => clipboard
                .set_text(text.to_string())
                .map_err(|e| ClipboardError::Write(e.to_string())),
            None => Err(ClipboardError::Unavailable("no clipboard handle".into())),
        }
    }
}

/// In-process clipboard that remembers the last copied text.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|guard| guard.clone())
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut guard = self.contents.lock().map_err(|_| ClipboardError::Poisoned)?;
        *guard = Some(text.to_string());
        Ok(())
    }
}

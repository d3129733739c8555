//! API key persistence.
//!
//! The key lives in a small JSON file of the form `{"api_key": "<key>"}`. The
//! pipeline never touches this file; the binary resolves a key here and hands
//! a configured client to the pipeline.

use crate::error::CredentialError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

#[derive(Debug, Default, Serialize, Deserialize)]
struct KeyFile {
    #[serde(default)]
    api_key: String,
}

/// File-backed store for one API key.
#[derive(Debug, Clone)]
pub struct KeyStore {
    path: PathBuf,
}

impl KeyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the stored key. A missing file or blank key is `Ok(None)`.
    pub fn load(&self) -> Result<Option<String>, CredentialError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let file: KeyFile = serde_json::from_str(&text)?;
        let key = file.api_key.trim();
        Ok((!key.is_empty()).then(|| key.to_string()))
    }

    /// Write the key, creating parent directories as needed.
    pub fn save(&self, api_key: &str) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string(&KeyFile {
            api_key: api_key.trim().to_string(),
        })?;
        fs::write(&self.path, body)?;
        restrict_permissions(&self.path)?;
        debug!(path = %self.path.display(), "saved API key");
        Ok(())
    }

    /// Remove the stored key. Returns whether a file was deleted.
    pub fn clear(&self) -> Result<bool, CredentialError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), CredentialError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), CredentialError> {
    Ok(())
}

fn key_pattern() -> &'static Regex {
    static KEY: OnceLock<Regex> = OnceLock::new();
    KEY.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{39}$").expect("static key pattern"))
}

/// Check that a key has the shape of a Google AI API key.
pub fn validate_api_key(api_key: &str) -> Result<(), CredentialError> {
    let key = api_key.trim();
    if key.is_empty() {
        return Err(CredentialError::InvalidKey("key cannot be empty".into()));
    }
    if !key_pattern().is_match(key) {
        return Err(CredentialError::InvalidKey(
            "expected 39 characters of letters, digits, `_` or `-`".into(),
        ));
    }
    Ok(())
}

/// Mask all but the last four characters for display.
pub fn mask_api_key(api_key: &str) -> String {
    let chars: Vec<char> = api_key.trim().chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{tail}", "*".repeat(chars.len() - 4))
}

//! JSON file transport for the seat configuration document.
//!
//! The manager itself only consumes the in-memory [`SeatsDocument`]; this
//! module is the host-side transport that reads and writes it as
//! `seats.json` under the user's config directory:
//!
//! - `$XDG_CONFIG_HOME/wayseat/seats.json` when `XDG_CONFIG_HOME` is set,
//! - `~/.config/wayseat/seats.json` otherwise.
//!
//! A missing file is not an error: loading yields an empty document, which
//! the manager turns into a single default fallback seat.

use std::path::{Path, PathBuf};

use thiserror::Error;

use wayseat_core::config::SeatsDocument;

/// File name of the seat configuration document.
pub const SEATS_FILE_NAME: &str = "seats.json";

/// Error type for seat configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing seat config at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document could not be parsed or serialized.
    #[error("malformed seat config document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Determines the directory holding the seat configuration file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when neither
/// `XDG_CONFIG_HOME` nor `HOME` is available in the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path of the seat configuration file.
pub fn seats_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join(SEATS_FILE_NAME))
}

/// Reads a seat document from `path`, returning an empty document when the
/// file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not
/// found" and [`ConfigError::Json`] when the content is malformed.
pub fn read_document(path: &Path) -> Result<SeatsDocument, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(SeatsDocument::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes `document` to `path`, creating parent directories as needed.
pub fn write_document(path: &Path, document: &SeatsDocument) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    let content = serde_json::to_string_pretty(document)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads the seat document from the default location.
pub fn load_document() -> Result<SeatsDocument, ConfigError> {
    read_document(&seats_file_path()?)
}

/// Writes the seat document to the default location.
pub fn save_document(document: &SeatsDocument) -> Result<(), ConfigError> {
    write_document(&seats_file_path()?, document)
}

fn platform_config_dir() -> Option<PathBuf> {
    // XDG_CONFIG_HOME or ~/.config
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("wayseat"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

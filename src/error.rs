//! Error kinds for asset loading and user-dictionary persistence.
//!
//! Runtime query functions (`cut*`, `extract_*`) never return an `Error`;
//! only construction (`Engine::open`) and the `add_*` mutators can fail.

use std::fmt;
use std::path::PathBuf;

/// The closed set of failure modes this crate can report.
#[derive(Debug)]
pub enum Error {
    /// A required asset file was not found at any search location.
    AssetMissing { path: PathBuf },
    /// A required asset was found but could not be parsed, or parsed empty.
    AssetMalformed { path: PathBuf, reason: String },
    /// Reserved for front-end callers (empty word, out-of-range weight).
    /// The core engine never constructs this variant itself.
    InputInvalid { reason: String },
    /// A sidecar file append failed; in-memory state was left unchanged.
    IOFailure {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AssetMissing { path } => {
                write!(f, "required asset not found: {}", path.display())
            }
            Error::AssetMalformed { path, reason } => {
                write!(f, "asset malformed ({}): {}", path.display(), reason)
            }
            Error::InputInvalid { reason } => write!(f, "invalid input: {reason}"),
            Error::IOFailure { path, source } => {
                write!(f, "I/O failure writing {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IOFailure { source, .. } => Some(source),
            _ => None,
        }
    }
}

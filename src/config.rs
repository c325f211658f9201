//! Engine configuration.
//!
//! Grounded on `core/src/lib.rs`'s `Config`. Derives `Deserialize` so a host
//! application can still load it from its own config file via `serde`, the
//! way the teacher workspace's `core` crate does for its own (much larger)
//! `Config`; this crate has no file-format opinion of its own to add, since
//! the only knob is the dictionary directory override.

use std::path::PathBuf;

use serde::Deserialize;

/// Configuration for [`crate::Engine::open`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    /// Explicit dictionary directory; when unset, resolved by
    /// [`crate::assets::resolve_dict_dir`].
    pub dict_dir: Option<PathBuf>,
}

impl EngineConfig {
    pub fn with_dict_dir(dict_dir: impl Into<PathBuf>) -> Self {
        EngineConfig {
            dict_dir: Some(dict_dir.into()),
        }
    }
}

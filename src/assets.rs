//! Dictionary-directory resolution.
//!
//! Grounded on `tokenizer/common.go`'s `GetDictFile`: an explicit override
//! wins outright, otherwise a `dictionary/` directory is searched for next to
//! the running executable, then the current directory, then its parent.

use std::path::{Path, PathBuf};

use crate::dict::DICT_STD_FILE;
use crate::error::Error;
use crate::keywords::IDF_FILE;

const ASSET_DIR_NAME: &str = "dictionary";

/// True iff `dir` carries the two assets every engine needs to open at all.
fn has_required_assets(dir: &Path) -> bool {
    dir.join(DICT_STD_FILE).is_file() && dir.join(IDF_FILE).is_file()
}

/// Resolve the directory [`PrefixDict::load`](crate::dict::PrefixDict::load)
/// and friends should read from.
///
/// `override_dir`, when set, is used as-is and must exist as a directory
/// (its contents are not pre-checked; a missing asset inside it surfaces
/// from the corresponding `load` call instead). Otherwise `<exe-dir>/
/// dictionary/`, `<cwd>/dictionary/`, and `<parent-of-cwd>/dictionary/` are
/// tried in that order; the first one holding both `dict_std_utf8.txt` and
/// `idf_std_utf8.txt` wins. If none qualify, the error names the
/// last-checked candidate.
pub fn resolve_dict_dir(override_dir: Option<&Path>) -> Result<PathBuf, Error> {
    if let Some(dir) = override_dir {
        return if dir.is_dir() {
            Ok(dir.to_path_buf())
        } else {
            Err(Error::AssetMissing {
                path: dir.to_path_buf(),
            })
        };
    }

    let mut candidates = Vec::new();
    if let Ok(exe) = std::env::current_exe() {
        if let Some(exe_dir) = exe.parent() {
            candidates.push(exe_dir.to_path_buf());
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        let parent = cwd.parent().map(|p| p.to_path_buf());
        candidates.push(cwd);
        if let Some(parent) = parent {
            candidates.push(parent);
        }
    }

    let mut last_checked = PathBuf::from(ASSET_DIR_NAME);
    for base in &candidates {
        let dir = base.join(ASSET_DIR_NAME);
        if has_required_assets(&dir) {
            tracing::debug!(path = %dir.display(), "resolved dictionary directory");
            return Ok(dir);
        }
        last_checked = dir;
    }

    Err(Error::AssetMissing {
        path: last_checked,
    })
}

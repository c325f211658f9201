//! Prefix dictionary: `word -> frequency`, with every strict prefix of every
//! real word materialized at frequency 0 so prefix membership is one lookup.
//!
//! Grounded on `tokenizer/dictionary.go`: same load/lookup/add semantics,
//! translated from a package-level `sync.RWMutex` + map to a `RwLock` guarding
//! the table and running total together, so a lookup can never observe a
//! word inserted without its matching contribution to the total.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::Error;

pub const DICT_STD_FILE: &str = "dict_std_utf8.txt";
pub const DICT_USER_FILE: &str = "dict_user_utf8.txt";

#[derive(Debug)]
struct Table {
    words: HashMap<String, u32>,
    total: u64,
}

/// Immutable-after-load dictionary, mutable only through [`PrefixDict::add_word`].
#[derive(Debug)]
pub struct PrefixDict {
    table: RwLock<Table>,
    dir: PathBuf,
}

impl PrefixDict {
    /// Load the standard dictionary (required) and the user dictionary
    /// (optional, silently skipped if absent) from `dir`.
    pub fn load(dir: &Path) -> Result<Self, Error> {
        let started = std::time::Instant::now();
        let std_path = dir.join(DICT_STD_FILE);
        let mut table = Table {
            words: HashMap::new(),
            total: 0,
        };
        load_into(&std_path, &mut table, true)?;

        let user_path = dir.join(DICT_USER_FILE);
        if user_path.exists() {
            // Absence is silent; a malformed user file is not fatal either,
            // since only the standard dictionary's integrity is load-bearing.
            let _ = load_into(&user_path, &mut table, false);
        }

        if table.words.is_empty() || table.total == 0 {
            return Err(Error::AssetMalformed {
                path: std_path,
                reason: "dictionary table is empty or total frequency is zero".to_string(),
            });
        }

        tracing::info!(
            words = table.words.len(),
            total_freq = table.total,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "loaded prefix dictionary"
        );

        Ok(PrefixDict {
            table: RwLock::new(table),
            dir: dir.to_path_buf(),
        })
    }

    /// True iff the lowercased key is present, as a real word or as a prefix.
    pub fn exist(&self, word: &str) -> bool {
        let key = word.to_lowercase();
        self.table.read().unwrap().words.contains_key(&key)
    }

    /// Frequency for `word`; `present` is false if the key is absent entirely.
    pub fn get_word(&self, word: &str) -> (u32, bool) {
        let key = word.to_lowercase();
        match self.table.read().unwrap().words.get(&key) {
            Some(freq) => (*freq, true),
            None => (0, false),
        }
    }

    /// The running total `T = sum(freq(w))` over real (non-prefix-only) words.
    pub fn total_freq(&self) -> f64 {
        self.table.read().unwrap().total as f64
    }

    /// Insert `word` with `freq` and persist it to the user-dictionary
    /// sidecar. Returns `(already_existed, result)`; on I/O failure the
    /// in-memory table is left unchanged. Callers are expected to keep
    /// `freq` within `0..=5000`; this library trusts that range and never
    /// constructs `Error::InputInvalid` itself (that variant is reserved for
    /// a front-end layer, per the error model).
    pub fn add_word(&self, word: &str, freq: u32, prop: &str) -> (bool, Result<(), Error>) {
        let key = word.to_lowercase();
        {
            let table = self.table.read().unwrap();
            if table.words.contains_key(&key) && table.words[&key] > 0 {
                return (true, Ok(()));
            }
        }

        let user_path = self.dir.join(DICT_USER_FILE);
        let line = format!("{key} {freq} {prop}\n");
        if let Err(source) = append_sidecar(&user_path, &line) {
            return (false, Err(Error::IOFailure {
                path: user_path,
                source,
            }));
        }

        let mut table = self.table.write().unwrap();
        insert_word_with_prefixes(&mut table, &key, freq);
        tracing::info!(word = %key, freq, "added dictionary word");
        (false, Ok(()))
    }
}

fn insert_word_with_prefixes(table: &mut Table, key: &str, freq: u32) {
    table.words.insert(key.to_string(), freq);
    table.total += freq as u64;

    let chars: Vec<char> = key.chars().collect();
    for i in 0..chars.len() {
        let prefix: String = chars[..i + 1].iter().collect();
        table.words.entry(prefix).or_insert(0);
    }
}

fn load_into(path: &Path, table: &mut Table, required: bool) -> Result<(), Error> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(source) => {
            return Err(if required {
                Error::AssetMissing {
                    path: path.to_path_buf(),
                }
            } else {
                Error::IOFailure {
                    path: path.to_path_buf(),
                    source,
                }
            });
        }
    };

    let reader = BufReader::new(file);
    let mut item_count = 0usize;
    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 3 {
            continue;
        }
        let word = fields[0];
        let freq: u32 = fields[1].parse().unwrap_or(0);
        item_count += 1;
        insert_word_with_prefixes(table, &word.to_lowercase(), freq);
    }

    tracing::debug!(path = %path.display(), items = item_count, "loaded dictionary file");
    Ok(())
}

/// Append `line` to `path`, creating it if absent, prefixing a newline if the
/// existing content does not already end with one. Matches the byte-level
/// check in `tokenizer/dictionary.go`'s `AddWord`.
pub(crate) fn append_sidecar(path: &Path, line: &str) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let mut f = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)?;

    let len = f.seek(SeekFrom::End(0))?;
    let mut needs_newline = false;
    if len > 0 {
        f.seek(SeekFrom::End(-1))?;
        let mut buf = [0u8; 1];
        f.read_exact(&mut buf)?;
        if buf[0] != b'\n' {
            needs_newline = true;
        }
        f.seek(SeekFrom::End(0))?;
    }

    if needs_newline {
        f.write_all(b"\n")?;
    }
    f.write_all(line.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_dir(name: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!(
            "libfenci_dict_test_{name}_{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_std_dict(dir: &Path) {
        std::fs::write(
            dir.join(DICT_STD_FILE),
            "操作系统 300 n\n操作 200 v\n系统 250 n\n用户 180 n\nShell 50 n\n沟通 90 v\n",
        )
        .unwrap();
    }

    #[test]
    fn loads_and_materializes_prefixes() {
        let dir = fixture_dir("load");
        write_std_dict(&dir);
        let dict = PrefixDict::load(&dir).unwrap();
        assert!(dict.exist("操作系统"));
        assert!(dict.exist("操")); // prefix-only, freq 0
        let (freq, present) = dict.get_word("操");
        assert!(present);
        assert_eq!(freq, 0);
        let (freq, present) = dict.get_word("操作系统");
        assert!(present);
        assert_eq!(freq, 300);
    }

    #[test]
    fn case_insensitive_lookup() {
        let dir = fixture_dir("case");
        write_std_dict(&dir);
        let dict = PrefixDict::load(&dir).unwrap();
        assert_eq!(dict.exist("Shell"), dict.exist("shell"));
        assert!(dict.exist("SHELL"));
    }

    #[test]
    fn add_word_is_idempotent_and_persists() {
        let dir = fixture_dir("add");
        write_std_dict(&dir);
        let dict = PrefixDict::load(&dir).unwrap();
        let before = dict.total_freq();

        let (existed, result) = dict.add_word("编程宝库", 3, "n");
        assert!(!existed);
        assert!(result.is_ok());
        assert_eq!(dict.total_freq(), before + 3.0);

        let (existed, result) = dict.add_word("编程宝库", 3, "n");
        assert!(existed);
        assert!(result.is_ok());
        assert_eq!(dict.total_freq(), before + 3.0);

        // restart against the same directory: the user sidecar must have persisted it
        let reloaded = PrefixDict::load(&dir).unwrap();
        let (freq, present) = reloaded.get_word("编程宝库");
        assert!(present);
        assert_eq!(freq, 3);
    }

    #[test]
    fn missing_standard_dictionary_is_fatal() {
        let dir = fixture_dir("missing");
        let err = PrefixDict::load(&dir).unwrap_err();
        assert!(matches!(err, Error::AssetMissing { .. }));
    }

    #[test]
    fn empty_standard_dictionary_is_fatal() {
        let dir = fixture_dir("empty");
        std::fs::write(dir.join(DICT_STD_FILE), "").unwrap();
        let err = PrefixDict::load(&dir).unwrap_err();
        assert!(matches!(err, Error::AssetMalformed { .. }));
    }
}

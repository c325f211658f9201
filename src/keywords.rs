//! IDF table, stop-word set, and TF-IDF keyword extraction.
//!
//! Grounded on `tokenizer/analyzer.go` (`Analyzer`, `ExtractTags`,
//! `loadIdf`, `loadStopWord`); the `BinaryHeap`-free top-k selection follows
//! `messense-jieba-rs`'s `src/tfidf.rs` (`examples/other_examples`) instead,
//! since a stable sort reads more plainly than a heap for a one-shot
//! extraction over a single document's vocabulary.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::dict::PrefixDict;
use crate::error::Error;
use crate::hmm::FinalSeg;

pub const IDF_FILE: &str = "idf_std_utf8.txt";
pub const STOP_WORD_STD_FILE: &str = "stop_words_std_utf8.txt";
pub const STOP_WORD_USER_FILE: &str = "stop_words_user_utf8.txt";

/// One extracted keyword and its TF-IDF weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub word: String,
    pub weight: f64,
}

/// `word -> idf`, plus the median idf used as the fallback for unseen words.
#[derive(Debug)]
pub struct IdfTable {
    table: HashMap<String, f64>,
    median: f64,
}

impl IdfTable {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let started = std::time::Instant::now();
        let file = File::open(path).map_err(|_| Error::AssetMissing {
            path: path.to_path_buf(),
        })?;

        let mut table = HashMap::new();
        let mut values = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|source| Error::IOFailure {
                path: path.to_path_buf(),
                source,
            })?;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 2 {
                continue;
            }
            let Ok(idf) = fields[1].parse::<f64>() else {
                continue;
            };
            table.insert(fields[0].to_string(), idf);
            values.push(idf);
        }

        if table.is_empty() {
            return Err(Error::AssetMalformed {
                path: path.to_path_buf(),
                reason: "idf table is empty".to_string(),
            });
        }

        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let median = values[values.len() / 2];
        tracing::info!(
            words = table.len(),
            median,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "loaded idf table"
        );
        Ok(IdfTable { table, median })
    }

    pub fn idf_of(&self, word: &str) -> f64 {
        self.table.get(word).copied().unwrap_or(self.median)
    }
}

/// Case-insensitive stop-word set, mutable at runtime via [`StopWords::add`].
///
/// Loaded from a standard and a user sidecar file, the same split
/// [`crate::dict::PrefixDict`] uses; both are optional, and `add` only ever
/// appends to the user file. Every member is stored lowercased, matching
/// `tokenizer/analyzer.go`'s `StopWords.load/exist/add`, which all route
/// through `strings.ToLower`.
#[derive(Debug)]
pub struct StopWords {
    words: RwLock<HashSet<String>>,
    user_path: PathBuf,
}

impl StopWords {
    pub fn load(dir: &Path) -> Result<Self, Error> {
        let started = std::time::Instant::now();
        let mut words = HashSet::new();
        load_words_into(&dir.join(STOP_WORD_STD_FILE), &mut words)?;
        load_words_into(&dir.join(STOP_WORD_USER_FILE), &mut words)?;
        tracing::debug!(
            words = words.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "loaded stop words"
        );
        Ok(StopWords {
            words: RwLock::new(words),
            user_path: dir.join(STOP_WORD_USER_FILE),
        })
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, word: &str) -> bool {
        self.words.read().unwrap().contains(&word.to_lowercase())
    }

    /// Lowercase and trim `word`, add it to the set, and append it to the
    /// user sidecar file; returns `true` if it was already present.
    pub fn add(&self, word: &str) -> (bool, Result<(), Error>) {
        let word = word.trim().to_lowercase();
        {
            let words = self.words.read().unwrap();
            if words.contains(&word) {
                return (true, Ok(()));
            }
        }

        if let Err(source) = crate::dict::append_sidecar(&self.user_path, &format!("{word}\n")) {
            return (
                false,
                Err(Error::IOFailure {
                    path: self.user_path.clone(),
                    source,
                }),
            );
        }

        self.words.write().unwrap().insert(word);
        (false, Ok(()))
    }
}

/// Read every whitespace-separated token in `path` into `words`, lowercased;
/// absence is silent, since both stop-word files are optional.
fn load_words_into(path: &Path, words: &mut HashSet<String>) -> Result<(), Error> {
    if !path.exists() {
        return Ok(());
    }
    let file = File::open(path).map_err(|source| Error::IOFailure {
        path: path.to_path_buf(),
        source,
    })?;
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|source| Error::IOFailure {
            path: path.to_path_buf(),
            source,
        })?;
        for token in line.split_whitespace() {
            words.insert(token.to_lowercase());
        }
    }
    Ok(())
}

/// `extract_keywords(s, 0)` and `extract_keywords_weight(s, 0)` both mean
/// "give me the default-sized list" rather than an empty one.
const DEFAULT_TOP_K: usize = 20;

/// Tokenize `text` in accurate mode, drop single characters and stop words
/// (case-insensitively, but keeping each token's original case as both the
/// term-frequency key and the returned `Keyword.word`), weight by
/// `freq(word) * idf(word) / token_count`, and return the `top_k`
/// highest-weighted `(word, weight)` pairs (or [`DEFAULT_TOP_K`] if `top_k`
/// is `0`), tied-broken by descending weight and then by first occurrence (a
/// stable sort preserves the latter).
pub fn extract_keywords_weight(
    text: &str,
    top_k: usize,
    dict: &PrefixDict,
    final_seg: &FinalSeg,
    idf: &IdfTable,
    stop_words: &StopWords,
) -> Vec<Keyword> {
    let mut tokens = Vec::new();
    crate::cutters::cut_accurate_top(text, dict, final_seg, &mut tokens);

    let mut freq: HashMap<String, f64> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    let mut total = 0.0f64;
    for word in tokens {
        if word.chars().count() < 2 || stop_words.contains(&word) {
            continue;
        }
        if !freq.contains_key(&word) {
            order.push(word.clone());
        }
        *freq.entry(word).or_insert(0.0) += 1.0;
        total += 1.0;
    }

    if total == 0.0 {
        return Vec::new();
    }

    let mut scored: Vec<Keyword> = order
        .into_iter()
        .map(|word| {
            let tf = freq[&word] / total;
            let weight = tf * idf.idf_of(&word);
            Keyword { word, weight }
        })
        .collect();

    scored.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap());
    scored.truncate(if top_k == 0 { DEFAULT_TOP_K } else { top_k });
    scored
}

/// [`extract_keywords_weight`], projected down to just the words.
pub fn extract_keywords(
    text: &str,
    top_k: usize,
    dict: &PrefixDict,
    final_seg: &FinalSeg,
    idf: &IdfTable,
    stop_words: &StopWords,
) -> Vec<String> {
    extract_keywords_weight(text, top_k, dict, final_seg, idf, stop_words)
        .into_iter()
        .map(|k| k.word)
        .collect()
}

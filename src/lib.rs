//! Chinese word segmentation and TF-IDF keyword extraction.
//!
//! The public surface is a small set of free functions backed by a
//! lazily-initialized default [`Engine`]; callers who need a distinct
//! dictionary directory (tests, multi-tenant hosts) construct their own
//! `Engine` via [`Engine::open`] instead.
//!
//! Grounded on `tokenizer/analyzer.go`'s `Analyzer`, which plays the same
//! role of bundling the dictionary, the HMM tables and the IDF/stop-word
//! data behind one struct.

pub mod assets;
pub mod charclass;
pub mod config;
pub mod cutters;
pub mod dict;
pub mod error;
pub mod hmm;
pub mod keywords;
pub mod logging;
pub mod sentence;

use once_cell::sync::OnceCell;

pub use config::EngineConfig;
pub use error::Error;
pub use keywords::Keyword;

use dict::PrefixDict;
use hmm::FinalSeg;
use keywords::{IdfTable, StopWords};

/// A fully-loaded segmentation and keyword-extraction engine.
///
/// Construction is the only fallible operation; once open, every cutter and
/// `extract_keywords` are infallible, and `add_dict_word`/`add_stop_word`
/// report failures without poisoning engine state.
#[derive(Debug)]
pub struct Engine {
    dict: PrefixDict,
    final_seg: FinalSeg,
    idf: IdfTable,
    stop_words: StopWords,
}

impl Engine {
    /// Load dictionary, HMM tables, IDF table and stop words from the
    /// directory named by `config.dict_dir`, or resolved via
    /// [`assets::resolve_dict_dir`] when unset.
    pub fn open(config: &EngineConfig) -> Result<Self, Error> {
        let started = std::time::Instant::now();
        let dir = assets::resolve_dict_dir(config.dict_dir.as_deref())?;
        let dict = PrefixDict::load(&dir)?;
        let final_seg = FinalSeg::load(&dir)?;
        let idf = IdfTable::load(&dir.join(keywords::IDF_FILE))?;
        let stop_words = StopWords::load(&dir)?;
        tracing::info!(
            dir = %dir.display(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "engine ready"
        );
        Ok(Engine {
            dict,
            final_seg,
            idf,
            stop_words,
        })
    }

    /// Every word admitted by the lattice, not only the max-probability path.
    pub fn cut_full(&self, text: &str) -> Vec<String> {
        let mut words = Vec::new();
        cutters::cut_full_top(text, &self.dict, &mut words);
        words
    }

    /// The max-probability path, with the HMM deciding unknown character runs.
    pub fn cut_accurate(&self, text: &str) -> Vec<String> {
        let mut words = Vec::new();
        cutters::cut_accurate_top(text, &self.dict, &self.final_seg, &mut words);
        words
    }

    /// The max-probability path, with unknown runs left unsegmented instead
    /// of handed to the HMM.
    pub fn cut_no_hmm(&self, text: &str) -> Vec<String> {
        let mut words = Vec::new();
        cutters::cut_no_hmm_top(text, &self.dict, &mut words);
        words
    }

    /// Accurate-mode tokens, with dictionary-recognized 2- and 3-grams of
    /// each long token emitted ahead of it, for inverted-index recall.
    pub fn cut_for_search(&self, text: &str) -> Vec<String> {
        let mut words = Vec::new();
        cutters::cut_for_search_top(text, &self.dict, &self.final_seg, &mut words);
        words
    }

    /// Alias for `cut_accurate`, the mode most callers want by default.
    pub fn cut(&self, text: &str) -> Vec<String> {
        self.cut_accurate(text)
    }

    /// Top `top_k` TF-IDF keywords, words only, highest weight first.
    /// `top_k == 0` means the default of 20.
    pub fn extract_keywords(&self, text: &str, top_k: usize) -> Vec<String> {
        keywords::extract_keywords(
            text,
            top_k,
            &self.dict,
            &self.final_seg,
            &self.idf,
            &self.stop_words,
        )
    }

    /// Top `top_k` TF-IDF keywords with their weights, highest first.
    /// `top_k == 0` means the default of 20.
    pub fn extract_keywords_weight(&self, text: &str, top_k: usize) -> Vec<Keyword> {
        keywords::extract_keywords_weight(
            text,
            top_k,
            &self.dict,
            &self.final_seg,
            &self.idf,
            &self.stop_words,
        )
    }

    /// Add a dictionary word and persist it to the user-dictionary sidecar.
    /// Returns `true` if the word was already present as a real (non-prefix)
    /// entry.
    pub fn add_dict_word(&self, word: &str, freq: u32, prop: &str) -> (bool, Result<(), Error>) {
        self.dict.add_word(word, freq, prop)
    }

    /// Mark a word as always split into individual characters by the HMM
    /// final-segmenter, regardless of what Viterbi decoding would otherwise
    /// choose.
    pub fn add_force_split(&self, word: &str) {
        self.final_seg.add_force_split(word)
    }

    /// Add a stop word and persist it to the stop-word sidecar. Returns
    /// `true` if the word was already present.
    pub fn add_stop_word(&self, word: &str) -> (bool, Result<(), Error>) {
        self.stop_words.add(word)
    }
}

static DEFAULT_ENGINE: OnceCell<Engine> = OnceCell::new();

/// The process-wide default engine, opened on first use against the
/// resolved dictionary directory. Panics (via `expect`) if the default
/// assets cannot be loaded, since every free function in this crate depends
/// on it being usable.
pub fn default_engine() -> &'static Engine {
    DEFAULT_ENGINE.get_or_init(|| {
        Engine::open(&EngineConfig::default()).expect("failed to open default engine")
    })
}

/// Replace the process-wide default engine. Only effective before the first
/// call to [`default_engine`] or any free function in this module; later
/// calls are silently ignored, matching [`once_cell::sync::OnceCell`]'s
/// set-once contract.
pub fn set_default_engine(engine: Engine) {
    let _ = DEFAULT_ENGINE.set(engine);
}

pub fn cut(text: &str) -> Vec<String> {
    default_engine().cut(text)
}

pub fn cut_full(text: &str) -> Vec<String> {
    default_engine().cut_full(text)
}

pub fn cut_accurate(text: &str) -> Vec<String> {
    default_engine().cut_accurate(text)
}

pub fn cut_no_hmm(text: &str) -> Vec<String> {
    default_engine().cut_no_hmm(text)
}

pub fn cut_for_search(text: &str) -> Vec<String> {
    default_engine().cut_for_search(text)
}

pub fn extract_keywords(text: &str, top_k: usize) -> Vec<String> {
    default_engine().extract_keywords(text, top_k)
}

pub fn extract_keywords_weight(text: &str, top_k: usize) -> Vec<Keyword> {
    default_engine().extract_keywords_weight(text, top_k)
}

pub fn add_dict_word(word: &str, freq: u32, prop: &str) -> (bool, Result<(), Error>) {
    default_engine().add_dict_word(word, freq, prop)
}

pub fn add_stop_word(word: &str) -> (bool, Result<(), Error>) {
    default_engine().add_stop_word(word)
}

/// Explicit re-export for callers who only need the DAG/route primitives
/// (e.g. building a custom cutter) without the rest of the engine.
pub use sentence::Sentence;

#[cfg(test)]
mod tests {
    use super::*;
    use hmm::{PB_EMIT_FILE, PB_START_FILE, PB_TRANS_FILE};
    use std::path::Path;

    fn fixture_dir() -> std::path::PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!(
            "libfenci_lib_test_{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(dict::DICT_STD_FILE),
            "操作系统 300 n\n操作 200 v\n系统 250 n\n用户 180 n\n沟通 90 v\n",
        )
        .unwrap();
        std::fs::write(
            dir.join(keywords::IDF_FILE),
            "操作系统 8.5\n用户 3.2\n沟通 6.1\n",
        )
        .unwrap();
        std::fs::write(dir.join(keywords::STOP_WORD_STD_FILE), "").unwrap();
        std::fs::write(dir.join(PB_START_FILE), r#"{"B": -0.26, "S": -1.46}"#).unwrap();
        std::fs::write(
            dir.join(PB_TRANS_FILE),
            r#"{"B": {"E": -0.1}, "E": {"B": -0.1, "S": -0.1}, "M": {"E": -0.1}, "S": {"B": -0.1, "S": -0.1}}"#,
        )
        .unwrap();
        std::fs::write(dir.join(PB_EMIT_FILE), r#"{"B": {}, "M": {}, "E": {}, "S": {}}"#).unwrap();
        dir
    }

    #[test]
    fn engine_opens_and_cuts_with_an_explicit_directory() {
        let dir = fixture_dir();
        let engine = Engine::open(&EngineConfig::with_dict_dir(&dir)).unwrap();
        let words = engine.cut_accurate("操作系统");
        assert_eq!(words, vec!["操作系统".to_string()]);
    }

    #[test]
    fn engine_open_fails_fast_on_missing_dictionary_dir() {
        let dir: &Path = Path::new("/nonexistent/libfenci/dict/dir");
        let err = Engine::open(&EngineConfig::with_dict_dir(dir)).unwrap_err();
        assert!(matches!(err, Error::AssetMissing { .. }));
    }

    #[test]
    fn add_dict_word_is_reflected_in_subsequent_cuts() {
        let dir = fixture_dir();
        let engine = Engine::open(&EngineConfig::with_dict_dir(&dir)).unwrap();
        let (existed, result) = engine.add_dict_word("编程宝库", 5, "n");
        assert!(!existed);
        assert!(result.is_ok());
        let words = engine.cut_accurate("编程宝库");
        assert_eq!(words, vec!["编程宝库".to_string()]);
    }

    #[test]
    fn extract_keywords_returns_words_only() {
        let dir = fixture_dir();
        let engine = Engine::open(&EngineConfig::with_dict_dir(&dir)).unwrap();
        let words = engine.extract_keywords("用户操作系统沟通", 2);
        assert!(words.len() <= 2);
    }

    #[test]
    fn extract_keywords_weight_returns_weights() {
        let dir = fixture_dir();
        let engine = Engine::open(&EngineConfig::with_dict_dir(&dir)).unwrap();
        let keywords = engine.extract_keywords_weight("用户操作系统沟通", 2);
        assert!(keywords.len() <= 2);
        assert!(keywords.iter().all(|k| k.weight > 0.0));
    }
}

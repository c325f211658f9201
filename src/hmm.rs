//! BMES hidden-Markov-model final segmenter for out-of-vocabulary runs.
//!
//! Grounded on `tokenizer/fstokenizer.go` (`FinalSeg`, `viterbi`, `Cut`); the
//! `Status`/predecessor-enumeration shape also matches
//! `messense-jieba-rs`'s `src/hmm.rs` (`examples/other_examples`), which this
//! crate follows for variant naming even though its probability tables are
//! `phf`-codegen'd at build time rather than loaded from runtime JSON.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::RwLock;

use crate::charclass;
use crate::error::Error;

/// `-3.14e100`, the sentinel the original tables use for `-infinity`.
/// Kept identical (rather than `f64::NEG_INFINITY`) so ported probability
/// tables compare the same way the reference implementation does.
pub const NEG_INF: f64 = -3.14e100;

pub const PB_START_FILE: &str = "fs_pbstart.json";
pub const PB_TRANS_FILE: &str = "fs_pbtrans.json";
pub const PB_EMIT_FILE: &str = "fs_pbemit.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BmesState {
    B,
    M,
    E,
    S,
}

const STATES: [BmesState; 4] = [BmesState::B, BmesState::M, BmesState::E, BmesState::S];

fn prev_states(y: BmesState) -> [BmesState; 2] {
    match y {
        BmesState::B => [BmesState::E, BmesState::S],
        BmesState::M => [BmesState::M, BmesState::B],
        BmesState::S => [BmesState::S, BmesState::E],
        BmesState::E => [BmesState::B, BmesState::M],
    }
}

fn state_key(s: &str) -> Option<BmesState> {
    match s {
        "B" => Some(BmesState::B),
        "M" => Some(BmesState::M),
        "E" => Some(BmesState::E),
        "S" => Some(BmesState::S),
        _ => None,
    }
}

/// The three probability tables plus the (unused-by-any-cutter, but
/// part of the contract) force-split word set.
#[derive(Debug)]
pub struct FinalSeg {
    start: HashMap<BmesState, f64>,
    trans: HashMap<BmesState, HashMap<BmesState, f64>>,
    emit: HashMap<BmesState, HashMap<char, f64>>,
    force_split: RwLock<HashSet<String>>,
}

impl FinalSeg {
    pub fn load(dir: &Path) -> Result<Self, Error> {
        let started = std::time::Instant::now();
        let start = load_start(&dir.join(PB_START_FILE))?;
        let trans = load_trans(&dir.join(PB_TRANS_FILE))?;
        let emit = load_emit(&dir.join(PB_EMIT_FILE))?;
        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "loaded HMM final-segmenter probability tables"
        );
        Ok(FinalSeg {
            start,
            trans,
            emit,
            force_split: RwLock::new(HashSet::new()),
        })
    }

    fn start_of(&self, y: BmesState) -> f64 {
        self.start.get(&y).copied().unwrap_or(NEG_INF)
    }

    fn trans_of(&self, y0: BmesState, y: BmesState) -> f64 {
        self.trans
            .get(&y0)
            .and_then(|row| row.get(&y))
            .copied()
            .unwrap_or(NEG_INF)
    }

    fn emit_of(&self, y: BmesState, c: char) -> f64 {
        self.emit
            .get(&y)
            .and_then(|row| row.get(&c))
            .copied()
            .unwrap_or(NEG_INF)
    }

    /// Decode the most likely BMES state sequence for `chars`.
    fn viterbi(&self, chars: &[char]) -> Vec<BmesState> {
        let n = chars.len();
        debug_assert!(n > 0);

        let mut v: Vec<HashMap<BmesState, f64>> = vec![HashMap::new(); n];
        let mut path: HashMap<BmesState, Vec<BmesState>> = HashMap::new();
        for &y in &STATES {
            v[0].insert(y, self.start_of(y) + self.emit_of(y, chars[0]));
            path.insert(y, vec![y]);
        }

        for i in 1..n {
            let mut path_new: HashMap<BmesState, Vec<BmesState>> = HashMap::new();
            let mut v_i: HashMap<BmesState, f64> = HashMap::new();
            for &y in &STATES {
                let mut best: Option<(BmesState, f64)> = None;
                for &y0 in &prev_states(y) {
                    let score = v[i - 1][&y0] + self.trans_of(y0, y) + self.emit_of(y, chars[i]);
                    best = match best {
                        None => Some((y0, score)),
                        Some((_, b)) if score > b => Some((y0, score)),
                        Some(existing) => Some(existing),
                    };
                }
                let (from, score) = best.unwrap();
                v_i.insert(y, score);
                let mut p = path[&from].clone();
                p.push(y);
                path_new.insert(y, p);
            }
            v[i] = v_i;
            path = path_new;
        }

        let last = &v[n - 1];
        let mut state = BmesState::E;
        if last[&BmesState::S] > last[&BmesState::E] {
            state = BmesState::S;
        }
        path.remove(&state).unwrap()
    }

    /// Segment a run of characters known to have no better dictionary path.
    fn cut(&self, s: &str) -> Vec<String> {
        let chars: Vec<char> = s.chars().collect();
        if chars.is_empty() {
            return Vec::new();
        }
        let states = self.viterbi(&chars);

        let mut words = Vec::new();
        let mut begin = 0usize;
        let mut next = 0usize;
        for (i, &state) in states.iter().enumerate() {
            match state {
                BmesState::B => begin = i,
                BmesState::E => {
                    words.push(chars[begin..=i].iter().collect());
                    next = i + 1;
                }
                BmesState::S => {
                    words.push(chars[i].to_string());
                    next = i + 1;
                }
                BmesState::M => {}
            }
        }
        if next < chars.len() {
            words.push(chars[next..].iter().collect());
        }
        words
    }

    /// Split `sentence` into Han/non-Han segments, HMM-decode the Han runs,
    /// and run `split_number_seg` on the rest; force-split words are then
    /// broken back into individual characters.
    pub fn cut_sentence(&self, sentence: &str) -> Vec<String> {
        let mut result = Vec::new();
        for segment in charclass::split_chinese_seg(sentence) {
            if charclass::is_chinese_chars(&segment) {
                for w in self.cut(&segment) {
                    if self.is_force_split(&w) {
                        for c in w.chars() {
                            result.push(c.to_string());
                        }
                    } else {
                        result.push(w);
                    }
                }
            } else {
                result.extend(charclass::split_number_seg(&segment));
            }
        }
        result
    }

    pub fn is_force_split(&self, word: &str) -> bool {
        self.force_split.read().unwrap().contains(word)
    }

    pub fn add_force_split(&self, word: &str) {
        self.force_split.write().unwrap().insert(word.to_string());
    }
}

fn load_start(path: &Path) -> Result<HashMap<BmesState, f64>, Error> {
    let raw: HashMap<String, f64> = load_json(path)?;
    Ok(raw
        .into_iter()
        .filter_map(|(k, v)| state_key(&k).map(|s| (s, v)))
        .collect())
}

fn load_trans(path: &Path) -> Result<HashMap<BmesState, HashMap<BmesState, f64>>, Error> {
    let raw: HashMap<String, HashMap<String, f64>> = load_json(path)?;
    Ok(raw
        .into_iter()
        .filter_map(|(k, row)| {
            state_key(&k).map(|s| {
                let row = row
                    .into_iter()
                    .filter_map(|(k2, v)| state_key(&k2).map(|s2| (s2, v)))
                    .collect();
                (s, row)
            })
        })
        .collect())
}

fn load_emit(path: &Path) -> Result<HashMap<BmesState, HashMap<char, f64>>, Error> {
    let raw: HashMap<String, HashMap<String, f64>> = load_json(path)?;
    Ok(raw
        .into_iter()
        .filter_map(|(k, row)| {
            state_key(&k).map(|s| {
                let row = row
                    .into_iter()
                    .filter_map(|(ch, v)| ch.chars().next().map(|c| (c, v)))
                    .collect();
                (s, row)
            })
        })
        .collect())
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let data = std::fs::read_to_string(path).map_err(|_| Error::AssetMissing {
        path: path.to_path_buf(),
    })?;
    serde_json::from_str(&data).map_err(|e| Error::AssetMalformed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_dir() -> std::path::PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!(
            "libfenci_hmm_test_{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();

        std::fs::write(
            dir.join(PB_START_FILE),
            r#"{"B": -0.26, "E": -3.14e100, "M": -3.14e100, "S": -1.46}"#,
        )
        .unwrap();
        std::fs::write(
            dir.join(PB_TRANS_FILE),
            r#"{
                "B": {"E": -0.51, "M": -0.91},
                "E": {"B": -0.59, "S": -0.81},
                "M": {"E": -0.33, "M": -1.26},
                "S": {"B": -0.72, "S": -0.66}
            }"#,
        )
        .unwrap();
        std::fs::write(
            dir.join(PB_EMIT_FILE),
            r#"{
                "B": {"小": -2.0, "明": -3.0, "硕": -4.0},
                "M": {"小": -3.0, "明": -3.0, "硕": -4.0},
                "E": {"小": -3.0, "明": -2.0, "硕": -4.0},
                "S": {"小": -3.0, "明": -3.0, "硕": -2.0}
            }"#,
        )
        .unwrap();

        dir
    }

    #[test]
    fn viterbi_prefers_begin_end_pair_when_trained() {
        let dir = fixture_dir();
        let seg = FinalSeg::load(&dir).unwrap();
        let states = seg.viterbi(&['小', '明']);
        assert_eq!(states, vec![BmesState::B, BmesState::E]);
    }

    #[test]
    fn cut_emits_begin_to_end_span() {
        let dir = fixture_dir();
        let seg = FinalSeg::load(&dir).unwrap();
        let words = seg.cut("小明");
        assert_eq!(words, vec!["小明"]);
    }

    #[test]
    fn missing_table_is_fatal() {
        let dir = fixture_dir();
        std::fs::remove_file(dir.join(PB_EMIT_FILE)).unwrap();
        let err = FinalSeg::load(&dir).unwrap_err();
        assert!(matches!(err, Error::AssetMissing { .. }));
    }

    #[test]
    fn force_split_breaks_word_into_characters() {
        let dir = fixture_dir();
        let seg = FinalSeg::load(&dir).unwrap();
        seg.add_force_split("小明");
        assert!(seg.is_force_split("小明"));
    }
}

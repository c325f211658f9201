//! The four segmentation modes, and the symbol cutter they share.
//!
//! Grounded function-for-function on `tokenizer/cutword.go`
//! (`CutFullW`, `CutAccurateW`, `CutNoHMMW`, `CutSymbolW`).

use crate::charclass;
use crate::dict::PrefixDict;
use crate::hmm::FinalSeg;
use crate::sentence::Sentence;

/// Tokenize a non-text segment by the `[\r\n \t]` delimiter class; each
/// delimiter becomes its own token except a `\r` immediately followed by a
/// `\n`, which merges into `"\r\n"`.
pub fn cut_symbol(s: &str, words: &mut Vec<String>) {
    let n = s.len();
    if n == 0 {
        return;
    }

    let re = charclass::delimiter_regex();
    let mut buf = String::new();
    let mut word;
    let mut pre_pos = 0usize;
    loop {
        match re.find_at(s, pre_pos) {
            None => {
                word = s[pre_pos..].to_string();
                pre_pos = n;
            }
            Some(m) => {
                if m.start() > pre_pos {
                    buf = s[pre_pos..m.start()].to_string();
                }
                word = s[m.start()..m.end()].to_string();
                pre_pos = m.end();
            }
        }

        if buf == "\r" && word == "\n" {
            words.push("\r\n".to_string());
            buf.clear();
        } else {
            if !buf.is_empty() {
                words.push(std::mem::take(&mut buf));
            }
            if !word.is_empty() {
                buf = word.clone();
            }
        }

        if pre_pos == n {
            if !buf.is_empty() {
                words.push(buf);
            }
            return;
        }
    }
}

/// Emit every dictionary-word span the DAG admits, not just the shortest path.
pub fn cut_full(s: &str, dict: &PrefixDict, words: &mut Vec<String>) {
    let sentence = Sentence::new(s);
    let dag = sentence.get_dag(dict);

    let mut buf_latin = String::new();
    let mut prev_pos: isize = -1;

    for (k, ends) in dag.iter().enumerate() {
        if !buf_latin.is_empty() {
            if let Some(ch) = sentence.get_char(k) {
                if !charclass::is_latin_chars(&ch.to_string()) {
                    words.push(std::mem::take(&mut buf_latin));
                }
            }
        }

        if ends.len() == 1 && (k as isize) > prev_pos {
            let word = sentence.get_word(k, ends[0] + 1);
            if charclass::is_latin_chars(&word) {
                buf_latin.push_str(&word);
            }
            if buf_latin.is_empty() {
                words.push(word);
            }
            prev_pos = ends[0] as isize;
        } else {
            for &j in ends {
                if j > k {
                    words.push(sentence.get_word(k, j + 1));
                    prev_pos = j as isize;
                }
            }
        }
    }

    if !buf_latin.is_empty() {
        words.push(buf_latin);
    }
}

/// Drain an unknown-run buffer accumulated between accurate-mode dictionary
/// hits: single characters pass through, multi-character runs that are
/// themselves a dictionary key are split into characters, and anything else
/// is handed to the HMM final-segmenter.
fn drain_buffer(buf: &str, dict: &PrefixDict, final_seg: &FinalSeg, words: &mut Vec<String>) {
    if buf.is_empty() {
        return;
    }
    if buf.chars().count() == 1 {
        words.push(buf.to_string());
        return;
    }
    if !dict.exist(buf) {
        words.extend(final_seg.cut_sentence(buf));
    } else {
        for c in buf.chars() {
            words.push(c.to_string());
        }
    }
}

/// The router-driven traversal shared by accurate and no-HMM mode.
pub fn cut_accurate(s: &str, dict: &PrefixDict, final_seg: &FinalSeg, words: &mut Vec<String>) {
    let sentence = Sentence::new(s);
    let route = sentence.calc_dag(dict);

    let mut buf = String::new();
    let mut i = 0usize;
    while i < sentence.len() {
        let y = route.get(i).end + 1;
        let left_word = sentence.get_word(i, y);
        if y - i == 1 {
            buf.push_str(&left_word);
            i = y;
            continue;
        }

        drain_buffer(&buf, dict, final_seg, words);
        buf.clear();
        words.push(left_word);
        i = y;
    }

    drain_buffer(&buf, dict, final_seg, words);
}

/// Same router traversal as accurate mode, but unknown single-character
/// Latin-class runs are concatenated instead of handed to the HMM.
pub fn cut_no_hmm(s: &str, dict: &PrefixDict, words: &mut Vec<String>) {
    let sentence = Sentence::new(s);
    let route = sentence.calc_dag(dict);

    let mut buf_latin = String::new();
    let mut i = 0usize;
    while i < sentence.len() {
        let y = route.get(i).end + 1;
        let left_word = sentence.get_word(i, y);
        if y - i == 1 && charclass::is_latin_chars(&left_word) {
            buf_latin.push_str(&left_word);
            i = y;
            continue;
        }

        if !buf_latin.is_empty() {
            words.push(std::mem::take(&mut buf_latin));
        }
        words.push(left_word);
        i = y;
    }

    if !buf_latin.is_empty() {
        words.push(buf_latin);
    }
}

/// Accurate-mode tokens, with every dictionary-recognized 2-gram and (for
/// tokens longer than 3) 3-gram substring emitted ahead of the token itself.
pub fn cut_for_search(s: &str, dict: &PrefixDict, final_seg: &FinalSeg, words: &mut Vec<String>) {
    let mut base = Vec::new();
    dispatch_text_segments(s, dict, final_seg, &mut base);

    for token in base {
        let chars: Vec<char> = token.chars().collect();
        let n = chars.len();
        if n > 2 {
            for start in 0..=(n - 2) {
                let gram: String = chars[start..start + 2].iter().collect();
                if dict.exist(&gram) {
                    words.push(gram);
                }
            }
        }
        if n > 3 {
            for start in 0..=(n - 3) {
                let gram: String = chars[start..start + 3].iter().collect();
                if dict.exist(&gram) {
                    words.push(gram);
                }
            }
        }
        words.push(token);
    }
}

/// Shared `split_text_seg` dispatch: text segments go through the given
/// text-cutter, everything else through [`cut_symbol`].
fn dispatch<F>(s: &str, mut text_cutter: F, words: &mut Vec<String>)
where
    F: FnMut(&str, &mut Vec<String>),
{
    for segment in charclass::split_text_seg(s) {
        if charclass::is_text_chars(&segment) {
            text_cutter(&segment, words);
        } else {
            cut_symbol(&segment, words);
        }
    }
}

fn dispatch_text_segments(
    s: &str,
    dict: &PrefixDict,
    final_seg: &FinalSeg,
    words: &mut Vec<String>,
) {
    dispatch(s, |seg, out| cut_accurate(seg, dict, final_seg, out), words)
}

/// Full-mode top-level entry: dispatches [`cut_full`] over text segments.
pub fn cut_full_top(s: &str, dict: &PrefixDict, words: &mut Vec<String>) {
    dispatch(s, |seg, out| cut_full(seg, dict, out), words)
}

/// Accurate-mode top-level entry.
pub fn cut_accurate_top(s: &str, dict: &PrefixDict, final_seg: &FinalSeg, words: &mut Vec<String>) {
    dispatch_text_segments(s, dict, final_seg, words)
}

/// No-HMM-mode top-level entry.
pub fn cut_no_hmm_top(s: &str, dict: &PrefixDict, words: &mut Vec<String>) {
    dispatch(s, |seg, out| cut_no_hmm(seg, dict, out), words)
}

/// Search-mode top-level entry.
pub fn cut_for_search_top(
    s: &str,
    dict: &PrefixDict,
    final_seg: &FinalSeg,
    words: &mut Vec<String>,
) {
    cut_for_search(s, dict, final_seg, words)
}

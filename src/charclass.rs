//! Character classification and segment splitting.
//!
//! Mirrors `tokenizer/common.go`'s regular expressions and `splitRegExp`:
//! each `split_*_seg` walks a compiled pattern over the input, emitting both
//! the matched runs and the interleaving unmatched runs, in order.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\u{4e00}-\u{9fa5}a-zA-Z0-9+#&._%-])+").unwrap());
static RE_CHINESE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([\u{4e00}-\u{9fa5}])+").unwrap());
static RE_LATIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-zA-Z0-9])+").unwrap());
static RE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-zA-Z0-9]+(\.\d+)?%?").unwrap());
static RE_DELIMITER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n \t]").unwrap());

/// True iff `s` contains at least one character of the text class.
pub fn is_text_chars(s: &str) -> bool {
    RE_TEXT.is_match(s)
}

/// True iff `s` contains at least one Han character.
pub fn is_chinese_chars(s: &str) -> bool {
    RE_CHINESE.is_match(s)
}

/// True iff `s` contains at least one Latin letter or digit.
pub fn is_latin_chars(s: &str) -> bool {
    RE_LATIN.is_match(s)
}

/// Split `s` into alternating text-class and non-text-class runs, in order.
pub fn split_text_seg(s: &str) -> Vec<String> {
    split_regex(s, &RE_TEXT)
}

/// Split `s` into alternating Han-class and non-Han-class runs, in order.
pub fn split_chinese_seg(s: &str) -> Vec<String> {
    split_regex(s, &RE_CHINESE)
}

/// Split `s` into alternating numeric-class and non-numeric-class runs.
pub fn split_number_seg(s: &str) -> Vec<String> {
    split_regex(s, &RE_NUMBER)
}

/// The delimiter class used by the symbol cutter: `\r`, `\n`, space, or tab.
pub fn delimiter_regex() -> &'static Regex {
    &RE_DELIMITER
}

fn split_regex(s: &str, re: &Regex) -> Vec<String> {
    let mut segments = Vec::new();
    let n = s.len();
    let mut pre_pos = 0usize;
    loop {
        match re.find_at(s, pre_pos) {
            None => {
                segments.push(s[pre_pos..].to_string());
                return segments;
            }
            Some(m) => {
                if m.start() > pre_pos {
                    segments.push(s[pre_pos..m.start()].to_string());
                }
                segments.push(s[m.start()..m.end()].to_string());
                pre_pos = m.end();
                if pre_pos == n {
                    break;
                }
            }
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_text_and_symbol_runs() {
        let segs = split_text_seg("Shell位于用户，沟通。");
        assert_eq!(segs, vec!["Shell位于用户", "，", "沟通", "。"]);
    }

    #[test]
    fn text_class_recognizes_mixed_runs() {
        assert!(is_text_chars("Shell"));
        assert!(is_text_chars("操作系统"));
        assert!(!is_text_chars("，。"));
    }

    #[test]
    fn chinese_class_is_narrower_than_text_class() {
        assert!(!is_chinese_chars("Shell"));
        assert!(is_chinese_chars("操作系统"));
    }

    #[test]
    fn number_class_handles_percent_and_decimal() {
        let segs = split_number_seg("CPU 99.5%满载");
        assert!(segs.contains(&"99.5%".to_string()));
    }

    #[test]
    fn split_whole_string_is_a_single_non_match_when_no_match() {
        let segs = split_text_seg("，。！");
        assert_eq!(segs, vec!["，。！"]);
    }
}

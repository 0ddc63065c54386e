use regex::Regex;
use std::sync::OnceLock;

fn word_regex() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"\w+").expect("static regex"))
}

/// Lowercased word tokens in order of appearance.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    word_regex()
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Number of distinct keywords present in `tokens` as whole words.
/// A multi-word keyword matches a contiguous run of tokens.
pub fn keyword_hits(tokens: &[String], keywords: &[String]) -> usize {
    keywords
        .iter()
        .filter(|keyword| contains_phrase(tokens, keyword))
        .count()
}

fn contains_phrase(tokens: &[String], keyword: &str) -> bool {
    let parts = tokenize(keyword);
    match parts.len() {
        0 => false,
        1 => tokens.iter().any(|token| *token == parts[0]),
        n => tokens.windows(n).any(|window| window == parts.as_slice()),
    }
}

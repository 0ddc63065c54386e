use crate::core::text::tokenize;

pub const DEFAULT_CONCEPT: &str = "dream";

const STOP_WORDS: &[&str] = &[
    "this", "that", "with", "from", "they", "have", "will", "been", "the", "and", "or", "but",
    "for", "nor", "yet", "so", "a", "an", "how", "what", "when", "where", "why", "who", "which",
    "both", "giver", "receiver", "explore", "essence", "transforms", "between", "through",
    "within", "without", "beyond", "above", "below",
];

const PRIORITY_CONCEPTS: &[(&str, u8)] = &[
    ("love", 10),
    ("wisdom", 10),
    ("peace", 10),
    ("harmony", 10),
    ("forgiveness", 9),
    ("transformation", 9),
    ("balance", 9),
    ("energy", 9),
    ("healing", 8),
    ("growth", 8),
    ("journey", 8),
    ("power", 8),
    ("light", 7),
    ("shadow", 7),
    ("dream", 7),
    ("spirit", 7),
    ("consciousness", 6),
    ("awareness", 6),
    ("presence", 6),
    ("flow", 6),
];

fn weight(word: &str) -> Option<u8> {
    if let Some((_, weight)) = PRIORITY_CONCEPTS.iter().find(|(concept, _)| *concept == word) {
        return Some(*weight);
    }
    if STOP_WORDS.contains(&word) {
        return None;
    }
    match word.chars().count() {
        n if n > 4 => Some(5),
        n if n > 3 => Some(3),
        _ => None,
    }
}

/// 從意圖中取出一個概念字，用於 echo 檔名分組
///
/// Priority concepts outrank long words, which outrank four-letter words.
/// Ties keep the first occurrence. Returns [`DEFAULT_CONCEPT`] when nothing qualifies.
pub fn extract_concept(intent: &str) -> String {
    find_concept(intent).unwrap_or_else(|| DEFAULT_CONCEPT.to_string())
}

/// Like [`extract_concept`], but `None` when no word qualifies.
pub fn find_concept(intent: &str) -> Option<String> {
    let mut best: Option<(String, u8)> = None;

    for word in tokenize(intent) {
        let Some(score) = weight(&word) else {
            continue;
        };
        match &best {
            Some((_, best_score)) if *best_score >= score => {}
            _ => best = Some((word, score)),
        }
    }

    best.map(|(word, _)| word)
}

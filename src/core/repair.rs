use crate::core::catalog::ThemeCatalog;
use crate::core::concept::extract_concept;
use crate::core::detector::ThemeDetector;
use crate::core::selector::SymbolColorSelector;
use crate::domain::model::Artifact;
use crate::utils::validation::is_hex_color;
use rand::Rng;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::{Arc, OnceLock};
use thiserror::Error;

/// Longest symbol, in chars, still taken as a single glyph (emoji sequences included).
pub const MAX_SYMBOL_CHARS: usize = 8;

/// Why a raw model response could not become an [`Artifact`]. The engine answers
/// every variant with the rule-based fallback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepairFailure {
    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("No JSON object found in model response")]
    NoJsonObject,

    #[error("Model response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Model response is JSON but not an object")]
    NotAnObject,

    #[error("Model response is missing required field '{0}'")]
    MissingField(&'static str),
}

/// Which gaps were filled while repairing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    pub color_filled: bool,
    pub reasoning_extended: bool,
}

impl RepairReport {
    pub fn is_clean(&self) -> bool {
        !self.color_filled && !self.reasoning_extended
    }
}

fn think_regex() -> &'static Regex {
    static THINK: OnceLock<Regex> = OnceLock::new();
    THINK.get_or_init(|| Regex::new(r"(?s)<think>.*?</think>").expect("static regex"))
}

#[derive(Debug, Clone)]
pub struct ResponseRepairer {
    detector: ThemeDetector,
    selector: SymbolColorSelector,
    min_reasoning_chars: usize,
}

impl ResponseRepairer {
    pub fn new(catalog: Arc<ThemeCatalog>, min_reasoning_chars: usize) -> Self {
        Self {
            detector: ThemeDetector::new(catalog.clone()),
            selector: SymbolColorSelector::new(catalog),
            min_reasoning_chars,
        }
    }

    pub fn repair<R: Rng + ?Sized>(
        &self,
        raw_response: Option<&str>,
        intent: &str,
        rng: &mut R,
    ) -> Result<Artifact, RepairFailure> {
        self.repair_with_report(raw_response, intent, rng)
            .map(|(artifact, _)| artifact)
    }

    pub fn repair_with_report<R: Rng + ?Sized>(
        &self,
        raw_response: Option<&str>,
        intent: &str,
        rng: &mut R,
    ) -> Result<(Artifact, RepairReport), RepairFailure> {
        let raw = raw_response.map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Err(RepairFailure::EmptyResponse);
        }

        let object = extract_object(raw)?;
        let symbol = required_string(&object, "symbol")?;
        if symbol.chars().count() > MAX_SYMBOL_CHARS {
            tracing::debug!("Symbol is not a single glyph: {:?}", symbol);
            return Err(RepairFailure::MissingField("symbol"));
        }
        let phrase = required_string(&object, "phrase")?;

        let mut report = RepairReport::default();

        let color = match optional_string(&object, "color").and_then(normalize_color) {
            Some(color) => color,
            None => {
                let theme = self.detector.detect_theme(intent);
                let (_, color) = self.selector.select(&theme, rng);
                tracing::debug!("Filled missing color from theme '{}': {}", theme, color);
                report.color_filled = true;
                color
            }
        };

        let mut reasoning = optional_string(&object, "reasoning").unwrap_or_default();
        if reasoning.is_empty() || reasoning.chars().count() < self.min_reasoning_chars {
            let suffix = format!(
                "This symbol resonates with the deep currents of {}, bridging the seen and unseen realms.",
                extract_concept(intent)
            );
            reasoning = if reasoning.is_empty() {
                suffix
            } else {
                format!("{} {}", reasoning, suffix)
            };
            report.reasoning_extended = true;
        }

        Ok((
            Artifact {
                symbol,
                phrase,
                color,
                reasoning,
            },
            report,
        ))
    }
}

/// Finds the JSON object inside a model answer that may carry `<think>` blocks,
/// markdown fences or chatter around it.
fn extract_object(raw: &str) -> Result<Map<String, Value>, RepairFailure> {
    let without_think = think_regex().replace_all(raw, "");
    // 缺少開頭 <think> 的情況：只保留最後一個 </think> 之後的內容
    let text = match without_think.rfind("</think>") {
        Some(end) => &without_think[end + "</think>".len()..],
        None => &*without_think,
    }
    .trim();

    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return match value {
            Value::Object(object) => Ok(object),
            _ => Err(RepairFailure::NotAnObject),
        };
    }

    let start = text.find('{').ok_or(RepairFailure::NoJsonObject)?;

    // 閒聊裡可能先出現 {answer} 之類的括號，逐一嘗試每個 '{'
    let mut last_error = None;
    for (offset, _) in text[start..].match_indices('{') {
        let Some(span) = balanced_span(&text[start + offset..]) else {
            continue;
        };
        match serde_json::from_str::<Value>(span) {
            Ok(Value::Object(object)) => return Ok(object),
            Ok(_) => {}
            Err(e) => {
                last_error.get_or_insert_with(|| e.to_string());
            }
        }
    }

    let end = text.rfind('}').filter(|end| *end > start);
    let Some(end) = end else {
        return Err(match last_error {
            Some(e) => RepairFailure::InvalidJson(e),
            None => RepairFailure::NoJsonObject,
        });
    };

    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(RepairFailure::NotAnObject),
        Err(e) => Err(RepairFailure::InvalidJson(e.to_string())),
    }
}

/// The first balanced `{...}` at the start of `text`, skipping braces inside strings.
fn balanced_span(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (index, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[..=index]);
                }
            }
            _ => {}
        }
    }
    None
}

fn optional_string(object: &Map<String, Value>, field: &str) -> Option<String> {
    match object.get(field) {
        Some(Value::String(value)) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}

fn required_string(object: &Map<String, Value>, field: &'static str) -> Result<String, RepairFailure> {
    optional_string(object, field).ok_or(RepairFailure::MissingField(field))
}

fn normalize_color(color: String) -> Option<String> {
    if is_hex_color(&color) {
        return Some(color);
    }
    let prefixed = format!("#{}", color);
    is_hex_color(&prefixed).then_some(prefixed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DreamConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn repairer() -> (ResponseRepairer, Arc<ThemeCatalog>) {
        let catalog = Arc::new(ThemeCatalog::from_config(&DreamConfig::builtin()));
        (ResponseRepairer::new(catalog.clone(), 50), catalog)
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    const WELL_FORMED: &str = r##"{"symbol":"∞","phrase":"Test.","color":"#112233","reasoning":"A sufficiently long reasoning string exceeding fifty characters for this test case."}"##;

    #[test]
    fn test_well_formed_response_is_untouched() {
        let (repairer, _) = repairer();
        let (artifact, report) = repairer
            .repair_with_report(Some(WELL_FORMED), "peace and calm", &mut rng())
            .unwrap();

        assert_eq!(artifact.symbol, "∞");
        assert_eq!(artifact.phrase, "Test.");
        assert_eq!(artifact.color, "#112233");
        assert_eq!(
            artifact.reasoning,
            "A sufficiently long reasoning string exceeding fifty characters for this test case."
        );
        assert!(report.is_clean());
    }

    #[test]
    fn test_empty_response() {
        let (repairer, _) = repairer();
        assert_eq!(
            repairer.repair(None, "x", &mut rng()),
            Err(RepairFailure::EmptyResponse)
        );
        assert_eq!(
            repairer.repair(Some("  \n "), "x", &mut rng()),
            Err(RepairFailure::EmptyResponse)
        );
    }

    #[test]
    fn test_no_json_object() {
        let (repairer, _) = repairer();
        assert_eq!(
            repairer.repair(Some("I cannot help with that."), "x", &mut rng()),
            Err(RepairFailure::NoJsonObject)
        );
    }

    #[test]
    fn test_invalid_json() {
        let (repairer, _) = repairer();
        let result = repairer.repair(Some("{symbol: ∞, phrase"), "x", &mut rng());
        assert!(matches!(result, Err(RepairFailure::NoJsonObject) | Err(RepairFailure::InvalidJson(_))));

        let result = repairer.repair(Some("{symbol: ∞}"), "x", &mut rng());
        assert!(matches!(result, Err(RepairFailure::InvalidJson(_))));
    }

    #[test]
    fn test_not_an_object() {
        let (repairer, _) = repairer();
        assert_eq!(
            repairer.repair(Some(r#"["∞", "phrase"]"#), "x", &mut rng()),
            Err(RepairFailure::NotAnObject)
        );
    }

    #[test]
    fn test_missing_required_fields() {
        let (repairer, _) = repairer();
        assert_eq!(
            repairer.repair(Some(r#"{"phrase": "Only words."}"#), "x", &mut rng()),
            Err(RepairFailure::MissingField("symbol"))
        );
        assert_eq!(
            repairer.repair(Some(r#"{"symbol": "◊", "phrase": "  "}"#), "x", &mut rng()),
            Err(RepairFailure::MissingField("phrase"))
        );
        assert_eq!(
            repairer.repair(Some(r#"{"symbol": 7, "phrase": "Words."}"#), "x", &mut rng()),
            Err(RepairFailure::MissingField("symbol"))
        );
    }

    #[test]
    fn test_embedded_json_with_think_block_and_chatter() {
        let (repairer, _) = repairer();
        let raw = r##"<think>The user wants {peace}. Maybe ☯?</think>
Here is your symbol:
```json
{"symbol": "☯", "phrase": "Stillness holds the world.", "color": "#AABBCC", "reasoning": "The yin-yang mirrors the balance the intent asks for, and the pale tone is quiet."}
```
Hope this helps {smile}"##;

        let artifact = repairer.repair(Some(raw), "find peace", &mut rng()).unwrap();
        assert_eq!(artifact.symbol, "☯");
        assert_eq!(artifact.color, "#AABBCC");
    }

    #[test]
    fn test_braces_inside_strings() {
        let (repairer, _) = repairer();
        let raw = r##"Answer: {"symbol": "◊", "phrase": "A door {opens} inward.", "color": "#010203", "reasoning": "Braces } inside strings must not end the object early, nor should { open one."} done"##;

        let artifact = repairer.repair(Some(raw), "x", &mut rng()).unwrap();
        assert_eq!(artifact.phrase, "A door {opens} inward.");
    }

    #[test]
    fn test_brace_in_chatter_before_object() {
        let (repairer, _) = repairer();
        let raw = format!("Here is the {{answer}} you asked for: {} Enjoy {{it}}.", WELL_FORMED);

        let artifact = repairer.repair(Some(&raw), "x", &mut rng()).unwrap();
        assert_eq!(artifact.symbol, "∞");
        assert_eq!(artifact.color, "#112233");
    }

    #[test]
    fn test_sentence_as_symbol_rejected() {
        let (repairer, _) = repairer();
        let raw = r#"{"symbol": "∞ the infinity sign, representing endless return", "phrase": "Words."}"#;
        assert_eq!(
            repairer.repair(Some(raw), "x", &mut rng()),
            Err(RepairFailure::MissingField("symbol"))
        );

        let raw = r#"{"symbol": "👩‍👩‍👧", "phrase": "Words."}"#;
        assert!(repairer.repair(Some(raw), "x", &mut rng()).is_ok());
    }

    #[test]
    fn test_missing_color_filled_from_detected_theme() {
        let (repairer, catalog) = repairer();
        let raw = r#"{"symbol": "☮", "phrase": "Be still.", "reasoning": "A reasoning string that is comfortably longer than fifty characters."}"#;

        let (artifact, report) = repairer
            .repair_with_report(Some(raw), "peace and calm", &mut rng())
            .unwrap();
        assert!(report.color_filled);
        assert!(!report.reasoning_extended);
        assert!(catalog.get("peace").unwrap().color_pool.contains(&artifact.color));
    }

    #[test]
    fn test_invalid_color_replaced_and_bare_hex_prefixed() {
        let (repairer, _) = repairer();

        let raw = r#"{"symbol": "☮", "phrase": "Be still.", "color": "sky blue"}"#;
        let artifact = repairer.repair(Some(raw), "peace", &mut rng()).unwrap();
        assert!(is_hex_color(&artifact.color));

        let raw = r#"{"symbol": "☮", "phrase": "Be still.", "color": "a1b2c3"}"#;
        let artifact = repairer.repair(Some(raw), "peace", &mut rng()).unwrap();
        assert_eq!(artifact.color, "#a1b2c3");
    }

    #[test]
    fn test_short_reasoning_extended_with_concept() {
        let (repairer, _) = repairer();
        let raw = r##"{"symbol": "♥", "phrase": "Open.", "color": "#ff0000", "reasoning": "Hearts."}"##;

        let (artifact, report) = repairer
            .repair_with_report(Some(raw), "explore the essence of love", &mut rng())
            .unwrap();
        assert!(report.reasoning_extended);
        assert!(artifact.reasoning.starts_with("Hearts. "));
        assert!(artifact.reasoning.contains("deep currents of love"));
        assert!(artifact.reasoning.chars().count() >= 50);
    }

    #[test]
    fn test_missing_reasoning_gets_sentence() {
        let (repairer, _) = repairer();
        let raw = r##"{"symbol": "♥", "phrase": "Open.", "color": "#ff0000"}"##;
        let artifact = repairer.repair(Some(raw), "", &mut rng()).unwrap();
        assert_eq!(
            artifact.reasoning,
            "This symbol resonates with the deep currents of dream, bridging the seen and unseen realms."
        );
        assert!(artifact.is_complete());
    }

    #[test]
    fn test_zero_minimum_keeps_short_reasoning() {
        let catalog = Arc::new(ThemeCatalog::from_config(&DreamConfig::builtin()));
        let repairer = ResponseRepairer::new(catalog, 0);
        let raw = r##"{"symbol": "♥", "phrase": "Open.", "color": "#ff0000", "reasoning": "Hearts."}"##;
        let artifact = repairer.repair(Some(raw), "love", &mut rng()).unwrap();
        assert_eq!(artifact.reasoning, "Hearts.");
    }

    #[test]
    fn test_think_block_with_stray_brace() {
        let (repairer, _) = repairer();
        let raw = format!("<think>pondering {{ the void\n</think>\n{}", WELL_FORMED);
        let artifact = repairer.repair(Some(&raw), "x", &mut rng()).unwrap();
        assert_eq!(artifact.color, "#112233");
    }
}

use crate::utils::validation::is_hex_color;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

pub const ETERNAL_SYMBOL: &str = "∞";
pub const ETERNAL_COLOR: &str = "#7f8c8d";

/// 產生的符號結果；四個欄位在交給呼叫端前必定非空
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub symbol: String,
    pub phrase: String,
    pub color: String,
    pub reasoning: String,
}

impl Artifact {
    /// Hard-coded last resort when every other source is unusable.
    pub fn eternal() -> Self {
        Self {
            symbol: ETERNAL_SYMBOL.to_string(),
            phrase: "The dream continues beyond understanding.".to_string(),
            color: ETERNAL_COLOR.to_string(),
            reasoning: "When symbols fail, the infinite persists.".to_string(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.symbol.trim().is_empty()
            && !self.phrase.trim().is_empty()
            && !self.reasoning.trim().is_empty()
            && is_hex_color(&self.color)
    }
}

/// One intent/style pair, as stored in a brain file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brain {
    #[serde(default)]
    pub intent: String,
    #[serde(default)]
    pub style: String,
}

impl Brain {
    pub fn new(intent: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            intent: intent.into(),
            style: style.into(),
        }
    }
}

/// A named thematic bucket. Pools keep duplicates: repetition is selection weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    pub keywords: Vec<String>,
    pub symbol_pool: Vec<String>,
    pub color_pool: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactSource {
    /// Model answer accepted as-is
    Model,
    /// Model answer with color or reasoning filled in
    Repaired,
    /// Rule-based, no usable model answer
    Fallback,
}

impl ArtifactSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactSource::Model => "model",
            ArtifactSource::Repaired => "repaired",
            ArtifactSource::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DreamOutcome {
    pub artifact: Artifact,
    pub source: ArtifactSource,
    pub theme: String,
    pub concept: String,
    pub prompt: String,
    pub raw_response: Option<String>,
    pub timestamp: DateTime<Local>,
}

#[derive(Debug, Clone)]
pub struct DreamPreview {
    pub theme: String,
    pub theme_scores: Vec<(String, usize)>,
    pub concept: String,
    pub prompt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eternal_artifact_is_complete() {
        assert!(Artifact::eternal().is_complete());
    }

    #[test]
    fn test_incomplete_artifact_detected() {
        let mut artifact = Artifact::eternal();
        artifact.color = "blue".to_string();
        assert!(!artifact.is_complete());

        let mut artifact = Artifact::eternal();
        artifact.phrase = "  ".to_string();
        assert!(!artifact.is_complete());
    }

    #[test]
    fn test_artifact_serializes_exactly_four_fields() {
        let value = serde_json::to_value(Artifact::eternal()).unwrap();
        let object = value.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, vec!["color", "phrase", "reasoning", "symbol"]);
    }

    #[test]
    fn test_brain_defaults_missing_fields() {
        let brain: Brain = serde_json::from_str(r#"{"intent": "find peace"}"#).unwrap();
        assert_eq!(brain.intent, "find peace");
        assert_eq!(brain.style, "");
    }
}

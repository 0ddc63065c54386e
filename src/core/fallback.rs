use crate::config::{PhraseCategory, PhraseConfig};
use crate::core::catalog::ThemeCatalog;
use crate::core::concept::find_concept;
use crate::core::detector::ThemeDetector;
use crate::core::selector::SymbolColorSelector;
use crate::core::text::{keyword_hits, tokenize};
use crate::domain::model::Artifact;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

pub const LAST_RESORT_PHRASE: &str = "The dream continues beyond understanding.";

/// Curated phrases grouped by keyword family, plus a general list.
#[derive(Debug, Clone)]
pub struct PhraseBook {
    categories: Vec<PhraseCategory>,
    general: Vec<String>,
}

impl PhraseBook {
    pub fn new(config: &PhraseConfig) -> Self {
        let clean = |phrases: &[String]| -> Vec<String> {
            phrases
                .iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect()
        };

        // 沒有句子的分類不參與比對
        let categories = config
            .categories
            .iter()
            .map(|category| PhraseCategory {
                name: category.name.clone(),
                keywords: category.keywords.iter().map(|k| k.to_lowercase()).collect(),
                phrases: clean(&category.phrases),
            })
            .filter(|category| !category.phrases.is_empty())
            .collect();

        Self {
            categories,
            general: clean(&config.general),
        }
    }

    /// Category with the most whole-word keyword hits; ties go to the first one.
    pub fn category_for(&self, intent: &str) -> Option<&PhraseCategory> {
        let tokens = tokenize(intent);
        let mut best: Option<(&PhraseCategory, usize)> = None;

        for category in &self.categories {
            let hits = keyword_hits(&tokens, &category.keywords);
            if hits == 0 {
                continue;
            }
            match best {
                Some((_, best_hits)) if best_hits >= hits => {}
                _ => best = Some((category, hits)),
            }
        }

        best.map(|(category, _)| category)
    }

    pub fn pick<R: Rng + ?Sized>(&self, intent: &str, rng: &mut R) -> String {
        let pool = match self.category_for(intent) {
            Some(category) => {
                tracing::debug!("Phrase category '{}'", category.name);
                &category.phrases
            }
            None => &self.general,
        };

        pool.choose(rng)
            .cloned()
            .unwrap_or_else(|| LAST_RESORT_PHRASE.to_string())
    }
}

/// Rule-based artifact generation; needs no model and cannot fail.
#[derive(Debug, Clone)]
pub struct FallbackGenerator {
    detector: ThemeDetector,
    selector: SymbolColorSelector,
    phrases: PhraseBook,
}

impl FallbackGenerator {
    pub fn new(catalog: Arc<ThemeCatalog>, phrases: PhraseBook) -> Self {
        Self {
            detector: ThemeDetector::new(catalog.clone()),
            selector: SymbolColorSelector::new(catalog),
            phrases,
        }
    }

    pub fn fallback<R: Rng + ?Sized>(&self, intent: &str, rng: &mut R) -> Artifact {
        let theme = self.detector.detect_theme(intent);
        let (symbol, color) = self.selector.select(&theme, rng);
        let phrase = self.phrases.pick(intent, rng);

        let essence = find_concept(intent).unwrap_or_else(|| "the eternal mystery".to_string());
        let reasoning = format!(
            "When direct communion fails, the {} emerges as a beacon through the symbolic realm, chosen for its resonance with the essence of {}.",
            symbol, essence
        );

        Artifact {
            symbol,
            phrase,
            color,
            reasoning,
        }
    }
}

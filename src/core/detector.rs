use crate::core::catalog::ThemeCatalog;
use crate::core::text::{keyword_hits, tokenize};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ThemeDetector {
    catalog: Arc<ThemeCatalog>,
}

impl ThemeDetector {
    pub fn new(catalog: Arc<ThemeCatalog>) -> Self {
        Self { catalog }
    }

    /// Keyword hit count per theme, in catalog order.
    pub fn score_themes(&self, intent: &str) -> Vec<(String, usize)> {
        let tokens = tokenize(intent);
        self.catalog
            .themes()
            .iter()
            .map(|theme| (theme.name.clone(), keyword_hits(&tokens, &theme.keywords)))
            .collect()
    }

    /// Highest-scoring theme; ties go to catalog order, no hits to the default theme.
    pub fn detect_theme(&self, intent: &str) -> String {
        let scores = self.score_themes(intent);

        let mut best: Option<(&str, usize)> = None;
        for (name, score) in &scores {
            if *score == 0 {
                continue;
            }
            match best {
                Some((_, best_score)) if best_score >= *score => {}
                _ => best = Some((name.as_str(), *score)),
            }
        }

        let theme = match best {
            Some((name, _)) => name.to_string(),
            None => self.catalog.default_theme().name.clone(),
        };
        tracing::debug!("Theme scores {:?} -> {}", scores, theme);
        theme
    }
}

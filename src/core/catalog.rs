use crate::config::dream_config::MAX_POOL_WEIGHT;
use crate::config::{DreamConfig, PoolRef};
use crate::domain::model::{Theme, ETERNAL_COLOR, ETERNAL_SYMBOL};
use crate::utils::error::{DreamError, Result};
use crate::utils::validation::is_hex_color;
use std::collections::BTreeMap;

/// Immutable theme table. Iteration order is detection tie-break order.
#[derive(Debug, Clone)]
pub struct ThemeCatalog {
    themes: Vec<Theme>,
    default_index: usize,
    fallback_symbol: String,
    fallback_color: String,
}

impl ThemeCatalog {
    pub fn new(
        themes: Vec<Theme>,
        default_theme: &str,
        fallback_symbol: &str,
        fallback_color: &str,
    ) -> Result<Self> {
        if themes.is_empty() {
            return Err(DreamError::EmptyCatalog);
        }

        let default_index = match themes.iter().position(|t| t.name == default_theme) {
            Some(index) => index,
            None => {
                tracing::warn!(
                    "Default theme '{}' not in catalog, using '{}'",
                    default_theme,
                    themes[0].name
                );
                0
            }
        };

        let fallback_symbol = match fallback_symbol.trim() {
            "" => ETERNAL_SYMBOL.to_string(),
            symbol => symbol.to_string(),
        };
        let fallback_color = if is_hex_color(fallback_color) {
            fallback_color.to_string()
        } else {
            ETERNAL_COLOR.to_string()
        };

        Ok(Self {
            themes,
            default_index,
            fallback_symbol,
            fallback_color,
        })
    }

    /// Build from configuration, expanding weighted pool references by repetition.
    /// Never fails: an unusable configuration yields [`ThemeCatalog::minimal`].
    pub fn from_config(config: &DreamConfig) -> Self {
        let mut themes = Vec::with_capacity(config.themes.len());

        for theme_config in &config.themes {
            let keywords = normalize_keywords(&theme_config.keywords);
            if keywords.is_empty() && theme_config.name != config.default_theme {
                tracing::warn!(
                    "Theme '{}' has no keywords and can never be detected, skipping",
                    theme_config.name
                );
                continue;
            }

            let symbol_pool: Vec<String> =
                expand_pools(&theme_config.name, &theme_config.symbols, &config.symbols.pools)
                    .into_iter()
                    .map(|symbol| symbol.trim().to_string())
                    .filter(|symbol| !symbol.is_empty())
                    .collect();

            let color_pool: Vec<String> =
                expand_pools(&theme_config.name, &theme_config.colors, &config.colors.palettes)
                    .into_iter()
                    .filter(|color| {
                        let valid = is_hex_color(color);
                        if !valid {
                            tracing::warn!(
                                "Dropping invalid color '{}' from theme '{}'",
                                color,
                                theme_config.name
                            );
                        }
                        valid
                    })
                    .collect();

            tracing::debug!(
                "Theme '{}': {} keywords, {} symbols, {} colors",
                theme_config.name,
                keywords.len(),
                symbol_pool.len(),
                color_pool.len()
            );

            themes.push(Theme {
                name: theme_config.name.clone(),
                keywords,
                symbol_pool,
                color_pool,
            });
        }

        match Self::new(
            themes,
            &config.default_theme,
            &config.symbols.fallback,
            &config.colors.fallback,
        ) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!("{}; falling back to the minimal built-in catalog", e);
                Self::minimal()
            }
        }
    }

    /// Single hard-coded theme used when configuration yields nothing usable.
    pub fn minimal() -> Self {
        let to_strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            themes: vec![Theme {
                name: "cosmic".to_string(),
                keywords: to_strings(&["cosmic", "universe", "stars", "infinity"]),
                symbol_pool: to_strings(&["∞", "✧", "☉", "◯", "✦"]),
                color_pool: to_strings(&["#1a1a2e", "#533483", "#7f8c8d", "#2d1b69"]),
            }],
            default_index: 0,
            fallback_symbol: ETERNAL_SYMBOL.to_string(),
            fallback_color: ETERNAL_COLOR.to_string(),
        }
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Theme> {
        self.themes.iter().find(|theme| theme.name == name)
    }

    pub fn default_theme(&self) -> &Theme {
        &self.themes[self.default_index]
    }

    /// The named theme, or the default theme for unknown names.
    pub fn resolve(&self, name: &str) -> &Theme {
        self.get(name).unwrap_or_else(|| self.default_theme())
    }

    pub fn fallback_symbol(&self) -> &str {
        &self.fallback_symbol
    }

    pub fn fallback_color(&self) -> &str {
        &self.fallback_color
    }
}

fn normalize_keywords(keywords: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        let keyword = keyword.trim().to_lowercase();
        if !keyword.is_empty() && !normalized.contains(&keyword) {
            normalized.push(keyword);
        }
    }
    normalized
}

fn expand_pools(
    theme: &str,
    refs: &[PoolRef],
    pools: &BTreeMap<String, Vec<String>>,
) -> Vec<String> {
    let mut expanded = Vec::new();
    for pool_ref in refs {
        match pools.get(pool_ref.pool()) {
            Some(entries) => {
                let weight = pool_ref.weight().min(MAX_POOL_WEIGHT);
                if weight != pool_ref.weight() {
                    tracing::warn!(
                        "Theme '{}' pool '{}' weight {} clamped to {}",
                        theme,
                        pool_ref.pool(),
                        pool_ref.weight(),
                        weight
                    );
                }
                for _ in 0..weight {
                    expanded.extend(entries.iter().cloned());
                }
            }
            None => tracing::warn!(
                "Theme '{}' references unknown pool '{}'",
                theme,
                pool_ref.pool()
            ),
        }
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThemeConfig;

    fn theme(name: &str, keywords: &[&str]) -> Theme {
        Theme {
            name: name.to_string(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            symbol_pool: vec!["◊".to_string()],
            color_pool: vec!["#000000".to_string()],
        }
    }

    #[test]
    fn test_new_rejects_empty_catalog() {
        let err = ThemeCatalog::new(vec![], "cosmic", "∞", "#7f8c8d").unwrap_err();
        assert!(matches!(err, DreamError::EmptyCatalog));
    }

    #[test]
    fn test_unknown_default_uses_first_theme() {
        let catalog =
            ThemeCatalog::new(vec![theme("a", &["x"]), theme("b", &["y"])], "zzz", "∞", "#7f8c8d")
                .unwrap();
        assert_eq!(catalog.default_theme().name, "a");
        assert_eq!(catalog.resolve("missing").name, "a");
        assert_eq!(catalog.resolve("b").name, "b");
    }

    #[test]
    fn test_invalid_fallbacks_replaced() {
        let catalog = ThemeCatalog::new(vec![theme("a", &["x"])], "a", "  ", "grey").unwrap();
        assert_eq!(catalog.fallback_symbol(), ETERNAL_SYMBOL);
        assert_eq!(catalog.fallback_color(), ETERNAL_COLOR);
    }

    #[test]
    fn test_from_builtin_config_keeps_order() {
        let catalog = ThemeCatalog::from_config(&DreamConfig::builtin());
        let names: Vec<&str> = catalog.themes().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["love", "wisdom", "peace", "transformation", "power", "mystery", "quantum", "cosmic"]
        );
        assert_eq!(catalog.default_theme().name, "cosmic");
        for theme in catalog.themes() {
            assert!(!theme.keywords.is_empty());
            assert!(!theme.symbol_pool.is_empty());
            assert!(!theme.color_pool.is_empty());
        }
    }

    #[test]
    fn test_weights_expand_by_repetition() {
        let mut config = DreamConfig::builtin();
        config.symbols.pools.clear();
        config.symbols.pools.insert("a".to_string(), vec!["A".to_string()]);
        config.symbols.pools.insert("b".to_string(), vec!["B".to_string()]);
        config.themes = vec![ThemeConfig {
            name: "cosmic".to_string(),
            keywords: vec!["Space".to_string(), "space".to_string()],
            symbols: vec![
                PoolRef::Name("a".to_string()),
                PoolRef::Weighted {
                    pool: "b".to_string(),
                    weight: 3,
                },
            ],
            colors: vec![PoolRef::Name("cosmic".to_string())],
        }];

        let catalog = ThemeCatalog::from_config(&config);
        let theme = catalog.get("cosmic").unwrap();
        assert_eq!(theme.symbol_pool, vec!["A", "B", "B", "B"]);
        assert_eq!(theme.keywords, vec!["space"]);
    }

    #[test]
    fn test_oversized_weight_is_clamped() {
        let mut config = DreamConfig::builtin();
        config.symbols.pools.clear();
        config.symbols.pools.insert("a".to_string(), vec!["A".to_string()]);
        config.themes = vec![ThemeConfig {
            name: "cosmic".to_string(),
            keywords: vec!["space".to_string()],
            symbols: vec![PoolRef::Weighted {
                pool: "a".to_string(),
                weight: usize::MAX,
            }],
            colors: vec![PoolRef::Name("cosmic".to_string())],
        }];

        let catalog = ThemeCatalog::from_config(&config);
        assert_eq!(catalog.get("cosmic").unwrap().symbol_pool.len(), MAX_POOL_WEIGHT);
    }

    #[test]
    fn test_unusable_config_yields_minimal_catalog() {
        let mut config = DreamConfig::builtin();
        config.themes.clear();

        let catalog = ThemeCatalog::from_config(&config);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.default_theme().name, "cosmic");
    }

    #[test]
    fn test_keywordless_non_default_theme_skipped() {
        let mut config = DreamConfig::builtin();
        config.themes[0].keywords.clear();

        let catalog = ThemeCatalog::from_config(&config);
        assert!(catalog.get("love").is_none());
        assert_eq!(catalog.len(), DreamConfig::builtin().themes.len() - 1);
    }

    #[test]
    fn test_invalid_palette_colors_dropped() {
        let mut config = DreamConfig::builtin();
        config
            .colors
            .palettes
            .insert("cosmic".to_string(), vec!["#123456".to_string(), "navy".to_string()]);
        config.colors.palettes.insert("ethereal".to_string(), vec![]);

        let catalog = ThemeCatalog::from_config(&config);
        assert_eq!(catalog.get("cosmic").unwrap().color_pool, vec!["#123456"]);
    }
}

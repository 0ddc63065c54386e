use crate::core::catalog::ThemeCatalog;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

/// Draws a symbol and a color from a theme's expanded pools.
#[derive(Debug, Clone)]
pub struct SymbolColorSelector {
    catalog: Arc<ThemeCatalog>,
}

impl SymbolColorSelector {
    pub fn new(catalog: Arc<ThemeCatalog>) -> Self {
        Self { catalog }
    }

    pub fn select<R: Rng + ?Sized>(&self, theme_name: &str, rng: &mut R) -> (String, String) {
        let theme = self.catalog.resolve(theme_name);

        let symbol = theme
            .symbol_pool
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| self.catalog.fallback_symbol().to_string());
        let color = theme
            .color_pool
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| self.catalog.fallback_color().to_string());

        (symbol, color)
    }
}

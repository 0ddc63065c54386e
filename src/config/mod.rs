pub mod brain;
#[cfg(feature = "cli")]
pub mod cli;
pub mod defaults;
pub mod dream_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use dream_config::{
    ColorConfig, DreamConfig, ModelConfig, PhraseCategory, PhraseConfig, PoolRef, PromptTemplate,
    RepairConfig, SymbolConfig, ThemeConfig,
};

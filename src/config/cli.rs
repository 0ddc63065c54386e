use crate::utils::error::{DreamError, Result};
use crate::utils::validation::{validate_path, validate_range, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "dreamnet")]
#[command(about = "Turn an intent and a style into a symbol, a phrase and a color")]
pub struct CliConfig {
    /// Brain file holding {"intent", "style"}
    #[arg(long, default_value = "brain.json")]
    pub brain: PathBuf,

    /// Intent text; overrides the brain file
    #[arg(long)]
    pub intent: Option<String>,

    /// Style text; overrides the brain file
    #[arg(long)]
    pub style: Option<String>,

    /// JSON or TOML configuration; built-in themes are used when absent
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    #[arg(long, default_value = ".")]
    pub output_dir: String,

    /// Override model.name from the config
    #[arg(long)]
    pub model: Option<String>,

    /// Override model.timeout_seconds from the config
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Seed for reproducible symbol, color, phrase and template choices
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip the model and use the rule-based generator
    #[arg(long)]
    pub offline: bool,

    /// Show theme, concept and prompt without calling the model or writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Print the theme catalog and exit
    #[arg(long)]
    pub list_themes: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// `--intent`/`--style` take precedence; the brain file fills whatever is missing.
    pub fn needs_brain_file(&self) -> bool {
        self.intent.is_none() || self.style.is_none()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("output_dir", &self.output_dir)?;

        if let Some(timeout) = self.timeout {
            validate_range("timeout", timeout, 1, 600)?;
        }

        if let Some(model) = &self.model {
            if model.trim().is_empty() {
                return Err(DreamError::InvalidConfigValueError {
                    field: "model".to_string(),
                    value: model.clone(),
                    reason: "Model name cannot be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::parse_from(["dreamnet"]);
        assert_eq!(config.brain, PathBuf::from("brain.json"));
        assert_eq!(config.output_dir, ".");
        assert!(!config.offline);
        assert!(config.needs_brain_file());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inline_intent_and_style() {
        let config = CliConfig::parse_from([
            "dreamnet",
            "--intent",
            "find peace",
            "--style",
            "serene",
            "--seed",
            "7",
        ]);
        assert!(!config.needs_brain_file());
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_rejects_out_of_range_timeout() {
        let config = CliConfig::parse_from(["dreamnet", "--timeout", "0"]);
        assert!(config.validate().is_err());
    }
}

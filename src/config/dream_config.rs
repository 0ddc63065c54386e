use crate::config::defaults;
use crate::utils::error::{DreamError, Result};
use crate::utils::validation::{
    validate_hex_color, validate_non_empty_string, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DreamConfig {
    #[serde(default = "defaults::default_theme")]
    pub default_theme: String,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub symbols: SymbolConfig,
    #[serde(default)]
    pub colors: ColorConfig,
    #[serde(default = "defaults::themes")]
    pub themes: Vec<ThemeConfig>,
    #[serde(default = "defaults::prompts")]
    pub prompts: Vec<PromptTemplate>,
    #[serde(default)]
    pub phrases: PhraseConfig,
    #[serde(default)]
    pub repair: RepairConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub command: String,
    /// `{model}` and `{prompt}` are replaced per argument.
    pub args: Vec<String>,
    pub name: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolConfig {
    pub pools: BTreeMap<String, Vec<String>>,
    pub fallback: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub palettes: BTreeMap<String, Vec<String>>,
    pub fallback: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub symbols: Vec<PoolRef>,
    #[serde(default)]
    pub colors: Vec<PoolRef>,
}

/// Pool reference inside a theme: `"cosmic"` or `{ pool = "cosmic", weight = 3 }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PoolRef {
    Name(String),
    Weighted {
        pool: String,
        #[serde(default = "default_weight")]
        weight: usize,
    },
}

fn default_weight() -> usize {
    1
}

/// Upper bound for a pool reference weight.
pub const MAX_POOL_WEIGHT: usize = 100;

impl PoolRef {
    pub fn pool(&self) -> &str {
        match self {
            PoolRef::Name(name) => name,
            PoolRef::Weighted { pool, .. } => pool,
        }
    }

    pub fn weight(&self) -> usize {
        match self {
            PoolRef::Name(_) => 1,
            PoolRef::Weighted { weight, .. } => *weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Themes this template serves; empty means general purpose.
    #[serde(default)]
    pub themes: Vec<String>,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhraseConfig {
    pub categories: Vec<PhraseCategory>,
    pub general: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseCategory {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub phrases: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairConfig {
    pub min_reasoning_chars: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            command: defaults::DEFAULT_MODEL_COMMAND.to_string(),
            args: defaults::model_args(),
            name: defaults::DEFAULT_MODEL_NAME.to_string(),
            timeout_seconds: defaults::DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl Default for SymbolConfig {
    fn default() -> Self {
        Self {
            pools: defaults::symbol_pools(),
            fallback: crate::domain::model::ETERNAL_SYMBOL.to_string(),
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            palettes: defaults::color_palettes(),
            fallback: crate::domain::model::ETERNAL_COLOR.to_string(),
        }
    }
}

impl Default for PhraseConfig {
    fn default() -> Self {
        Self {
            categories: defaults::phrase_categories(),
            general: defaults::general_phrases(),
        }
    }
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            min_reasoning_chars: defaults::DEFAULT_MIN_REASONING_CHARS,
        }
    }
}

impl Default for DreamConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DreamConfig {
    /// 內建設定（不需要任何檔案）
    pub fn builtin() -> Self {
        Self {
            default_theme: defaults::default_theme(),
            model: ModelConfig::default(),
            symbols: SymbolConfig::default(),
            colors: ColorConfig::default(),
            themes: defaults::themes(),
            prompts: defaults::prompts(),
            phrases: PhraseConfig::default(),
            repair: RepairConfig::default(),
        }
    }

    /// 從檔案載入設定，依副檔名選擇 JSON 或 TOML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(DreamError::IoError)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") | None => Self::from_json_str(&content),
            Some(other) => Err(DreamError::InvalidConfigValueError {
                field: "config_path".to_string(),
                value: path.display().to_string(),
                reason: format!("Unsupported config extension '{}': use .json or .toml", other),
            }),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(serde_json::from_str(&processed_content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    /// Fail-closed loading: a missing, unparsable or invalid file yields the built-in config.
    pub fn load_or_builtin(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::debug!("No config file given, using built-in themes");
            return Self::builtin();
        };

        if !path.exists() {
            tracing::info!(
                "Config file {} not found, using built-in themes",
                path.display()
            );
            return Self::builtin();
        }

        let loaded = Self::from_file(path).and_then(|config| {
            config.validate()?;
            Ok(config)
        });

        match loaded {
            Ok(config) => {
                tracing::info!(
                    "Loaded config from {} ({} themes)",
                    path.display(),
                    config.themes.len()
                );
                config
            }
            Err(e) => {
                tracing::warn!(
                    "Ignoring config {}: {} ({})",
                    path.display(),
                    e,
                    e.recovery_suggestion()
                );
                Self::builtin()
            }
        }
    }

    /// 替換環境變數 (例如 ${DREAMNET_MODEL})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("model.command", &self.model.command)?;
        validate_non_empty_string("model.name", &self.model.name)?;
        validate_range("model.timeout_seconds", self.model.timeout_seconds, 1, 600)?;
        if !self.model.args.iter().any(|arg| arg.contains("{prompt}")) {
            return Err(DreamError::ConfigValidationError {
                field: "model.args".to_string(),
                message: "One argument must contain {prompt}".to_string(),
            });
        }

        validate_non_empty_string("symbols.fallback", &self.symbols.fallback)?;
        validate_hex_color("colors.fallback", &self.colors.fallback)?;
        for (name, palette) in &self.colors.palettes {
            for color in palette {
                validate_hex_color(&format!("colors.palettes.{}", name), color)?;
            }
        }

        if self.themes.is_empty() {
            return Err(DreamError::MissingConfigError {
                field: "themes".to_string(),
            });
        }

        let mut names = HashSet::new();
        for theme in &self.themes {
            validate_non_empty_string("themes.name", &theme.name)?;
            if !names.insert(theme.name.as_str()) {
                return Err(DreamError::ConfigValidationError {
                    field: "themes".to_string(),
                    message: format!("Duplicate theme '{}'", theme.name),
                });
            }
            for pool in &theme.symbols {
                if !self.symbols.pools.contains_key(pool.pool()) {
                    return Err(DreamError::InvalidConfigValueError {
                        field: format!("themes.{}.symbols", theme.name),
                        value: pool.pool().to_string(),
                        reason: "Unknown symbol pool".to_string(),
                    });
                }
                validate_range(
                    &format!("themes.{}.symbols.weight", theme.name),
                    pool.weight(),
                    1,
                    MAX_POOL_WEIGHT,
                )?;
            }
            for palette in &theme.colors {
                if !self.colors.palettes.contains_key(palette.pool()) {
                    return Err(DreamError::InvalidConfigValueError {
                        field: format!("themes.{}.colors", theme.name),
                        value: palette.pool().to_string(),
                        reason: "Unknown color palette".to_string(),
                    });
                }
                validate_range(
                    &format!("themes.{}.colors.weight", theme.name),
                    palette.weight(),
                    1,
                    MAX_POOL_WEIGHT,
                )?;
            }
        }

        if !names.contains(self.default_theme.as_str()) {
            return Err(DreamError::InvalidConfigValueError {
                field: "default_theme".to_string(),
                value: self.default_theme.clone(),
                reason: "Default theme must be one of the configured themes".to_string(),
            });
        }

        for (index, template) in self.prompts.iter().enumerate() {
            if !template.text.contains("{intent}") {
                return Err(DreamError::ConfigValidationError {
                    field: format!("prompts[{}]", index),
                    message: "Template must contain {intent}".to_string(),
                });
            }
        }

        validate_range(
            "repair.min_reasoning_chars",
            self.repair.min_reasoning_chars,
            0,
            1000,
        )?;

        Ok(())
    }
}

impl Validate for DreamConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_config_is_valid() {
        assert!(DreamConfig::builtin().validate().is_ok());
    }

    #[test]
    fn test_parse_partial_json_config_keeps_builtin_sections() {
        let json = r#"{
            "model": { "name": "llama3.2:1b", "timeout_seconds": 20 },
            "repair": { "min_reasoning_chars": 30 }
        }"#;

        let config = DreamConfig::from_json_str(json).unwrap();

        assert_eq!(config.model.name, "llama3.2:1b");
        assert_eq!(config.model.command, "ollama");
        assert_eq!(config.model.timeout_seconds, 20);
        assert_eq!(config.repair.min_reasoning_chars, 30);
        assert_eq!(config.themes.len(), defaults::themes().len());
        assert_eq!(config.default_theme, "cosmic");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml_config_with_weighted_pools() {
        let toml_content = r##"
default_theme = "sea"

[model]
name = "tiny"

[symbols.pools]
waves = ["🌊", "≋"]
stones = ["◆"]

[colors.palettes]
deep = ["#003366", "#004488"]

[[themes]]
name = "sea"
keywords = ["ocean", "tide"]
symbols = ["waves", { pool = "stones", weight = 3 }]
colors = ["deep"]
"##;

        let config = DreamConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.default_theme, "sea");
        assert_eq!(config.themes.len(), 1);
        let theme = &config.themes[0];
        assert_eq!(theme.symbols[0], PoolRef::Name("waves".to_string()));
        assert_eq!(theme.symbols[1].pool(), "stones");
        assert_eq!(theme.symbols[1].weight(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("DREAMNET_TEST_MODEL", "phi3:mini");

        let json = r#"{ "model": { "name": "${DREAMNET_TEST_MODEL}" } }"#;
        let config = DreamConfig::from_json_str(json).unwrap();
        assert_eq!(config.model.name, "phi3:mini");

        std::env::remove_var("DREAMNET_TEST_MODEL");
    }

    #[test]
    fn test_unset_env_var_is_left_untouched() {
        let json = r#"{ "model": { "name": "${DREAMNET_SURELY_UNSET_VAR}" } }"#;
        let config = DreamConfig::from_json_str(json).unwrap();
        assert_eq!(config.model.name, "${DREAMNET_SURELY_UNSET_VAR}");
    }

    #[test]
    fn test_validation_rejects_unknown_pool() {
        let json = r#"{
            "themes": [ { "name": "cosmic", "keywords": ["space"], "symbols": ["nope"] } ]
        }"#;
        let config = DreamConfig::from_json_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_palette_color() {
        let json = r#"{ "colors": { "palettes": { "cosmic": ["purple"] } } }"#;
        let config = DreamConfig::from_json_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_missing_default_theme() {
        let json = r#"{ "default_theme": "nowhere" }"#;
        let config = DreamConfig::from_json_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_out_of_range_weight() {
        let json = r#"{
            "themes": [ { "name": "cosmic", "keywords": ["space"],
                          "symbols": [ { "pool": "cosmic", "weight": 1000000000000 } ] } ]
        }"#;
        let config = DreamConfig::from_json_str(json).unwrap();
        assert!(matches!(
            config.validate(),
            Err(DreamError::InvalidConfigValueError { ref field, .. }) if field == "themes.cosmic.symbols.weight"
        ));

        let json = r#"{
            "themes": [ { "name": "cosmic", "keywords": ["space"],
                          "colors": [ { "pool": "cosmic", "weight": 0 } ] } ]
        }"#;
        let config = DreamConfig::from_json_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let json = r#"{ "model": { "timeout_seconds": 0 } }"#;
        let config = DreamConfig::from_json_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        temp_file
            .write_all(br#"{ "model": { "name": "file-model" } }"#)
            .unwrap();

        let config = DreamConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.model.name, "file-model");
    }

    #[test]
    fn test_load_or_builtin_on_invalid_json() {
        let mut temp_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        temp_file.write_all(b"{ not json").unwrap();

        let config = DreamConfig::load_or_builtin(Some(temp_file.path()));
        assert_eq!(config.themes.len(), defaults::themes().len());
        assert_eq!(config.model.name, defaults::DEFAULT_MODEL_NAME);
    }

    #[test]
    fn test_load_or_builtin_on_missing_file() {
        let config = DreamConfig::load_or_builtin(Some(Path::new("/definitely/not/here.json")));
        assert_eq!(config.default_theme, "cosmic");
    }
}

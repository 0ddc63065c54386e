use thiserror::Error;

#[derive(Error, Debug)]
pub enum DreamError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Model command not found: {command}")]
    ModelNotFound { command: String },

    #[error("Model exited with status {status}: {stderr}")]
    ModelExitError { status: String, stderr: String },

    #[error("Model call timed out after {seconds}s")]
    ModelTimeout { seconds: u64 },

    #[error("Model unavailable: {reason}")]
    ModelUnavailable { reason: String },

    #[error("Invalid brain file '{path}': {message}")]
    InvalidBrain { path: String, message: String },

    #[error("Theme catalog has no themes")]
    EmptyCatalog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Model,
    Input,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DreamError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DreamError::ConfigValidationError { .. }
            | DreamError::InvalidConfigValueError { .. }
            | DreamError::MissingConfigError { .. }
            | DreamError::TomlError(_) => ErrorCategory::Configuration,
            DreamError::ModelNotFound { .. }
            | DreamError::ModelExitError { .. }
            | DreamError::ModelTimeout { .. }
            | DreamError::ModelUnavailable { .. } => ErrorCategory::Model,
            DreamError::InvalidBrain { .. } | DreamError::SerializationError(_) => {
                ErrorCategory::Input
            }
            DreamError::IoError(_) | DreamError::EmptyCatalog => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 模型錯誤一律走 fallback，不影響結果
            DreamError::ModelNotFound { .. }
            | DreamError::ModelExitError { .. }
            | DreamError::ModelTimeout { .. }
            | DreamError::ModelUnavailable { .. } => ErrorSeverity::Low,
            DreamError::ConfigValidationError { .. }
            | DreamError::InvalidConfigValueError { .. }
            | DreamError::MissingConfigError { .. }
            | DreamError::TomlError(_) => ErrorSeverity::Medium,
            DreamError::InvalidBrain { .. }
            | DreamError::SerializationError(_)
            | DreamError::IoError(_) => ErrorSeverity::High,
            DreamError::EmptyCatalog => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            DreamError::ModelNotFound { command } => format!(
                "Install '{}' and make sure it is on PATH, or run with --offline",
                command
            ),
            DreamError::ModelExitError { .. } => {
                "Check that the model is pulled locally (e.g. `ollama pull <model>`)".to_string()
            }
            DreamError::ModelTimeout { .. } => {
                "Increase model.timeout_seconds or use a smaller model".to_string()
            }
            DreamError::ModelUnavailable { .. } => {
                "The rule-based fallback was used; nothing to do".to_string()
            }
            DreamError::ConfigValidationError { .. }
            | DreamError::InvalidConfigValueError { .. }
            | DreamError::MissingConfigError { .. }
            | DreamError::TomlError(_) => {
                "Fix the configuration file or remove it to use the built-in themes".to_string()
            }
            DreamError::InvalidBrain { .. } | DreamError::SerializationError(_) => {
                "Brain files must be JSON objects with \"intent\" and \"style\" strings".to_string()
            }
            DreamError::IoError(_) => {
                "Check that the paths exist and are writable".to_string()
            }
            DreamError::EmptyCatalog => {
                "At least one theme must be defined; this is a build defect".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Model => format!("The oracle is silent: {}", self),
            ErrorCategory::Input => format!("Could not read the dream input: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

impl ErrorSeverity {
    /// 根據錯誤嚴重程度決定退出碼
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,      // 警告，但成功
            ErrorSeverity::Medium => 2,   // 設定錯誤
            ErrorSeverity::High => 1,     // 輸入或寫檔錯誤
            ErrorSeverity::Critical => 3, // 系統錯誤
        }
    }
}

pub type Result<T> = std::result::Result<T, DreamError>;

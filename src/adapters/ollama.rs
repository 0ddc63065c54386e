use crate::config::ModelConfig;
use crate::domain::ports::ModelInvoker;
use crate::utils::error::{DreamError, Result};
use async_trait::async_trait;
use regex::{Captures, Regex};
use std::process::Stdio;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::process::Command;

fn arg_placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{(model|prompt)\}").expect("static regex"))
}

/// Runs a local model as a subprocess, e.g. `ollama run qwen3:1.7b "<prompt>"`.
///
/// The child is killed when the deadline passes.
#[derive(Debug, Clone)]
pub struct OllamaCommand {
    command: String,
    args: Vec<String>,
    model: String,
    timeout: Duration,
}

impl OllamaCommand {
    pub fn new(command: impl Into<String>, args: Vec<String>, model: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args,
            model: model.into(),
            timeout: Duration::from_secs(crate::config::defaults::DEFAULT_TIMEOUT_SECONDS),
        }
    }

    pub fn from_config(config: &ModelConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone(), config.name.clone())
            .with_timeout(Duration::from_secs(config.timeout_seconds))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `{model}` and `{prompt}` substituted in one pass per argument.
    fn render_args(&self, prompt: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                arg_placeholder_regex()
                    .replace_all(arg, |caps: &Captures| match &caps[1] {
                        "model" => self.model.clone(),
                        _ => prompt.to_string(),
                    })
                    .into_owned()
            })
            .collect()
    }
}

#[async_trait]
impl ModelInvoker for OllamaCommand {
    async fn invoke(&self, prompt: &str) -> Result<String> {
        let args = self.render_args(prompt);
        tracing::debug!(
            "Running {} with {} args (timeout {:?})",
            self.command,
            args.len(),
            self.timeout
        );

        let mut command = Command::new(&self.command);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DreamError::ModelNotFound {
                    command: self.command.clone(),
                })
            }
            Ok(Err(e)) => return Err(DreamError::IoError(e)),
            Err(_) => {
                return Err(DreamError::ModelTimeout {
                    seconds: self.timeout.as_secs(),
                })
            }
        };

        if !output.status.success() {
            return Err(DreamError::ModelExitError {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let response = String::from_utf8_lossy(&output.stdout).trim().to_string();
        tracing::debug!("Model answered with {} bytes", response.len());
        Ok(response)
    }

    fn describe(&self) -> String {
        self.model.clone()
    }
}

/// Always reports "no response"; forces the rule-based generator.
#[derive(Debug, Clone, Default)]
pub struct OfflineInvoker;

#[async_trait]
impl ModelInvoker for OfflineInvoker {
    async fn invoke(&self, _prompt: &str) -> Result<String> {
        Err(DreamError::ModelUnavailable {
            reason: "offline mode".to_string(),
        })
    }

    fn describe(&self) -> String {
        "offline".to_string()
    }
}

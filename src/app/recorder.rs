use crate::domain::model::{Artifact, DreamOutcome};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use chrono::{DateTime, Local};

pub const OUTPUT_FILE: &str = "output.json";
pub const LOGS_DIR: &str = "logs";
pub const ECHOES_DIR: &str = "echoes";

/// Where one recorded dream landed, relative to the storage root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPaths {
    pub output: String,
    pub log: String,
    pub echo: String,
}

/// Writes the flat-file trail of a dream: `output.json`, a session log and the concept's echo journal.
pub struct DreamRecorder<S: Storage> {
    storage: S,
    model_name: String,
}

impl<S: Storage> DreamRecorder<S> {
    pub fn new(storage: S, model_name: impl Into<String>) -> Self {
        Self {
            storage,
            model_name: model_name.into(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub async fn save_output(&self, artifact: &Artifact) -> Result<String> {
        let json = serde_json::to_string_pretty(artifact)?;
        self.storage.write_file(OUTPUT_FILE, json.as_bytes()).await?;
        Ok(OUTPUT_FILE.to_string())
    }

    pub async fn log_session(&self, outcome: &DreamOutcome) -> Result<String> {
        let path = format!("{}/{}", LOGS_DIR, session_log_name(&outcome.timestamp));
        let content = render_session_log(outcome, &self.model_name)?;
        self.storage.write_file(&path, content.as_bytes()).await?;
        Ok(path)
    }

    pub async fn append_echo(&self, outcome: &DreamOutcome) -> Result<String> {
        let path = format!("{}/{}.md", ECHOES_DIR, outcome.concept);

        let mut content = String::new();
        if !self.storage.exists(&path).await {
            content.push_str(&format!("# {} Echoes\n\n", title_case(&outcome.concept)));
        }
        content.push_str(&render_echo_entry(outcome));

        self.storage.append_file(&path, content.as_bytes()).await?;
        Ok(path)
    }

    pub async fn record(&self, outcome: &DreamOutcome) -> Result<RecordedPaths> {
        let output = self.save_output(&outcome.artifact).await?;
        let log = self.log_session(outcome).await?;
        let echo = self.append_echo(outcome).await?;

        tracing::info!("💾 Saved {}, {} and {}", output, log, echo);
        Ok(RecordedPaths { output, log, echo })
    }
}

/// `seed_2024-01-15-143022-123.log`
pub fn session_log_name(timestamp: &DateTime<Local>) -> String {
    format!("seed_{}.log", timestamp.format("%Y-%m-%d-%H%M%S-%3f"))
}

pub fn render_session_log(outcome: &DreamOutcome, model_name: &str) -> Result<String> {
    let result = serde_json::to_string_pretty(&outcome.artifact)?;
    let response = match outcome.raw_response.as_deref() {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => "No response",
    };

    Ok(format!(
        "=== DREAMNET SESSION LOG ===\n\
         Timestamp: {}\n\
         Model: {}\n\
         Theme: {}\n\
         Concept: {}\n\
         Source: {}\n\n\
         PROMPT SENT:\n{}\n\n\
         RAW RESPONSE:\n{}\n\n\
         PARSED RESULT:\n{}\n",
        outcome.timestamp.to_rfc3339(),
        model_name,
        outcome.theme,
        outcome.concept,
        outcome.source.as_str(),
        outcome.prompt,
        response,
        result
    ))
}

pub fn render_echo_entry(outcome: &DreamOutcome) -> String {
    let artifact = &outcome.artifact;
    format!(
        "## {}\n**Symbol**: {}  \n**Phrase**: {}  \n**Color**: {}  \n**Reasoning**: {}\n\n",
        outcome.timestamp.format("%Y-%m-%d-%H%M"),
        artifact.symbol,
        artifact.phrase,
        artifact.color,
        artifact.reasoning
    )
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::LocalStorage;
    use crate::domain::model::ArtifactSource;
    use tempfile::TempDir;

    fn outcome(concept: &str, raw: Option<&str>) -> DreamOutcome {
        DreamOutcome {
            artifact: Artifact::eternal(),
            source: ArtifactSource::Fallback,
            theme: "cosmic".to_string(),
            concept: concept.to_string(),
            prompt: "Intent: x".to_string(),
            raw_response: raw.map(str::to_string),
            timestamp: Local::now(),
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("love"), "Love");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_session_log_without_response() {
        let log = render_session_log(&outcome("love", None), "qwen3:1.7b").unwrap();
        assert!(log.starts_with("=== DREAMNET SESSION LOG ==="));
        assert!(log.contains("Model: qwen3:1.7b"));
        assert!(log.contains("RAW RESPONSE:\nNo response"));
        assert!(log.contains("Source: fallback"));
        assert!(log.contains("\"symbol\": \"∞\""));
    }

    #[test]
    fn test_session_log_name() {
        let name = session_log_name(&Local::now());
        assert!(name.starts_with("seed_"));
        assert!(name.ends_with(".log"));
        assert!(!name.contains(':'));
    }

    #[tokio::test]
    async fn test_echo_header_written_once() {
        let dir = TempDir::new().unwrap();
        let recorder = DreamRecorder::new(
            LocalStorage::new(dir.path().to_string_lossy().to_string()),
            "m",
        );

        recorder.append_echo(&outcome("love", None)).await.unwrap();
        recorder.append_echo(&outcome("love", None)).await.unwrap();

        let content = std::fs::read_to_string(dir.path().join("echoes/love.md")).unwrap();
        assert!(content.starts_with("# Love Echoes\n\n## "));
        assert_eq!(content.matches("# Love Echoes").count(), 1);
        assert_eq!(content.matches("**Symbol**: ∞").count(), 2);
    }
}

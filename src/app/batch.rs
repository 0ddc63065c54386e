use crate::app::recorder::DreamRecorder;
use crate::config::brain::load_brain;
use crate::core::dream::DreamEngine;
use crate::domain::model::{Artifact, ArtifactSource};
use crate::domain::ports::{ModelInvoker, Storage};
use crate::utils::error::Result;
use crate::utils::monitor::SessionStats;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

pub const BATCH_REPORT_FILE: &str = "batch_report.json";

#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub name: String,
    pub brain_path: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concept: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ArtifactSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<Artifact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchEntry {
    fn failed(name: &str, brain_path: &str, error: String) -> Self {
        Self {
            name: name.to_string(),
            brain_path: brain_path.to_string(),
            success: false,
            theme: None,
            concept: None,
            source: None,
            artifact: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub model: String,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.success).count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.succeeded()
    }
}

/// Dreams every brain file in order and records each result.
pub struct BatchRunner<'a, M: ModelInvoker, S: Storage> {
    engine: &'a DreamEngine<M>,
    recorder: &'a DreamRecorder<S>,
    pause: Duration,
}

impl<'a, M: ModelInvoker, S: Storage> BatchRunner<'a, M, S> {
    pub fn new(engine: &'a DreamEngine<M>, recorder: &'a DreamRecorder<S>) -> Self {
        Self {
            engine,
            recorder,
            pause: Duration::ZERO,
        }
    }

    /// Pause between two brains (not after the last one).
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// A broken brain file or a failed write marks that entry as failed; the batch goes on.
    pub async fn run(
        &self,
        brains: &[(String, PathBuf)],
        stats: &mut SessionStats,
    ) -> Result<BatchReport> {
        let started_at = Local::now();
        let mut entries = Vec::with_capacity(brains.len());

        tracing::info!("🚀 Starting batch with {} brain files", brains.len());

        for (index, (name, path)) in brains.iter().enumerate() {
            if index > 0 && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }

            let brain_path = path.display().to_string();
            tracing::info!("🔄 Processing: {}", name);

            let brain = match load_brain(path) {
                Ok(brain) => brain,
                Err(e) => {
                    tracing::warn!("❌ Skipping {}: {}", name, e);
                    entries.push(BatchEntry::failed(name, &brain_path, e.to_string()));
                    continue;
                }
            };

            let outcome = self.engine.dream(&brain).await;
            stats.record(&outcome);

            let error = match self.recorder.record(&outcome).await {
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!("❌ Could not record {}: {}", name, e);
                    Some(e.to_string())
                }
            };

            entries.push(BatchEntry {
                name: name.clone(),
                brain_path,
                success: error.is_none(),
                theme: Some(outcome.theme),
                concept: Some(outcome.concept),
                source: Some(outcome.source),
                artifact: Some(outcome.artifact),
                error,
            });
        }

        let report = BatchReport {
            model: self.engine.model().describe(),
            started_at,
            finished_at: Local::now(),
            entries,
        };

        let json = serde_json::to_string_pretty(&report)?;
        self.recorder
            .storage()
            .write_file(BATCH_REPORT_FILE, json.as_bytes())
            .await?;

        tracing::info!(
            "🌟 Batch complete: {} succeeded, {} failed",
            report.succeeded(),
            report.failed()
        );
        Ok(report)
    }
}

pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{LocalStorage, OfflineInvoker, OllamaCommand};
pub use app::{BatchReport, BatchRunner, DreamRecorder};
pub use config::DreamConfig;
pub use core::{DreamEngine, ThemeCatalog};
pub use domain::model::{Artifact, ArtifactSource, Brain, DreamOutcome};
pub use domain::ports::ModelInvoker;
pub use utils::error::{DreamError, Result};

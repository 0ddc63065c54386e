pub mod catalog;
pub mod concept;
pub mod detector;
pub mod dream;
pub mod fallback;
pub mod prompt;
pub mod repair;
pub mod selector;
pub mod text;

pub use crate::domain::model::{Artifact, ArtifactSource, Brain, DreamOutcome, DreamPreview};
pub use crate::domain::ports::{ModelInvoker, Storage};
pub use crate::utils::error::Result;
pub use catalog::ThemeCatalog;
pub use concept::extract_concept;
pub use detector::ThemeDetector;
pub use dream::DreamEngine;
pub use fallback::{FallbackGenerator, PhraseBook};
pub use prompt::PromptBuilder;
pub use repair::{RepairFailure, RepairReport, ResponseRepairer};
pub use selector::SymbolColorSelector;

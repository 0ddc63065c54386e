use crate::config::DreamConfig;
use crate::core::catalog::ThemeCatalog;
use crate::core::concept::extract_concept;
use crate::core::detector::ThemeDetector;
use crate::core::fallback::{FallbackGenerator, PhraseBook};
use crate::core::prompt::PromptBuilder;
use crate::core::repair::ResponseRepairer;
use crate::domain::model::{Artifact, ArtifactSource, Brain, DreamOutcome, DreamPreview};
use crate::domain::ports::ModelInvoker;
use chrono::Local;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};

/// 主要流程：偵測主題 → 建立 prompt → 呼叫模型 → 修復或 fallback
///
/// `generate` and `dream` never fail. Each call draws its own RNG seed from the
/// engine's generator, so concurrent calls do not share random draws.
pub struct DreamEngine<M: ModelInvoker> {
    catalog: Arc<ThemeCatalog>,
    detector: ThemeDetector,
    prompts: PromptBuilder,
    repairer: ResponseRepairer,
    fallback: FallbackGenerator,
    model: M,
    seeds: Mutex<StdRng>,
}

impl<M: ModelInvoker> DreamEngine<M> {
    pub fn new(config: &DreamConfig, model: M) -> Self {
        Self::with_rng(config, model, StdRng::from_entropy())
    }

    /// Same seed, same model answers: same artifacts.
    pub fn with_seed(config: &DreamConfig, model: M, seed: u64) -> Self {
        Self::with_rng(config, model, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &DreamConfig, model: M, rng: StdRng) -> Self {
        let catalog = Arc::new(ThemeCatalog::from_config(config));
        tracing::debug!(
            "Dream engine ready: {} themes, {} prompt templates, model {}",
            catalog.len(),
            config.prompts.len(),
            model.describe()
        );

        Self {
            detector: ThemeDetector::new(catalog.clone()),
            prompts: PromptBuilder::new(config.prompts.clone()),
            repairer: ResponseRepairer::new(catalog.clone(), config.repair.min_reasoning_chars),
            fallback: FallbackGenerator::new(catalog.clone(), PhraseBook::new(&config.phrases)),
            catalog,
            model,
            seeds: Mutex::new(rng),
        }
    }

    pub fn catalog(&self) -> &Arc<ThemeCatalog> {
        &self.catalog
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    fn call_rng(&self) -> StdRng {
        let seed: u64 = match self.seeds.lock() {
            Ok(mut seeds) => seeds.gen(),
            Err(poisoned) => poisoned.into_inner().gen(),
        };
        StdRng::seed_from_u64(seed)
    }

    /// Theme scores, concept and prompt without calling the model.
    pub fn preview(&self, brain: &Brain) -> DreamPreview {
        let mut rng = self.call_rng();
        let theme_scores = self.detector.score_themes(&brain.intent);
        let theme = self.detector.detect_theme(&brain.intent);
        let prompt = self
            .prompts
            .build_prompt(&brain.intent, &brain.style, Some(theme.as_str()), &mut rng);

        DreamPreview {
            theme,
            theme_scores,
            concept: extract_concept(&brain.intent),
            prompt,
        }
    }

    pub async fn generate(&self, intent: &str, style: &str) -> Artifact {
        self.dream(&Brain::new(intent, style)).await.artifact
    }

    pub async fn dream(&self, brain: &Brain) -> DreamOutcome {
        let mut rng = self.call_rng();

        let theme = self.detector.detect_theme(&brain.intent);
        let concept = extract_concept(&brain.intent);
        let prompt = self
            .prompts
            .build_prompt(&brain.intent, &brain.style, Some(theme.as_str()), &mut rng);
        tracing::info!("🌙 Dreaming: theme '{}', concept '{}'", theme, concept);
        tracing::debug!("Prompt:\n{}", prompt);

        let raw_response = match self.model.invoke(&prompt).await {
            Ok(response) => Some(response),
            Err(e) => {
                tracing::warn!("Model gave no response: {}", e);
                None
            }
        };

        let (artifact, source) =
            match self
                .repairer
                .repair_with_report(raw_response.as_deref(), &brain.intent, &mut rng)
            {
                Ok((artifact, report)) if report.is_clean() => (artifact, ArtifactSource::Model),
                Ok((artifact, report)) => {
                    tracing::info!("Repaired model response: {:?}", report);
                    (artifact, ArtifactSource::Repaired)
                }
                Err(failure) => {
                    tracing::warn!("{}, using fallback generator", failure);
                    (
                        self.fallback.fallback(&brain.intent, &mut rng),
                        ArtifactSource::Fallback,
                    )
                }
            };

        let (artifact, source) = if artifact.is_complete() {
            (artifact, source)
        } else {
            tracing::warn!("Incomplete artifact {:?}, using eternal artifact", artifact);
            (Artifact::eternal(), ArtifactSource::Fallback)
        };

        tracing::info!(
            "✨ {} {} ({}) via {}",
            artifact.symbol,
            artifact.color,
            artifact.phrase,
            source.as_str()
        );

        DreamOutcome {
            artifact,
            source,
            theme,
            concept,
            prompt,
            raw_response,
            timestamp: Local::now(),
        }
    }
}

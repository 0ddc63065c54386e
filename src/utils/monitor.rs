use crate::domain::model::{ArtifactSource, DreamOutcome};
use std::collections::BTreeSet;
use std::fmt;
use std::time::{Duration, Instant};

/// 一次執行期間的統計資料
#[derive(Debug, Clone)]
pub struct SessionStats {
    pub dreams_generated: usize,
    pub model_accepted: usize,
    pub repaired: usize,
    pub fallbacks_used: usize,
    pub themes_explored: BTreeSet<String>,
    start_time: Instant,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            dreams_generated: 0,
            model_accepted: 0,
            repaired: 0,
            fallbacks_used: 0,
            themes_explored: BTreeSet::new(),
            start_time: Instant::now(),
        }
    }

    pub fn record(&mut self, outcome: &DreamOutcome) {
        self.dreams_generated += 1;
        match outcome.source {
            ArtifactSource::Model => self.model_accepted += 1,
            ArtifactSource::Repaired => self.repaired += 1,
            ArtifactSource::Fallback => self.fallbacks_used += 1,
        }
        self.themes_explored.insert(outcome.theme.clone());
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn log_summary(&self) {
        tracing::info!(
            dreams = self.dreams_generated,
            model = self.model_accepted,
            repaired = self.repaired,
            fallback = self.fallbacks_used,
            themes = self.themes_explored.len(),
            elapsed_ms = self.elapsed().as_millis() as u64,
            "Session summary"
        );
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📊 Session Statistics:")?;
        writeln!(f, "  Session time: {:.1}s", self.elapsed().as_secs_f64())?;
        writeln!(f, "  Dreams generated: {}", self.dreams_generated)?;
        writeln!(f, "  Oracle answers: {}", self.model_accepted)?;
        writeln!(f, "  Repaired answers: {}", self.repaired)?;
        writeln!(f, "  Fallbacks used: {}", self.fallbacks_used)?;
        let themes: Vec<&str> = self.themes_explored.iter().map(String::as_str).collect();
        write!(
            f,
            "  Themes explored: {} ({})",
            themes.len(),
            themes.join(", ")
        )
    }
}

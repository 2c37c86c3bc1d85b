use std::fmt;

/// Non-fatal problem encountered during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunWarning {
    /// Refresh failed and an expired cached list was used instead.
    StaleFrequencyList { age_days: i64, reason: String },
    DefinitionLookup { word: String, reason: String },
    /// Output is valid but the next run may report the same words again.
    CheckpointWrite { reason: String },
}

impl fmt::Display for RunWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleFrequencyList { age_days, reason } => write!(
                f,
                "using frequency list cached {age_days} days ago (refresh failed: {reason})"
            ),
            Self::DefinitionLookup { word, reason } => {
                write!(f, "no definition for '{word}': {reason}")
            }
            Self::CheckpointWrite { reason } => write!(
                f,
                "could not save last access time ({reason}); the same words may be reported again"
            ),
        }
    }
}

/// Warnings collected over a run, reported together at the end.
#[derive(Debug, Default, Clone)]
pub struct RunReport {
    warnings: Vec<RunWarning>,
}

impl RunReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, warning: RunWarning) {
        tracing::warn!("{warning}");
        self.warnings.push(warning);
    }

    #[must_use]
    pub fn warnings(&self) -> &[RunWarning] {
        &self.warnings
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

//! Session composition: which sentences get played, in which order.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::content::Sentence;
use crate::error::ValidationError;

/// Ordered sentences for one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionQueue {
    sentences: Vec<Sentence>,
    recovery: bool,
}

impl SessionQueue {
    pub fn new(sentences: Vec<Sentence>) -> Self {
        Self {
            sentences,
            recovery: false,
        }
    }

    /// A replay of failed sentences; nothing it produces is persisted.
    pub fn recovery(sentences: Vec<Sentence>) -> Self {
        Self {
            sentences,
            recovery: true,
        }
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn get(&self, index: usize) -> Option<&Sentence> {
        self.sentences.get(index)
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn is_recovery(&self) -> bool {
        self.recovery
    }
}

/// What the learner asked to practise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Scenario labels in block order.
    pub scenarios: Vec<String>,
    pub per_scenario: usize,
    /// Fixed RNG seed for reproducible shuffles.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SessionConfig {
    /// # Errors
    /// Returns an error for an empty scenario selection or a zero quota.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.scenarios.is_empty() {
            return Err(ValidationError::EmptyCollection(
                "no scenarios selected".into(),
            ));
        }
        if self.per_scenario == 0 {
            return Err(ValidationError::InvalidValue {
                field: "per_scenario".into(),
                message: "must be a positive number".into(),
            });
        }
        Ok(())
    }
}

/// Build the first queue of a session.
///
/// Scenarios are visited in the given order. Each contributes a uniformly
/// shuffled sample of at most `quota` of its sentences. A scenario named
/// twice only contributes once; an unknown scenario contributes nothing.
pub fn compose<R: Rng + ?Sized>(
    scenarios: &[String],
    quota: usize,
    catalog: &[Sentence],
    rng: &mut R,
) -> SessionQueue {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for scenario in scenarios {
        if !seen.insert(scenario.as_str()) {
            continue;
        }
        let mut block: Vec<Sentence> = catalog
            .iter()
            .filter(|s| s.scenario() == scenario.as_str())
            .cloned()
            .collect();
        block.shuffle(rng);
        block.truncate(quota);
        tracing::debug!(scenario = %scenario, taken = block.len(), "composed scenario block");
        out.extend(block);
    }

    SessionQueue::new(out)
}

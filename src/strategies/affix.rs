//! Prefix × name × suffix composition under a combinatorial budget

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::lexicon::{PREFIXES, SUFFIXES};
use crate::error::{NameForgeError, Result};
use crate::limiter::compute_limits;
use crate::pipeline::{CandidateStream, Generates};
use crate::types::{CandidateRecord, Interpretation};

/// Composes the name with optional prefixes and suffixes.
///
/// Each factor is shuffled with the pipeline's generator and capped by
/// [`compute_limits`], so the product never exceeds the budget.
#[derive(Debug, Clone)]
pub struct AffixStrategy {
    prefixes: Vec<String>,
    suffixes: Vec<String>,
    budget: u64,
}

impl AffixStrategy {
    /// Strategy over the bundled prefix and suffix lists
    pub fn new(budget: u64) -> Self {
        Self::with_words(PREFIXES.iter().copied(), SUFFIXES.iter().copied(), budget)
    }

    pub fn with_words<P, S>(prefixes: P, suffixes: S, budget: u64) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
            suffixes: suffixes.into_iter().map(Into::into).collect(),
            budget,
        }
    }
}

impl Generates for AffixStrategy {
    fn generate(
        &self,
        _input: &str,
        interpretation: &Interpretation,
        limit: usize,
        mut rng: StdRng,
    ) -> Result<CandidateStream> {
        if interpretation.is_empty() {
            return Ok(Box::new(std::iter::empty()));
        }

        let mut prefixes = self.prefixes.clone();
        let mut suffixes = self.suffixes.clone();
        prefixes.shuffle(&mut rng);
        suffixes.shuffle(&mut rng);

        // The "no affix" option counts towards each factor; the name itself
        // is a single-option factor.
        let sizes = [prefixes.len() as u64 + 1, 1, suffixes.len() as u64 + 1];
        let caps = compute_limits(&sizes, self.budget)
            .map_err(|e| NameForgeError::pipeline("affix", e.to_string()))?;

        let options = |words: Vec<String>, cap: u64| -> Vec<Option<String>> {
            std::iter::once(None)
                .chain(words.into_iter().map(Some))
                .take(cap as usize)
                .collect()
        };

        let combinations = AffixCombinations::new(
            options(prefixes, caps[0]),
            interpretation.tokens.clone(),
            options(suffixes, caps[2]),
        );
        Ok(Box::new(combinations.take(limit).map(Ok)))
    }
}

/// Lazy walk over the prefix/suffix grid by mixed-radix index
struct AffixCombinations {
    prefixes: Vec<Option<String>>,
    base: Vec<String>,
    suffixes: Vec<Option<String>>,
    current_index: usize,
    total: usize,
}

impl AffixCombinations {
    fn new(prefixes: Vec<Option<String>>, base: Vec<String>, suffixes: Vec<Option<String>>) -> Self {
        let total = prefixes.len() * suffixes.len();
        Self {
            prefixes,
            base,
            suffixes,
            current_index: 0,
            total,
        }
    }

    fn candidate_at(&self, index: usize) -> Option<CandidateRecord> {
        let prefix = &self.prefixes[index / self.suffixes.len()];
        let suffix = &self.suffixes[index % self.suffixes.len()];
        if prefix.is_none() && suffix.is_none() {
            // That's just the input again.
            return None;
        }

        let tokens = prefix
            .iter()
            .chain(self.base.iter())
            .chain(suffix.iter())
            .cloned();
        Some(CandidateRecord::new(tokens))
    }
}

impl Iterator for AffixCombinations {
    type Item = CandidateRecord;

    fn next(&mut self) -> Option<Self::Item> {
        while self.current_index < self.total {
            let index = self.current_index;
            self.current_index += 1;
            if let Some(candidate) = self.candidate_at(index) {
                return Some(candidate);
            }
        }
        None
    }
}

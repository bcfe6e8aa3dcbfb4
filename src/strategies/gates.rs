//! Gates for the bundled strategies

use crate::error::Result;
use crate::pipeline::Gates;
use crate::types::Interpretation;

/// Runs only when the stripped name length lies in `min..max`
#[derive(Debug, Clone, Copy)]
pub struct StrippedLength {
    min: usize,
    max: usize,
}

impl StrippedLength {
    /// Strictly shorter than `max` characters, and not empty
    pub fn below(max: usize) -> Self {
        Self { min: 1, max }
    }

    pub fn between(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

impl Gates for StrippedLength {
    fn should_run(&self, _input: &str, interpretation: &Interpretation) -> Result<bool> {
        let len = interpretation.stripped().chars().count();
        Ok(len >= self.min && len < self.max)
    }
}

/// Runs only for interpretations with more than one token
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiToken;

impl Gates for MultiToken {
    fn should_run(&self, _input: &str, interpretation: &Interpretation) -> Result<bool> {
        Ok(interpretation.tokens.iter().filter(|t| !t.is_empty()).count() > 1)
    }
}

//! Hyphenated form of multi-word names (`cat dog` -> `cat-dog`)

use rand::rngs::StdRng;

use crate::error::Result;
use crate::pipeline::{CandidateStream, Generates};
use crate::types::{CandidateRecord, Interpretation};

#[derive(Debug, Clone, Copy, Default)]
pub struct HyphenStrategy;

impl Generates for HyphenStrategy {
    fn generate(
        &self,
        _input: &str,
        interpretation: &Interpretation,
        limit: usize,
        _rng: StdRng,
    ) -> Result<CandidateStream> {
        let words: Vec<&String> = interpretation.tokens.iter().filter(|t| !t.is_empty()).collect();
        if words.len() < 2 {
            return Ok(Box::new(std::iter::empty()));
        }

        let mut tokens = Vec::with_capacity(words.len() * 2 - 1);
        for (i, word) in words.into_iter().enumerate() {
            if i > 0 {
                tokens.push("-".to_string());
            }
            tokens.push(word.clone());
        }
        Ok(Box::new(std::iter::once(Ok(CandidateRecord::new(tokens))).take(limit)))
    }
}

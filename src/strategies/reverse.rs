//! Reversed-name strategy (`stack` -> `kcats`)

use rand::rngs::StdRng;

use crate::error::Result;
use crate::pipeline::{CandidateStream, Generates};
use crate::types::{CandidateRecord, Interpretation};

/// Spells the name backwards. Palindromes produce nothing.
///
/// Reversal only reads well on short names; pair it with a
/// [`StrippedLength`](super::StrippedLength) gate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReverseStrategy;

impl Generates for ReverseStrategy {
    fn generate(
        &self,
        _input: &str,
        interpretation: &Interpretation,
        limit: usize,
        _rng: StdRng,
    ) -> Result<CandidateStream> {
        let stripped = interpretation.stripped();
        let tokens: Vec<String> = interpretation
            .tokens
            .iter()
            .rev()
            .map(|t| t.chars().rev().collect())
            .collect();
        let candidate = CandidateRecord::new(tokens);

        if candidate.text().is_empty() || candidate.text() == stripped {
            return Ok(Box::new(std::iter::empty()));
        }
        Ok(Box::new(std::iter::once(Ok(candidate)).take(limit)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RngContext;

    fn run(tokens: &[&str]) -> Vec<CandidateRecord> {
        ReverseStrategy
            .generate("", &Interpretation::new(tokens.iter().copied()), 10, RngContext::new("t").fork("r"))
            .unwrap()
            .map(|r| r.unwrap())
            .collect()
    }

    #[test]
    fn test_reverses_tokens_and_order() {
        let out = run(&["cat", "dog"]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text(), "godtac");
        assert_eq!(out[0].tokens(), ["god", "tac"]);
    }

    #[test]
    fn test_palindrome_and_empty_yield_nothing() {
        assert!(run(&["level"]).is_empty());
        assert!(run(&[]).is_empty());
    }
}

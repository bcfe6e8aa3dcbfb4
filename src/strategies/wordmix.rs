//! Pairs the name with a random sample of curated words

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::lexicon::WORDS;
use crate::error::Result;
use crate::pipeline::{CandidateStream, Generates};
use crate::types::{CandidateRecord, Interpretation};

/// Joins the name with `sample` randomly chosen words, word last then
/// word first (`forgecloud`, `cloudforge`).
#[derive(Debug, Clone)]
pub struct WordMixStrategy {
    words: Vec<String>,
    sample: usize,
}

impl WordMixStrategy {
    pub fn new(sample: usize) -> Self {
        Self::with_words(WORDS.iter().copied(), sample)
    }

    pub fn with_words<I>(words: I, sample: usize) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
            sample,
        }
    }
}

impl Generates for WordMixStrategy {
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

        let base = interpretation.tokens.clone();
        let chosen: Vec<String> = self
            .words
            .choose_multiple(&mut rng, self.sample)
            .cloned()
            .collect();

        let candidates = chosen.into_iter().flat_map(move |word| {
            let trailing = CandidateRecord::new(base.iter().cloned().chain(std::iter::once(word.clone())));
            let leading = CandidateRecord::new(std::iter::once(word).chain(base.iter().cloned()));
            [trailing, leading]
        });
        Ok(Box::new(candidates.take(limit).map(Ok)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RngContext;

    fn texts(strategy: &WordMixStrategy, label: &str, limit: usize) -> Vec<String> {
        strategy
            .generate("forge", &Interpretation::new(["forge"]), limit, RngContext::new(label).fork("w"))
            .unwrap()
            .map(|r| r.unwrap().text().to_string())
            .collect()
    }

    #[test]
    fn test_pairs_both_ways() {
        let strategy = WordMixStrategy::with_words(["cloud"], 3);
        assert_eq!(texts(&strategy, "a", 10), vec!["forgecloud", "cloudforge"]);
    }

    #[test]
    fn test_sample_is_deterministic_per_label() {
        let strategy = WordMixStrategy::new(5);
        let a = texts(&strategy, "label-1", 100);
        assert_eq!(a.len(), 10);
        assert_eq!(a, texts(&strategy, "label-1", 100));
    }

    #[test]
    fn test_limit() {
        let strategy = WordMixStrategy::new(5);
        assert_eq!(texts(&strategy, "a", 3).len(), 3);
    }
}

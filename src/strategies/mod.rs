//! Bundled generation strategies, gates and filter presets
//!
//! These are small, dependency-free plugins; heavier strategies (embedding
//! lookups, lexical databases) register through the same contracts.

mod affix;
mod gates;
mod hyphen;
mod lexicon;
mod reverse;
mod wordmix;

pub use affix::AffixStrategy;
pub use gates::{MultiToken, StrippedLength};
pub use hyphen::HyphenStrategy;
pub use lexicon::{PREFIXES, SUFFIXES, WORDS};
pub use reverse::ReverseStrategy;
pub use wordmix::WordMixStrategy;

use std::sync::Arc;

use crate::error::Result;
use crate::pipeline::{
    BlockedWordsFilter, DomainLabelFilter, ExcludeInputFilter, FilterChain, LengthFilter,
    PipelineDefinition,
};
use crate::types::{Interpretation, SuggestConfig};

/// Names shorter than this are worth reversing
pub const REVERSE_MAX_LEN: usize = 10;

/// Words sampled by the word-mix strategy per interpretation
pub const WORDMIX_SAMPLE: usize = 8;

/// The bundled pipelines with their default weights
pub fn builtin_pipelines(config: &SuggestConfig) -> Vec<PipelineDefinition> {
    vec![
        PipelineDefinition::new("affix", 2.0, Arc::new(AffixStrategy::new(config.combination_budget))),
        PipelineDefinition::new("wordmix", 1.5, Arc::new(WordMixStrategy::new(WORDMIX_SAMPLE))),
        PipelineDefinition::new("hyphen", 1.0, Arc::new(HyphenStrategy))
            .with_gate(Arc::new(MultiToken)),
        PipelineDefinition::new("reverse", 0.5, Arc::new(ReverseStrategy))
            .with_gate(Arc::new(StrippedLength::below(REVERSE_MAX_LEN))),
    ]
}

/// Default filter stages for suggestions of `input`
pub fn builtin_filters(config: &SuggestConfig, input: &str) -> Result<FilterChain> {
    let mut chain = FilterChain::new()
        .with(LengthFilter::new(config.min_length, config.max_length))
        .with(DomainLabelFilter::new()?)
        .with(ExcludeInputFilter::new(Interpretation::from_input(input).stripped()));
    if !config.blocked_words.is_empty() {
        chain = chain.with(BlockedWordsFilter::new(&config.blocked_words));
    }
    Ok(chain)
}

//! Pipeline contracts and the per-request orchestration around them
//!
//! A pipeline is one named, weighted generation strategy plus its gate.
//! Strategies plug in through three small capabilities:
//! - [`Generates`]: a lazy, finite stream of candidates for one interpretation
//! - [`Gates`]: whether the strategy should run at all for an input
//! - [`Filters`]: a predicate over candidate text, applied by [`FilterChain`]

mod aggregator;
mod filter;
mod orchestrator;
mod sampler;

pub use aggregator::{Aggregator, DedupKey};
pub use filter::{
    BlockedWordsFilter, DomainLabelFilter, ExcludeInputFilter, FilterChain, LengthFilter,
    PredicateFilter,
};
pub use orchestrator::{Orchestrator, RunStats};
pub use sampler::{build_sampler, RoundRobinSampler, Sampler, WeightedOrderedSampler, WeightedSampler};

use rand::rngs::StdRng;
use std::sync::Arc;

use crate::error::Result;
use crate::rng::RngContext;
use crate::types::{CandidateRecord, Interpretation, SamplerKind, SuggestConfig};

/// Single-pass stream of candidates; an `Err` item ends the pipeline
pub type CandidateStream = Box<dyn Iterator<Item = Result<CandidateRecord>> + Send>;

/// Produces candidates for one interpretation of the input
pub trait Generates: Send + Sync {
    /// Start a lazy stream of at most `limit` candidates.
    ///
    /// `rng` is forked for this pipeline and interpretation; all random
    /// choices must come from it.
    fn generate(
        &self,
        input: &str,
        interpretation: &Interpretation,
        limit: usize,
        rng: StdRng,
    ) -> Result<CandidateStream>;
}

/// Decides whether a strategy is worth running for an input
pub trait Gates: Send + Sync {
    fn should_run(&self, input: &str, interpretation: &Interpretation) -> Result<bool>;
}

/// Predicate stage applied to candidate text
pub trait Filters: Send + Sync {
    fn id(&self) -> &str;
    fn accept(&self, text: &str) -> Result<bool>;
}

/// Gate for strategies that apply to every input
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysRun;

impl Gates for AlwaysRun {
    fn should_run(&self, _input: &str, _interpretation: &Interpretation) -> Result<bool> {
        Ok(true)
    }
}

/// Default cap on the candidates one pipeline may contribute per request
pub const DEFAULT_PIPELINE_LIMIT: usize = 1000;

/// A registered generation strategy
#[derive(Clone)]
pub struct PipelineDefinition {
    id: String,
    weight: f64,
    limit: usize,
    generator: Arc<dyn Generates>,
    gate: Arc<dyn Gates>,
}

impl PipelineDefinition {
    pub fn new(id: impl Into<String>, weight: f64, generator: Arc<dyn Generates>) -> Self {
        Self {
            id: id.into(),
            weight,
            limit: DEFAULT_PIPELINE_LIMIT,
            generator,
            gate: Arc::new(AlwaysRun),
        }
    }

    pub fn with_gate(mut self, gate: Arc<dyn Gates>) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Pipelines with non-positive (or NaN) weight never run
    pub fn is_live(&self) -> bool {
        self.weight > 0.0
    }

    pub fn generator(&self) -> &Arc<dyn Generates> {
        &self.generator
    }

    pub fn gate(&self) -> &Arc<dyn Gates> {
        &self.gate
    }
}

impl std::fmt::Debug for PipelineDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineDefinition")
            .field("id", &self.id)
            .field("weight", &self.weight)
            .field("limit", &self.limit)
            .finish()
    }
}

/// One suggestion request
#[derive(Debug, Clone)]
pub struct SuggestRequest {
    pub input: String,
    /// Readings of the input; empty means "derive from `input`"
    pub interpretations: Vec<Interpretation>,
    pub max_suggestions: usize,
    pub sampler: SamplerKind,
    pub filters: FilterChain,
    pub batch_size: usize,
    pub dedup_by_tokens: bool,
    /// Seed label; a random one is chosen (and reported) when absent
    pub label: Option<String>,
}

impl SuggestRequest {
    pub fn new(input: impl Into<String>) -> Self {
        Self::from_config(input, &SuggestConfig::default())
    }

    pub fn from_config(input: impl Into<String>, config: &SuggestConfig) -> Self {
        Self {
            input: input.into(),
            interpretations: Vec::new(),
            max_suggestions: config.max_suggestions,
            sampler: config.sampler,
            filters: FilterChain::new(),
            batch_size: config.batch_size,
            dedup_by_tokens: config.dedup_by_tokens,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max;
        self
    }

    pub fn with_sampler(mut self, sampler: SamplerKind) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn with_filters(mut self, filters: FilterChain) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_interpretation(mut self, interpretation: Interpretation) -> Self {
        self.interpretations.push(interpretation);
        self
    }

    pub fn dedup_by_tokens(mut self, enabled: bool) -> Self {
        self.dedup_by_tokens = enabled;
        self
    }

    /// Interpretations to run, falling back to the derived default
    pub fn effective_interpretations(&self) -> Vec<Interpretation> {
        if self.interpretations.is_empty() {
            vec![Interpretation::from_input(&self.input)]
        } else {
            self.interpretations.clone()
        }
    }

    pub fn rng_context(&self) -> RngContext {
        match &self.label {
            Some(label) => RngContext::new(label.as_str()),
            None => RngContext::random(),
        }
    }
}

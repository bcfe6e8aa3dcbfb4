//! Name Forge - multi-pipeline name suggestion orchestration
//!
//! Independent generation strategies ("pipelines") each produce a lazy stream
//! of candidate names. A sampler decides which pipeline to pull from next,
//! filters drop unwanted candidates, and an aggregator deduplicates them into
//! a capped, ordered result. Runs are reproducible per seed label.

pub mod engine;
pub mod error;
pub mod limiter;
pub mod pipeline;
pub mod rng;
#[cfg(feature = "builtin")]
pub mod strategies;
pub mod types;

// Re-export commonly used types
pub use engine::{EngineMetrics, MetricsSnapshot, SuggestionEngine};
pub use error::{NameForgeError, Result};
pub use limiter::compute_limits;
pub use pipeline::{
    FilterChain, Filters, Gates, Generates, Orchestrator, PipelineDefinition, SuggestRequest,
};
pub use rng::RngContext;
pub use types::{
    CandidateRecord, Interpretation, SamplerKind, SuggestConfig, Suggestion, SuggestionResult,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}

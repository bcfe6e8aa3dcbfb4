//! Per-request orchestration loop
//!
//! The orchestrator asks the sampler for a pipeline, opens that pipeline's
//! stream on first use (consulting its gate), pulls one bounded batch,
//! filters it and merges it into the aggregator. Pipelines that run dry,
//! hit their limit, are gated off or fail are marked consumed. The run ends
//! when the aggregator is full or no pipeline is left.

use std::collections::HashMap;
use std::time::Instant;

use chrono::Utc;

use super::{build_sampler, Aggregator, CandidateStream, PipelineDefinition, SuggestRequest};
use crate::rng::RngContext;
use crate::types::{Interpretation, SuggestionResult};

/// Counters collected during one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub batches: u64,
    pub candidates_pulled: u64,
    pub pipeline_failures: u64,
    pub gate_rejections: u64,
}

/// A pipeline whose stream has been opened in this run
struct OpenPipeline {
    stream: CandidateStream,
    remaining: usize,
}

/// Drives one suggestion request to completion
pub struct Orchestrator {
    pipelines: Vec<PipelineDefinition>,
    request: SuggestRequest,
}

impl Orchestrator {
    /// Pipeline identifiers are expected to be unique; on a clash the first
    /// definition wins.
    pub fn new(pipelines: Vec<PipelineDefinition>, request: SuggestRequest) -> Self {
        Self { pipelines, request }
    }

    pub async fn run(self) -> SuggestionResult {
        self.run_with_stats().await.0
    }

    pub async fn run_with_stats(self) -> (SuggestionResult, RunStats) {
        let start = Instant::now();
        let request = &self.request;
        let rng = request.rng_context();
        let interpretations = request.effective_interpretations();
        let mut stats = RunStats::default();

        let mut definitions: HashMap<&str, &PipelineDefinition> = HashMap::new();
        let mut weights: Vec<(String, f64)> = Vec::new();
        for pipeline in self.pipelines.iter().filter(|p| p.is_live()) {
            if definitions.contains_key(pipeline.id()) {
                tracing::warn!(pipeline = %pipeline.id(), "Duplicate pipeline id ignored");
                continue;
            }
            definitions.insert(pipeline.id(), pipeline);
            weights.push((pipeline.id().to_string(), pipeline.weight()));
        }

        let mut sampler = build_sampler(request.sampler, &weights, rng.fork("sampler"));
        let mut aggregator = Aggregator::new(request.max_suggestions, request.dedup_by_tokens);
        let mut open_pipelines: HashMap<String, OpenPipeline> = HashMap::new();
        let mut exhausted = false;

        tracing::debug!(
            label = %rng.label(),
            input = %request.input,
            sampler = %request.sampler,
            pipelines = weights.len(),
            max_suggestions = request.max_suggestions,
            "Suggestion run started"
        );

        loop {
            if aggregator.is_full() {
                break;
            }
            let Some(id) = sampler.next() else {
                exhausted = true;
                break;
            };
            let Some(definition) = definitions.get(id.as_str()).copied() else {
                sampler.mark_consumed(&id);
                continue;
            };

            let OpenPipeline {
                mut stream,
                mut remaining,
            } = match open_pipelines.remove(&id) {
                Some(pipeline) => pipeline,
                None => match open_stream(definition, request, &interpretations, &rng, &mut stats) {
                    Some(stream) => OpenPipeline {
                        stream,
                        remaining: definition.limit(),
                    },
                    None => {
                        sampler.mark_consumed(&id);
                        continue;
                    }
                },
            };

            let want = request.batch_size.max(1).min(remaining);
            let mut batch = Vec::with_capacity(want);
            let mut finished = false;
            while batch.len() < want {
                match stream.next() {
                    Some(Ok(mut record)) => {
                        record.tag(definition.id());
                        batch.push(record);
                    }
                    Some(Err(e)) => {
                        stats.pipeline_failures += 1;
                        tracing::warn!(pipeline = %id, error = %e, "Pipeline failed, dropping it from this run");
                        finished = true;
                        break;
                    }
                    None => {
                        finished = true;
                        break;
                    }
                }
            }
            remaining -= batch.len();
            if remaining == 0 {
                finished = true;
            }

            stats.batches += 1;
            stats.candidates_pulled += batch.len() as u64;
            let pulled = batch.len();
            let admitted = aggregator.merge(request.filters.apply(batch));
            tracing::trace!(pipeline = %id, pulled, admitted, total = aggregator.len(), "Batch merged");

            if finished {
                tracing::debug!(pipeline = %id, "Pipeline consumed");
                sampler.mark_consumed(&id);
            } else {
                open_pipelines.insert(id, OpenPipeline { stream, remaining });
            }

            // Strategies may block between batches; let other requests run.
            tokio::task::yield_now().await;
        }

        let suggestions = aggregator.into_suggestions();
        tracing::info!(
            label = %rng.label(),
            suggestions = suggestions.len(),
            exhausted,
            failures = stats.pipeline_failures,
            duration_ms = %start.elapsed().as_millis(),
            "Suggestion run completed"
        );

        let result = SuggestionResult {
            label: rng.label().to_string(),
            suggestions,
            exhausted,
            generated_at: Utc::now(),
        };
        (result, stats)
    }
}

/// Consult the gate for every interpretation and chain the streams of
/// those that pass. `None` means the pipeline has nothing to offer.
fn open_stream(
    definition: &PipelineDefinition,
    request: &SuggestRequest,
    interpretations: &[Interpretation],
    rng: &RngContext,
    stats: &mut RunStats,
) -> Option<CandidateStream> {
    let id = definition.id();
    let mut streams: Vec<CandidateStream> = Vec::new();

    for (i, interpretation) in interpretations.iter().enumerate() {
        match definition.gate().should_run(&request.input, interpretation) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                tracing::warn!(pipeline = %id, error = %e, "Gate failed, treating as declined");
                continue;
            }
        }

        let fork = rng.fork(&format!("pipeline:{}:{}", id, i));
        match definition
            .generator()
            .generate(&request.input, interpretation, definition.limit(), fork)
        {
            Ok(stream) => streams.push(stream),
            Err(e) => {
                stats.pipeline_failures += 1;
                tracing::warn!(pipeline = %id, error = %e, "Pipeline failed to start, dropping it from this run");
                return None;
            }
        }
    }

    if streams.is_empty() {
        stats.gate_rejections += 1;
        tracing::debug!(pipeline = %id, "Gate declined every interpretation");
        return None;
    }
    Some(Box::new(streams.into_iter().flatten()))
}

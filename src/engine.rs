//! Suggestion engine - pipeline registry and request execution
//!
//! The engine owns the registered pipelines behind a lock so strategies can
//! be added while requests are running. Every request gets its own
//! snapshot of the registry and its own orchestrator; nothing mutable is
//! shared between requests except the metric counters.

use futures::future::join_all;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::error::{NameForgeError, Result};
use crate::pipeline::{Orchestrator, PipelineDefinition, RunStats, SuggestRequest};
use crate::types::{SuggestConfig, SuggestionResult};

/// Counters shared by every request the engine runs
#[derive(Debug, Default)]
pub struct EngineMetrics {
    requests: AtomicU64,
    suggestions: AtomicU64,
    pipeline_failures: AtomicU64,
    gate_rejections: AtomicU64,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, result: &SuggestionResult, stats: &RunStats) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.suggestions
            .fetch_add(result.suggestions.len() as u64, Ordering::Relaxed);
        self.pipeline_failures
            .fetch_add(stats.pipeline_failures, Ordering::Relaxed);
        self.gate_rejections
            .fetch_add(stats.gate_rejections, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            suggestions: self.suggestions.load(Ordering::Relaxed),
            pipeline_failures: self.pipeline_failures.load(Ordering::Relaxed),
            gate_rejections: self.gate_rejections.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub suggestions: u64,
    pub pipeline_failures: u64,
    pub gate_rejections: u64,
}

/// Runs suggestion requests against a registry of pipelines
#[derive(Clone)]
pub struct SuggestionEngine {
    pipelines: Arc<RwLock<Vec<PipelineDefinition>>>,
    config: Arc<SuggestConfig>,
    metrics: Arc<EngineMetrics>,
}

impl SuggestionEngine {
    pub fn new(config: SuggestConfig) -> Self {
        Self {
            pipelines: Arc::new(RwLock::new(Vec::new())),
            config: Arc::new(config),
            metrics: Arc::new(EngineMetrics::new()),
        }
    }

    /// Engine preloaded with the bundled strategies
    #[cfg(feature = "builtin")]
    pub fn with_builtin_strategies(config: SuggestConfig) -> Self {
        let engine = Self::new(config);
        {
            let mut pipelines = engine.pipelines.write();
            pipelines.extend(crate::strategies::builtin_pipelines(&engine.config));
        }
        engine
    }

    /// Register a pipeline (thread-safe). Identifiers must be unique.
    pub fn register(&self, pipeline: PipelineDefinition) -> Result<()> {
        let mut pipelines = self.pipelines.write();
        if pipelines.iter().any(|p| p.id() == pipeline.id()) {
            return Err(crate::validation_error!(
                "pipeline '{}' is already registered",
                pipeline.id()
            ));
        }
        tracing::debug!(pipeline = %pipeline.id(), weight = pipeline.weight(), "Pipeline registered");
        pipelines.push(pipeline);
        Ok(())
    }

    /// Remove a pipeline, returning whether it was registered
    pub fn unregister(&self, id: &str) -> bool {
        let mut pipelines = self.pipelines.write();
        let before = pipelines.len();
        pipelines.retain(|p| p.id() != id);
        pipelines.len() != before
    }

    /// Registered pipeline identifiers, in registration order
    pub fn pipeline_ids(&self) -> Vec<String> {
        self.pipelines
            .read()
            .iter()
            .map(|p| p.id().to_string())
            .collect()
    }

    pub fn config(&self) -> &SuggestConfig {
        &self.config
    }

    /// A request for `input` with the engine's configured defaults
    pub fn request(&self, input: impl Into<String>) -> SuggestRequest {
        SuggestRequest::from_config(input, &self.config)
    }

    /// Snapshot of the registry with configured weight overrides applied
    fn snapshot(&self) -> Vec<PipelineDefinition> {
        self.pipelines
            .read()
            .iter()
            .map(|p| match self.config.pipeline_weights.get(p.id()) {
                Some(&weight) => p.clone().with_weight(weight),
                None => p.clone(),
            })
            .collect()
    }

    /// Run one request to completion
    pub async fn suggest(&self, request: SuggestRequest) -> Result<SuggestionResult> {
        if request.input.trim().is_empty() && request.interpretations.is_empty() {
            return Err(NameForgeError::validation("input cannot be empty"));
        }

        let orchestrator = Orchestrator::new(self.snapshot(), request);
        let (result, stats) = orchestrator.run_with_stats().await;
        self.metrics.record(&result, &stats);
        Ok(result)
    }

    /// Run several requests concurrently, at most `concurrency` at a time.
    ///
    /// Outcomes come back in request order; a failed request does not
    /// affect the others.
    pub async fn suggest_many(&self, requests: Vec<SuggestRequest>) -> Vec<Result<SuggestionResult>> {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));

        let handles: Vec<_> = requests
            .into_iter()
            .map(|request| {
                let engine = self.clone();
                let semaphore = Arc::clone(&semaphore);
                tokio::spawn(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|e| crate::internal_error!("request queue closed: {}", e))?;
                    engine.suggest(request).await
                })
            })
            .collect();

        join_all(handles)
            .await
            .into_iter()
            .map(|joined| joined.map_err(NameForgeError::from).and_then(|outcome| outcome))
            .collect()
    }

    pub fn metrics(&self) -> Arc<EngineMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::new(SuggestConfig::default())
    }
}

//! Integration tests for name-forge

#![cfg(feature = "builtin")]

use assert_cmd::Command;
use name_forge::{
    pipeline::CandidateStream, strategies::builtin_filters, CandidateRecord, Generates,
    Interpretation, Orchestrator, PipelineDefinition, Result, SamplerKind, SuggestConfig,
    SuggestRequest, SuggestionEngine,
};
use predicates::prelude::*;
use rand::rngs::StdRng;
use rand::Rng;
use std::io::Write;
use std::sync::Arc;

/// Emits `<prefix>1`, `<prefix>2`, ... up to `count`
struct Numbered {
    prefix: &'static str,
    count: usize,
}

impl Generates for Numbered {
    fn generate(
        &self,
        _input: &str,
        _interpretation: &Interpretation,
        limit: usize,
        _rng: StdRng,
    ) -> Result<CandidateStream> {
        let prefix = self.prefix;
        let stream = (1..=self.count)
            .map(move |i| Ok(CandidateRecord::new([format!("{}{}", prefix, i)])))
            .take(limit);
        Ok(Box::new(stream))
    }
}

/// Emits random numbers drawn from the pipeline's own RNG
struct Dice;

impl Generates for Dice {
    fn generate(
        &self,
        _input: &str,
        _interpretation: &Interpretation,
        limit: usize,
        mut rng: StdRng,
    ) -> Result<CandidateStream> {
        let rolls: Vec<u32> = (0..limit.min(50)).map(|_| rng.gen_range(0..1_000_000)).collect();
        Ok(Box::new(
            rolls
                .into_iter()
                .map(|n| Ok(CandidateRecord::new([format!("d{}", n)]))),
        ))
    }
}

fn numbered(id: &str, weight: f64, prefix: &'static str, count: usize) -> PipelineDefinition {
    PipelineDefinition::new(id, weight, Arc::new(Numbered { prefix, count }))
}

#[tokio::test]
async fn test_round_robin_returns_exactly_max() {
    let pipelines = || vec![numbered("a", 2.0, "a", 100), numbered("b", 1.0, "b", 100)];
    let request = || {
        SuggestRequest::new("x")
            .with_sampler(SamplerKind::RoundRobin)
            .with_max_suggestions(3)
            .with_label("fixed")
    };

    let first = Orchestrator::new(pipelines(), request()).run().await;
    let second = Orchestrator::new(pipelines(), request()).run().await;

    assert_eq!(first.suggestions.len(), 3);
    assert!(!first.exhausted);
    assert_eq!(first.texts(), second.texts());
}

#[tokio::test]
async fn test_every_sampler_is_reproducible_per_label() {
    for kind in [SamplerKind::Weighted, SamplerKind::WeightedOrdered, SamplerKind::RoundRobin] {
        let run = |label: &'static str| {
            let pipelines = vec![
                numbered("a", 3.0, "a", 40),
                PipelineDefinition::new("dice", 1.0, Arc::new(Dice)),
            ];
            let request = SuggestRequest::new("x")
                .with_sampler(kind)
                .with_max_suggestions(25)
                .with_batch_size(2)
                .with_label(label);
            Orchestrator::new(pipelines, request).run()
        };

        let a = run("same").await;
        let b = run("same").await;
        assert_eq!(a.label, "same");
        assert_eq!(a.texts(), b.texts(), "sampler {} not reproducible", kind);
    }
}

#[tokio::test]
async fn test_exhaustion_collects_everything() {
    let pipelines = vec![numbered("a", 1.0, "n", 3), numbered("b", 1.0, "n", 5)];
    let request = SuggestRequest::new("x")
        .with_max_suggestions(100)
        .with_sampler(SamplerKind::Weighted)
        .with_label("dry");

    let result = Orchestrator::new(pipelines, request).run().await;

    assert!(result.exhausted);
    assert_eq!(result.suggestions.len(), 5);
    let shared = result.suggestions.iter().find(|s| s.text == "n1").unwrap();
    let mut sources = shared.provenance.clone();
    sources.sort();
    assert_eq!(sources, vec!["a", "b"]);
}

#[tokio::test]
async fn test_builtin_engine_end_to_end() {
    let config = SuggestConfig {
        max_suggestions: 15,
        ..Default::default()
    };
    let filters = builtin_filters(&config, "cloud kitchen.com").unwrap();
    let engine = SuggestionEngine::with_builtin_strategies(config);
    assert_eq!(engine.pipeline_ids(), vec!["affix", "wordmix", "hyphen", "reverse"]);

    let request = engine
        .request("cloud kitchen.com")
        .with_filters(filters)
        .with_label("e2e");
    let result = engine.suggest(request.clone()).await.unwrap();

    assert_eq!(result.suggestions.len(), 15);
    for suggestion in &result.suggestions {
        assert_ne!(suggestion.text, "cloudkitchen");
        assert!(!suggestion.provenance.is_empty());
        assert!(suggestion
            .text
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
    }

    let again = engine.suggest(request).await.unwrap();
    assert_eq!(result.texts(), again.texts());
    assert_eq!(engine.metrics_snapshot().requests, 2);
}

#[tokio::test]
async fn test_suggest_many_matches_single_runs() {
    let engine = SuggestionEngine::with_builtin_strategies(SuggestConfig::default());
    let inputs = ["forge", "river stone", "pixel"];
    let requests: Vec<SuggestRequest> = inputs
        .iter()
        .map(|input| engine.request(*input).with_label(format!("batch-{}", input)))
        .collect();

    let batch = engine.suggest_many(requests.clone()).await;
    assert_eq!(batch.len(), inputs.len());

    for (request, result) in requests.into_iter().zip(&batch) {
        let single = engine.suggest(request).await.unwrap();
        assert_eq!(single.texts(), result.as_ref().unwrap().texts());
    }
}

#[tokio::test]
async fn test_huge_configured_weights_still_sample() {
    let mut config = SuggestConfig {
        max_suggestions: 10,
        ..Default::default()
    };
    config.pipeline_weights.insert("affix".to_string(), 1e308);
    config.pipeline_weights.insert("wordmix".to_string(), 1e308);
    config.validate().unwrap();

    let engine = SuggestionEngine::with_builtin_strategies(config);
    for sampler in [SamplerKind::Weighted, SamplerKind::WeightedOrdered] {
        let request = engine.request("forge").with_sampler(sampler).with_label("huge");
        let result = engine.suggest(request).await.unwrap();
        assert_eq!(result.suggestions.len(), 10);
    }
}

#[test]
fn test_cli_help() {
    Command::cargo_bin("name-forge")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("USAGE"));
}

#[test]
fn test_cli_rejects_bad_sampler() {
    Command::cargo_bin("name-forge")
        .unwrap()
        .args(["--sampler", "chaotic", "forge"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown sampler"));
}

#[test]
fn test_cli_requires_input() {
    Command::cargo_bin("name-forge").unwrap().assert().code(1);
}

#[test]
fn test_cli_json_is_reproducible() {
    let run = || {
        let output = Command::cargo_bin("name-forge")
            .unwrap()
            .args(["--json", "--max", "5", "--label", "cli", "forge"])
            .output()
            .unwrap();
        assert!(output.status.success());
        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        value["suggestions"].clone()
    };

    let first = run();
    assert_eq!(first.as_array().map(Vec::len), Some(5));
    assert_eq!(first, run());
}

#[test]
fn test_cli_reads_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"max_suggestions": 2, "pipeline_weights": {{"wordmix": 0.0}}}}"#).unwrap();

    let output = Command::cargo_bin("name-forge")
        .unwrap()
        .args(["--json", "--label", "cfg", "--config"])
        .arg(file.path())
        .arg("forge")
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let suggestions = value["suggestions"].as_array().unwrap();
    assert_eq!(suggestions.len(), 2);
    assert!(suggestions
        .iter()
        .all(|s| s["provenance"].as_array().unwrap().iter().all(|p| p != "wordmix")));
}

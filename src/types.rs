//! Core types and structures for name-forge

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use crate::error::{NameForgeError, Result};

/// Prefix for environment overrides of [`SuggestConfig`]
pub const ENV_PREFIX: &str = "NAME_FORGE_";

/// A generated name candidate and the strategies that vouch for it.
///
/// Tokens are fixed at construction; `text` is their cached concatenation.
/// Provenance only ever grows, in insertion order, without repeats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRecord {
    tokens: Vec<String>,
    text: String,
    provenance: Vec<String>,
}

impl CandidateRecord {
    /// Create a candidate from its tokens
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        let text = tokens.concat();
        Self {
            tokens,
            text,
            provenance: Vec::new(),
        }
    }

    /// Attach an initial provenance tag
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.tag(source);
        self
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn provenance(&self) -> &[String] {
        &self.provenance
    }

    /// Append a provenance tag unless it is already present
    pub(crate) fn tag(&mut self, source: impl Into<String>) {
        let source = source.into();
        if !self.provenance.contains(&source) {
            self.provenance.push(source);
        }
    }

    /// Union `other`'s provenance into this record, keeping order
    pub(crate) fn absorb(&mut self, other: &CandidateRecord) {
        for source in &other.provenance {
            self.tag(source.as_str());
        }
    }

    pub fn into_suggestion(self) -> Suggestion {
        Suggestion {
            text: self.text,
            tokens: self.tokens,
            provenance: self.provenance,
        }
    }
}

/// Final, immutable form of a candidate handed back to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    pub tokens: Vec<String>,
    pub provenance: Vec<String>,
}

/// One reading of the input as a sequence of tokens
/// (e.g. `"catdog"` read as `["cat", "dog"]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpretation {
    pub tokens: Vec<String>,
}

impl Interpretation {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Derive the default interpretation of a raw input.
    ///
    /// The input is lowercased, a trailing TLD (`example.com`) is dropped and
    /// the rest is split on `-`, `_`, `.` and whitespace.
    pub fn from_input(input: &str) -> Self {
        let normalized = input.trim().to_lowercase();
        let name = match normalized.rsplit_once('.') {
            Some((name, _tld)) if !name.is_empty() => name,
            _ => normalized.as_str(),
        };

        Self::new(
            name.split(|c: char| c == '-' || c == '_' || c == '.' || c.is_whitespace())
                .filter(|t| !t.is_empty()),
        )
    }

    /// The tokens joined without separators
    pub fn stripped(&self) -> String {
        self.tokens.concat()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.iter().all(|t| t.is_empty())
    }
}

/// Strategy used to choose which pipeline is pulled next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SamplerKind {
    /// Draw with probability proportional to weight, with replacement
    Weighted,
    /// One weighted pass without replacement, then weighted with replacement
    WeightedOrdered,
    /// Strict turns in registration order
    #[default]
    RoundRobin,
}

impl std::fmt::Display for SamplerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SamplerKind::Weighted => write!(f, "weighted"),
            SamplerKind::WeightedOrdered => write!(f, "weighted-ordered"),
            SamplerKind::RoundRobin => write!(f, "round-robin"),
        }
    }
}

impl FromStr for SamplerKind {
    type Err = NameForgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "weighted" => Ok(SamplerKind::Weighted),
            "weighted-ordered" => Ok(SamplerKind::WeightedOrdered),
            "round-robin" | "roundrobin" => Ok(SamplerKind::RoundRobin),
            other => Err(NameForgeError::config(format!(
                "unknown sampler '{}' (expected weighted, weighted-ordered or round-robin)",
                other
            ))),
        }
    }
}

/// Result of one suggestion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionResult {
    /// Label the request's randomness was seeded from
    pub label: String,
    pub suggestions: Vec<Suggestion>,
    /// True when the run stopped because every pipeline ran dry
    /// rather than because the suggestion cap was reached
    pub exhausted: bool,
    pub generated_at: DateTime<Utc>,
}

impl SuggestionResult {
    pub fn texts(&self) -> Vec<&str> {
        self.suggestions.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Configuration for suggestion runs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestConfig {
    pub max_suggestions: usize,
    pub sampler: SamplerKind,
    /// Candidates pulled from a pipeline per turn
    pub batch_size: usize,
    pub dedup_by_tokens: bool,
    /// Ceiling on the Cartesian product of combining strategies
    pub combination_budget: u64,
    /// Requests processed at once by `suggest_many`
    pub concurrency: usize,
    /// Overrides for registered pipeline weights, by identifier
    pub pipeline_weights: HashMap<String, f64>,
    pub min_length: usize,
    pub max_length: usize,
    pub blocked_words: Vec<String>,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            max_suggestions: 20,
            sampler: SamplerKind::RoundRobin,
            batch_size: 10,
            dedup_by_tokens: false,
            combination_budget: 10_000,
            concurrency: 4,
            pipeline_weights: HashMap::new(),
            min_length: 3,
            max_length: 63,
            blocked_words: Vec::new(),
        }
    }
}

impl SuggestConfig {
    /// Load configuration from a JSON file; missing keys keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| NameForgeError::io(e.to_string(), Some(path.display().to_string())))?;
        let config: SuggestConfig = serde_json::from_str(&content)
            .map_err(|e| NameForgeError::parse(e.to_string(), Some(content.clone())))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `NAME_FORGE_*` overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply `NAME_FORGE_*` overrides from an arbitrary lookup
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(v) = get("MAX_SUGGESTIONS") {
            self.max_suggestions = parse_env("MAX_SUGGESTIONS", &v)?;
        }
        if let Some(v) = get("SAMPLER") {
            self.sampler = v.parse()?;
        }
        if let Some(v) = get("BATCH_SIZE") {
            self.batch_size = parse_env("BATCH_SIZE", &v)?;
        }
        if let Some(v) = get("DEDUP_BY_TOKENS") {
            self.dedup_by_tokens = parse_env("DEDUP_BY_TOKENS", &v)?;
        }
        if let Some(v) = get("COMBINATION_BUDGET") {
            self.combination_budget = parse_env("COMBINATION_BUDGET", &v)?;
        }
        if let Some(v) = get("CONCURRENCY") {
            self.concurrency = parse_env("CONCURRENCY", &v)?;
        }
        if let Some(v) = get("MIN_LENGTH") {
            self.min_length = parse_env("MIN_LENGTH", &v)?;
        }
        if let Some(v) = get("MAX_LENGTH") {
            self.max_length = parse_env("MAX_LENGTH", &v)?;
        }
        if let Some(v) = get("BLOCKED_WORDS") {
            self.blocked_words = v
                .split(',')
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect();
        }

        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(crate::config_error!("batch_size must be at least 1"));
        }
        if self.combination_budget == 0 {
            return Err(crate::config_error!("combination_budget must be at least 1"));
        }
        if self.concurrency == 0 {
            return Err(crate::config_error!("concurrency must be at least 1"));
        }
        if self.min_length > self.max_length {
            return Err(crate::config_error!(
                "min_length ({}) exceeds max_length ({})",
                self.min_length,
                self.max_length
            ));
        }
        if let Some((id, w)) = self.pipeline_weights.iter().find(|(_, w)| !w.is_finite()) {
            return Err(crate::config_error!("weight for '{}' is not finite: {}", id, w));
        }
        Ok(())
    }
}

fn parse_env<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        NameForgeError::config(format!("invalid value for {}{}: '{}'", ENV_PREFIX, name, value))
    })
}

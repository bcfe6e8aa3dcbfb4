//! Candidate filtering
//!
//! A [`FilterChain`] runs candidates through ordered predicate stages.
//! Survivors of a stage are tagged with the stage id. The chain is a plain
//! iterator adapter, so nothing is filtered before the consumer asks for it.

use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;

use super::Filters;
use crate::error::{NameForgeError, Result};
use crate::types::CandidateRecord;

/// Ordered list of filter stages
#[derive(Clone, Default)]
pub struct FilterChain {
    stages: Vec<Arc<dyn Filters>>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage
    pub fn with(mut self, stage: impl Filters + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    pub fn push(&mut self, stage: Arc<dyn Filters>) {
        self.stages.push(stage);
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.id()).collect()
    }

    /// Lazily filter `candidates` through every stage.
    ///
    /// A predicate error counts as a rejection and is logged.
    pub fn apply<'a, I>(&'a self, candidates: I) -> impl Iterator<Item = CandidateRecord> + 'a
    where
        I: IntoIterator<Item = CandidateRecord> + 'a,
        I::IntoIter: 'a,
    {
        candidates
            .into_iter()
            .filter_map(move |record| self.run_stages(record))
    }

    fn run_stages(&self, mut record: CandidateRecord) -> Option<CandidateRecord> {
        for stage in &self.stages {
            match stage.accept(record.text()) {
                Ok(true) => record.tag(stage.id()),
                Ok(false) => {
                    tracing::trace!(filter = %stage.id(), candidate = %record.text(), "Candidate rejected");
                    return None;
                }
                Err(e) => {
                    tracing::warn!(
                        filter = %stage.id(),
                        candidate = %record.text(),
                        error = %e,
                        "Filter predicate failed, rejecting candidate"
                    );
                    return None;
                }
            }
        }
        Some(record)
    }
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}

/// Keeps candidates whose length lies in `min..=max` characters
#[derive(Debug, Clone)]
pub struct LengthFilter {
    min: usize,
    max: usize,
}

impl LengthFilter {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

impl Filters for LengthFilter {
    fn id(&self) -> &str {
        "length"
    }

    fn accept(&self, text: &str) -> Result<bool> {
        let len = text.chars().count();
        Ok(len >= self.min && len <= self.max)
    }
}

/// Keeps candidates that are valid as a single DNS label
#[derive(Debug, Clone)]
pub struct DomainLabelFilter {
    pattern: Regex,
}

impl DomainLabelFilter {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?$")
            .map_err(|e| NameForgeError::internal(e.to_string()))?;
        Ok(Self { pattern })
    }
}

impl Filters for DomainLabelFilter {
    fn id(&self) -> &str {
        "domain-label"
    }

    fn accept(&self, text: &str) -> Result<bool> {
        Ok(text.len() <= 63 && !text.contains("--") && self.pattern.is_match(text))
    }
}

/// Drops candidates containing any blocked word
#[derive(Debug, Clone, Default)]
pub struct BlockedWordsFilter {
    blocked: HashSet<String>,
}

impl BlockedWordsFilter {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            blocked: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }
}

impl Filters for BlockedWordsFilter {
    fn id(&self) -> &str {
        "blocked-words"
    }

    fn accept(&self, text: &str) -> Result<bool> {
        let text = text.to_lowercase();
        Ok(!self.blocked.iter().any(|w| text.contains(w.as_str())))
    }
}

/// Drops candidates identical to the input they were generated from
#[derive(Debug, Clone)]
pub struct ExcludeInputFilter {
    input: String,
}

impl ExcludeInputFilter {
    pub fn new(input: impl AsRef<str>) -> Self {
        Self {
            input: input.as_ref().to_lowercase(),
        }
    }
}

impl Filters for ExcludeInputFilter {
    fn id(&self) -> &str {
        "exclude-input"
    }

    fn accept(&self, text: &str) -> Result<bool> {
        Ok(text.to_lowercase() != self.input)
    }
}

type Predicate = dyn Fn(&str) -> Result<bool> + Send + Sync;

/// Filter stage backed by a closure
pub struct PredicateFilter {
    id: String,
    predicate: Box<Predicate>,
}

impl PredicateFilter {
    pub fn new<F>(id: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&str) -> Result<bool> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            predicate: Box::new(predicate),
        }
    }
}

impl Filters for PredicateFilter {
    fn id(&self) -> &str {
        &self.id
    }

    fn accept(&self, text: &str) -> Result<bool> {
        (self.predicate)(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(names: &[&str]) -> Vec<CandidateRecord> {
        names
            .iter()
            .map(|n| CandidateRecord::new([*n]).with_source("gen"))
            .collect()
    }

    #[test]
    fn test_rejecting_stage_tags_survivors() {
        let chain = FilterChain::new()
            .with(PredicateFilter::new("not-name2", |t: &str| Ok(t != "name2")));
        let out: Vec<CandidateRecord> = chain.apply(records(&["name1", "name2"])).collect();

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text(), "name1");
        assert_eq!(out[0].provenance(), ["gen", "not-name2"]);
    }

    #[test]
    fn test_stages_run_in_order() {
        let chain = FilterChain::new()
            .with(LengthFilter::new(3, 10))
            .with(BlockedWordsFilter::new(["bad"]));
        let out: Vec<CandidateRecord> = chain
            .apply(records(&["ok", "goodname", "badname", "fine"]))
            .collect();

        let texts: Vec<&str> = out.iter().map(|r| r.text()).collect();
        assert_eq!(texts, vec!["goodname", "fine"]);
        assert_eq!(out[0].provenance(), ["gen", "length", "blocked-words"]);
    }

    #[test]
    fn test_predicate_error_rejects() {
        let chain = FilterChain::new().with(PredicateFilter::new("flaky", |t: &str| {
            if t.starts_with('x') {
                Err(NameForgeError::predicate("flaky", "cannot judge"))
            } else {
                Ok(true)
            }
        }));
        let out: Vec<CandidateRecord> = chain.apply(records(&["xeno", "alpha"])).collect();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text(), "alpha");
    }

    #[test]
    fn test_chain_is_lazy() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let chain = FilterChain::new().with(PredicateFilter::new("count", move |_: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }));

        let source = (0..1000).map(|i| CandidateRecord::new([format!("n{}", i)]));
        let first: Vec<CandidateRecord> = chain.apply(source).take(2).collect();
        assert_eq!(first.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_domain_label_filter() {
        let filter = DomainLabelFilter::new().unwrap();
        assert!(filter.accept("my-app1").unwrap());
        assert!(!filter.accept("-app").unwrap());
        assert!(!filter.accept("app-").unwrap());
        assert!(!filter.accept("my--app").unwrap());
        assert!(!filter.accept("my app").unwrap());
        assert!(!filter.accept(&"a".repeat(64)).unwrap());
    }

    #[test]
    fn test_exclude_input() {
        let filter = ExcludeInputFilter::new("Example");
        assert!(!filter.accept("example").unwrap());
        assert!(filter.accept("examples").unwrap());
    }

    #[test]
    fn test_empty_chain_passes_everything() {
        let chain = FilterChain::new();
        assert_eq!(chain.apply(records(&["a", "b"])).count(), 2);
    }
}

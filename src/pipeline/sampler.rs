//! Pipeline samplers - decide which pipeline is pulled next
//!
//! Each sampler owns a private copy of the live pipelines and their weights
//! for a single request. `next` returns `None` once every pipeline has been
//! marked consumed; that is exhaustion, not an error.

use rand::distributions::WeightedError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::VecDeque;

use crate::types::SamplerKind;

/// Chooses the pipeline to pull from next
pub trait Sampler: Send {
    /// Identifier of the next pipeline, or `None` when all are consumed
    fn next(&mut self) -> Option<String>;

    /// Permanently remove a pipeline from future selection
    fn mark_consumed(&mut self, id: &str);

    fn is_exhausted(&self) -> bool;
}

/// Build a sampler of the given kind.
///
/// Pipelines whose weight is not strictly positive are dropped here.
pub fn build_sampler(kind: SamplerKind, weights: &[(String, f64)], rng: StdRng) -> Box<dyn Sampler> {
    match kind {
        SamplerKind::Weighted => Box::new(WeightedSampler::new(weights, rng)),
        SamplerKind::WeightedOrdered => Box::new(WeightedOrderedSampler::new(weights, rng)),
        SamplerKind::RoundRobin => Box::new(RoundRobinSampler::new(weights)),
    }
}

/// Live pipelines with weights scaled into `(0, 1]`.
///
/// Scaling by the largest weight keeps the running total finite for any
/// finite input; a positive weight never scales down to zero.
fn live(weights: &[(String, f64)]) -> Vec<(String, f64)> {
    let positive: Vec<(String, f64)> = weights
        .iter()
        .filter(|(_, w)| *w > 0.0 && w.is_finite())
        .cloned()
        .collect();
    let max = positive.iter().map(|(_, w)| *w).fold(0.0, f64::max);

    positive
        .into_iter()
        .map(|(id, w)| (id, (w / max).max(f64::MIN_POSITIVE)))
        .collect()
}

/// Weighted draw that never reports live pipelines as exhausted.
///
/// Falls back to a uniform pick if the weighted draw is rejected.
fn draw<'a>(pool: &'a [(String, f64)], rng: &mut StdRng) -> Option<&'a String> {
    match pool.choose_weighted(rng, |(_, w)| *w) {
        Ok((id, _)) => Some(id),
        Err(WeightedError::NoItem) => None,
        Err(e) => {
            tracing::warn!(error = %e, pipelines = pool.len(), "Weighted draw rejected, picking uniformly");
            pool.choose(rng).map(|(id, _)| id)
        }
    }
}

/// Weighted draws with replacement
pub struct WeightedSampler {
    weights: Vec<(String, f64)>,
    rng: StdRng,
}

impl WeightedSampler {
    pub fn new(weights: &[(String, f64)], rng: StdRng) -> Self {
        Self {
            weights: live(weights),
            rng,
        }
    }

    fn contains(&self, id: &str) -> bool {
        self.weights.iter().any(|(p, _)| p == id)
    }
}

impl Sampler for WeightedSampler {
    fn next(&mut self) -> Option<String> {
        draw(&self.weights, &mut self.rng).cloned()
    }

    fn mark_consumed(&mut self, id: &str) {
        self.weights.retain(|(p, _)| p != id);
    }

    fn is_exhausted(&self) -> bool {
        self.weights.is_empty()
    }
}

/// One weighted pass without replacement, then weighted with replacement.
///
/// Every live pipeline is visited once early on; heavier pipelines tend to
/// come first in that pass.
pub struct WeightedOrderedSampler {
    order: VecDeque<String>,
    fallback: WeightedSampler,
}

impl WeightedOrderedSampler {
    pub fn new(weights: &[(String, f64)], mut rng: StdRng) -> Self {
        let mut pool = live(weights);
        let mut order = VecDeque::with_capacity(pool.len());

        while !pool.is_empty() {
            let Some(picked) = draw(&pool, &mut rng).cloned() else {
                break;
            };
            pool.retain(|(p, _)| *p != picked);
            order.push_back(picked);
        }

        Self {
            order,
            fallback: WeightedSampler::new(weights, rng),
        }
    }
}

impl Sampler for WeightedOrderedSampler {
    fn next(&mut self) -> Option<String> {
        while let Some(id) = self.order.pop_front() {
            if self.fallback.contains(&id) {
                return Some(id);
            }
        }
        self.fallback.next()
    }

    fn mark_consumed(&mut self, id: &str) {
        self.order.retain(|p| p != id);
        self.fallback.mark_consumed(id);
    }

    fn is_exhausted(&self) -> bool {
        self.fallback.is_exhausted()
    }
}

/// Strict turns in definition order, ignoring weight magnitudes
pub struct RoundRobinSampler {
    ids: Vec<String>,
    index: usize,
}

impl RoundRobinSampler {
    pub fn new(weights: &[(String, f64)]) -> Self {
        Self {
            ids: live(weights).into_iter().map(|(id, _)| id).collect(),
            index: 0,
        }
    }
}

impl Sampler for RoundRobinSampler {
    fn next(&mut self) -> Option<String> {
        if self.ids.is_empty() {
            return None;
        }
        let id = self.ids[self.index].clone();
        self.index = (self.index + 1) % self.ids.len();
        Some(id)
    }

    fn mark_consumed(&mut self, id: &str) {
        let Some(pos) = self.ids.iter().position(|p| p == id) else {
            return;
        };
        self.ids.remove(pos);
        if pos < self.index {
            self.index -= 1;
        }
        if self.index >= self.ids.len() {
            self.index = 0;
        }
    }

    fn is_exhausted(&self) -> bool {
        self.ids.is_empty()
    }
}

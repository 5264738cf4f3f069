//! Tunable search parameters.

use cascade_core::STEPS;
use cascade_eval::QualityWeights;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    /// States kept per layer across both selection passes.
    pub total_keep: usize,
    /// Share of `total_keep` given to the score pass.
    pub score_keep_ratio: f64,
    /// Per-generation ancestor quotas for the score pass, as fractions of
    /// its keep count (nearest ancestor first).
    pub score_parent_quota: Vec<f64>,
    /// Height-bucket quota for the score pass, as a fraction of its keep
    /// count.
    pub score_height_quota: f64,
    pub quality_parent_quota: Vec<f64>,
    pub quality_height_quota: f64,
    /// Drop states this far below the layer's best score.
    pub ignore_score_threshold: u32,
    /// Drop states this far below the layer's tallest stack.
    pub ignore_height_threshold: u32,
    pub quality: QualityWeights,
    /// Per-step minimum for the global best; missing entries count as 0.
    /// An empty solution is returned as soon as a floor is missed.
    pub abort_threshold: Vec<u32>,
    /// Worker threads for layer expansion.
    pub threads: usize,
    /// Layers to run; the full game by default. Shorter runs still score
    /// against the full game's piece limit.
    pub max_steps: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            total_keep: 9041,
            score_keep_ratio: 0.163,
            score_parent_quota: vec![0.3, 0.5, 0.7, 0.9],
            score_height_quota: 0.210,
            quality_parent_quota: vec![0.3, 0.5, 0.7, 0.9],
            quality_height_quota: 0.355,
            ignore_score_threshold: 2200,
            ignore_height_threshold: 6,
            quality: QualityWeights::default(),
            abort_threshold: Vec::new(),
            threads: 8,
            max_steps: STEPS,
        }
    }
}

/// Keep counts and quota ceilings derived from the configured ratios.
#[derive(Clone, Debug)]
pub(crate) struct KeepPlan {
    pub score_keep: usize,
    pub quality_keep: usize,
    pub score_parent_quota: Vec<usize>,
    pub quality_parent_quota: Vec<usize>,
    pub score_height_quota: usize,
    pub quality_height_quota: usize,
}

impl SearchConfig {
    pub(crate) fn keep_plan(&self) -> KeepPlan {
        let quality_keep = (self.total_keep as f64 * (1.0 - self.score_keep_ratio)) as usize;
        let score_keep = self.total_keep - quality_keep;
        KeepPlan {
            score_parent_quota: self
                .score_parent_quota
                .iter()
                .map(|q| (score_keep as f64 * q) as usize)
                .collect(),
            quality_parent_quota: self
                .quality_parent_quota
                .iter()
                .map(|q| (quality_keep as f64 * q) as usize)
                .collect(),
            score_height_quota: (score_keep as f64 * self.score_height_quota) as usize,
            quality_height_quota: (quality_keep as f64 * self.quality_height_quota) as usize,
            score_keep,
            quality_keep,
        }
    }

    #[inline]
    pub(crate) fn abort_floor(&self, step: usize) -> u32 {
        self.abort_threshold.get(step).copied().unwrap_or(0)
    }
}

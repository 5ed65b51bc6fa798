//! Difficulty probability model
//!
//! A miner hashing `Hm` times per minute keeps the best result it finds. The
//! chance that the best result is at least `d` leading zero bits is
//! `C(d) = (1 - 0.5^d) ^ Hm`, so the chance the best result is exactly `d`
//! is the first difference `C(d) - C(d-1)`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{RewardTable, SimError};
use crate::constants::{DEFAULT_MAX_DIFFICULTY, DEFAULT_MIN_DIFFICULTY};

/// Difficulty level (leading zero bits of the best hash)
pub type Difficulty = u32;

/// Named tail-suppression presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecayScenario {
    Optimistic,
    Normal,
    Pessimistic,
}

impl DecayScenario {
    pub const ALL: [DecayScenario; 3] = [
        DecayScenario::Optimistic,
        DecayScenario::Normal,
        DecayScenario::Pessimistic,
    ];

    /// Exponential decay rate applied per level above the easiest one
    pub fn decay_rate(self) -> f64 {
        match self {
            DecayScenario::Optimistic => 0.05,
            DecayScenario::Normal => 0.1,
            DecayScenario::Pessimistic => 0.25,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DecayScenario::Optimistic => "optimistic",
            DecayScenario::Normal => "normal",
            DecayScenario::Pessimistic => "pessimistic",
        }
    }
}

impl fmt::Display for DecayScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DecayScenario {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "optimistic" => Ok(DecayScenario::Optimistic),
            "normal" => Ok(DecayScenario::Normal),
            "pessimistic" => Ok(DecayScenario::Pessimistic),
            other => Err(SimError::invalid(format!(
                "unknown scenario '{}' (expected optimistic, normal or pessimistic)",
                other
            ))),
        }
    }
}

/// Inclusive list of levels between two bounds
pub fn level_range(min: Difficulty, max: Difficulty) -> Vec<Difficulty> {
    (min..=max).collect()
}

/// The default 1..=50 level set
pub fn default_levels() -> Vec<Difficulty> {
    level_range(DEFAULT_MIN_DIFFICULTY, DEFAULT_MAX_DIFFICULTY)
}

/// Probability mass over difficulty levels
///
/// Levels are strictly ascending and probabilities sum to one. Built once per
/// run and never modified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityDistribution {
    entries: Vec<(Difficulty, f64)>,
}

impl ProbabilityDistribution {
    /// Build a distribution from explicit (unnormalized) weights
    pub fn from_weights(levels: &[Difficulty], weights: &[f64]) -> Result<Self, SimError> {
        if levels.len() != weights.len() {
            return Err(SimError::invalid(format!(
                "{} levels but {} weights",
                levels.len(),
                weights.len()
            )));
        }
        validate_levels(levels)?;
        if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(SimError::invalid(format!("weight {} is not a non-negative number", w)));
        }

        Self::normalized(levels.iter().copied().zip(weights.iter().copied()).collect())
    }

    fn normalized(entries: Vec<(Difficulty, f64)>) -> Result<Self, SimError> {
        let total: f64 = entries.iter().map(|(_, p)| p).sum();
        if total <= 0.0 || !total.is_finite() {
            return Err(SimError::invalid("distribution has no probability mass"));
        }

        let entries = entries.into_iter().map(|(d, p)| (d, p / total)).collect();
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[(Difficulty, f64)] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (Difficulty, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn levels(&self) -> Vec<Difficulty> {
        self.entries.iter().map(|(d, _)| *d).collect()
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, p)| *p).collect()
    }

    /// Probability of `level`, zero when outside the distribution
    pub fn probability(&self, level: Difficulty) -> f64 {
        self.entries
            .binary_search_by_key(&level, |(d, _)| *d)
            .map(|i| self.entries[i].1)
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn min_level(&self) -> Difficulty {
        self.entries[0].0
    }

    pub fn max_level(&self) -> Difficulty {
        self.entries[self.entries.len() - 1].0
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, p)| p).sum()
    }

    /// Expected difficulty per pass (Σ d·p)
    pub fn mean_difficulty(&self) -> f64 {
        self.entries.iter().map(|(d, p)| *d as f64 * p).sum()
    }

    /// Analytic expected reward per pass (Σ p·reward·multiplier)
    pub fn expected_reward(&self, rewards: &RewardTable, multiplier: f64) -> f64 {
        self.entries
            .iter()
            .map(|(d, p)| p * rewards.get(*d) * multiplier)
            .sum()
    }
}

/// Best-of-N difficulty model for a fixed hash rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyModel {
    hashes_per_minute: f64,
}

impl DifficultyModel {
    pub fn new(hashes_per_minute: f64) -> Result<Self, SimError> {
        if !hashes_per_minute.is_finite() || hashes_per_minute <= 0.0 {
            return Err(SimError::invalid(format!(
                "hashpower must be positive, got {} H/min",
                hashes_per_minute
            )));
        }
        Ok(Self { hashes_per_minute })
    }

    /// Benchmarks report H/s; the model works per minute
    pub fn from_hashes_per_second(hashes_per_second: f64) -> Result<Self, SimError> {
        Self::new(hashes_per_second * 60.0)
    }

    pub fn hashes_per_minute(&self) -> f64 {
        self.hashes_per_minute
    }

    /// `C(d)`: probability that no hash in a minute beats difficulty `d`
    pub fn cumulative(&self, difficulty: Difficulty) -> f64 {
        if difficulty == 0 {
            return 0.0;
        }
        let miss = 0.5f64.powf(difficulty as f64);
        (self.hashes_per_minute * (-miss).ln_1p()).exp()
    }

    /// `p(d) = C(d) - C(d-1)`: probability the best result is exactly `d`
    pub fn exact(&self, difficulty: Difficulty) -> f64 {
        if difficulty == 0 {
            return 0.0;
        }
        (self.cumulative(difficulty) - self.cumulative(difficulty - 1)).max(0.0)
    }

    /// Probability distribution over `levels`
    ///
    /// `decay_rate` multiplies each level by `exp(-rate * (d - first_level))`.
    /// `observed_range` keeps only levels inside the inclusive range. The
    /// result is normalized once, after both steps.
    pub fn distribution(
        &self,
        levels: &[Difficulty],
        decay_rate: Option<f64>,
        observed_range: Option<(Difficulty, Difficulty)>,
    ) -> Result<ProbabilityDistribution, SimError> {
        validate_levels(levels)?;

        if let Some(rate) = decay_rate {
            if !rate.is_finite() || rate < 0.0 {
                return Err(SimError::invalid(format!(
                    "decay rate must be non-negative, got {}",
                    rate
                )));
            }
        }

        let min_level = levels[0];
        let mut entries: Vec<(Difficulty, f64)> = levels
            .iter()
            .map(|&d| {
                let p = self.exact(d);
                match decay_rate {
                    Some(rate) => (d, p * (-rate * (d - min_level) as f64).exp()),
                    None => (d, p),
                }
            })
            .collect();

        if let Some((start, end)) = observed_range {
            if start > end {
                return Err(SimError::invalid(format!(
                    "observed range [{}, {}] is inverted",
                    start, end
                )));
            }
            entries.retain(|(d, _)| *d >= start && *d <= end);
            if entries.is_empty() {
                return Err(SimError::invalid(format!(
                    "observed range [{}, {}] excludes every modelled level",
                    start, end
                )));
            }
        }

        ProbabilityDistribution::normalized(entries)
    }

    /// Distribution for a named decay preset
    pub fn scenario_distribution(
        &self,
        levels: &[Difficulty],
        scenario: Option<DecayScenario>,
        observed_range: Option<(Difficulty, Difficulty)>,
    ) -> Result<ProbabilityDistribution, SimError> {
        self.distribution(levels, scenario.map(DecayScenario::decay_rate), observed_range)
    }
}

fn validate_levels(levels: &[Difficulty]) -> Result<(), SimError> {
    if levels.is_empty() {
        return Err(SimError::invalid("difficulty level set is empty"));
    }
    if levels[0] == 0 {
        return Err(SimError::invalid("difficulty levels start at 1"));
    }
    if levels.windows(2).any(|w| w[0] >= w[1]) {
        return Err(SimError::invalid("difficulty levels must be strictly ascending"));
    }
    Ok(())
}

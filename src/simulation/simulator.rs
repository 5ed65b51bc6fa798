//! Monte Carlo day simulation
//!
//! Each trial is one minute of mining: draw the best difficulty reached from
//! the probability model, pay out the table reward scaled by the stake
//! multiplier, and charge the per-pass fees and amortized running cost.

use std::collections::BTreeMap;

use log::{debug, trace};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::Serialize;

use super::{CostModel, MarketPrices};
use crate::constants::MINUTES_PER_DAY;
use crate::model::{Difficulty, ProbabilityDistribution, RewardTable, SimError};

/// Aggregated outcome of one simulation run
///
/// Hit counts cover every level of the sampled distribution and always sum
/// to the trial count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    trials: u64,
    total_mined: f64,
    total_profit_usd: f64,
    hits: BTreeMap<Difficulty, u64>,
}

impl SimulationResult {
    pub fn trials(&self) -> u64 {
        self.trials
    }

    /// Total ORE mined across all trials
    pub fn total_mined(&self) -> f64 {
        self.total_mined
    }

    /// Reward value minus costs across all trials (USD)
    pub fn total_profit_usd(&self) -> f64 {
        self.total_profit_usd
    }

    pub fn hits(&self) -> &BTreeMap<Difficulty, u64> {
        &self.hits
    }

    pub fn hit_count(&self, difficulty: Difficulty) -> u64 {
        self.hits.get(&difficulty).copied().unwrap_or(0)
    }

    pub fn total_hits(&self) -> u64 {
        self.hits.values().sum()
    }

    pub fn mean_mined_per_trial(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.total_mined / self.trials as f64
    }

    pub fn mined_value_usd(&self, ore_price: f64) -> f64 {
        self.total_mined * ore_price
    }

    /// Average profit per simulated hour (one trial per minute)
    pub fn profit_per_hour_usd(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.total_profit_usd / (self.trials as f64 / 60.0)
    }
}

/// Validated simulation inputs, ready to run any number of times
#[derive(Debug, Clone)]
pub struct DaySimulator<'a> {
    distribution: &'a ProbabilityDistribution,
    rewards: &'a RewardTable,
    multiplier: f64,
    costs: CostModel,
    prices: MarketPrices,
    sampler: WeightedIndex<f64>,
}

impl<'a> DaySimulator<'a> {
    /// Validate every input up front so a run never fails halfway
    pub fn new(
        distribution: &'a ProbabilityDistribution,
        rewards: &'a RewardTable,
        multiplier: f64,
        costs: CostModel,
        prices: MarketPrices,
    ) -> Result<Self, SimError> {
        prices.validate()?;
        costs.validate()?;
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(SimError::invalid(format!(
                "stake multiplier must be positive, got {}",
                multiplier
            )));
        }

        let sampler = WeightedIndex::new(distribution.probabilities())
            .map_err(|e| SimError::invalid(format!("distribution cannot be sampled: {}", e)))?;

        Ok(Self {
            distribution,
            rewards,
            multiplier,
            costs,
            prices,
            sampler,
        })
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Effective ORE paid for a pass that reaches `difficulty`
    pub fn reward_per_pass(&self, difficulty: Difficulty) -> f64 {
        self.rewards.get(difficulty) * self.multiplier
    }

    pub fn cost_per_pass_usd(&self) -> f64 {
        self.costs.cost_per_pass_usd(self.prices.sol_usd)
    }

    /// Run `trials` independent one-minute passes
    pub fn run<R: Rng + ?Sized>(&self, trials: u64, rng: &mut R) -> SimulationResult {
        let levels = self.distribution.levels();
        let mut counts = vec![0u64; levels.len()];
        let cost = self.cost_per_pass_usd();
        let mut total_mined = 0.0;
        let mut total_profit_usd = 0.0;

        debug!(
            "Simulating {} passes over {} levels (multiplier {:.8}, cost ${:.6}/pass)",
            trials,
            levels.len(),
            self.multiplier,
            cost
        );

        for minute in 0..trials {
            let index = self.sampler.sample(rng);
            let reward = self.reward_per_pass(levels[index]);

            total_mined += reward;
            total_profit_usd += reward * self.prices.ore_usd - cost;
            counts[index] += 1;

            if (minute + 1) % 60 == 0 {
                trace!(
                    "hour {}: {:.8} ORE mined, ${:.6} profit",
                    (minute + 1) / 60,
                    total_mined,
                    total_profit_usd
                );
            }
        }

        debug!(
            "Simulation finished: {:.8} ORE, ${:.6} profit",
            total_mined, total_profit_usd
        );

        SimulationResult {
            trials,
            total_mined,
            total_profit_usd,
            hits: levels.into_iter().zip(counts).collect(),
        }
    }

    /// One pass per minute for 24 hours
    pub fn run_day<R: Rng + ?Sized>(&self, rng: &mut R) -> SimulationResult {
        self.run(MINUTES_PER_DAY, rng)
    }
}

/// Validate inputs and run a simulation in one call
pub fn simulate_day<R: Rng + ?Sized>(
    distribution: &ProbabilityDistribution,
    rewards: &RewardTable,
    multiplier: f64,
    costs: CostModel,
    prices: MarketPrices,
    trials: u64,
    rng: &mut R,
) -> Result<SimulationResult, SimError> {
    let simulator = DaySimulator::new(distribution, rewards, multiplier, costs, prices)?;
    Ok(simulator.run(trials, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn two_level_setup() -> (ProbabilityDistribution, RewardTable) {
        let dist = ProbabilityDistribution::from_weights(&[1, 2], &[0.7, 0.3]).unwrap();
        let rewards = RewardTable::from_iter([(1, 0.01), (2, 0.02)]);
        (dist, rewards)
    }

    fn prices() -> MarketPrices {
        MarketPrices::new(20.0, 150.0).unwrap()
    }

    #[test]
    fn test_hits_sum_to_trials() {
        let (dist, rewards) = two_level_setup();
        let sim = DaySimulator::new(&dist, &rewards, 1.0, CostModel::new(0, 0.0), prices()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for trials in [0, 1, 59, 1440] {
            let result = sim.run(trials, &mut rng);
            assert_eq!(result.total_hits(), trials);
            assert_eq!(result.trials(), trials);
        }
    }

    #[test]
    fn test_zero_trials_reports_every_level() {
        let (dist, rewards) = two_level_setup();
        let sim = DaySimulator::new(&dist, &rewards, 1.0, CostModel::new(0, 0.0), prices()).unwrap();
        let result = sim.run(0, &mut ChaCha8Rng::seed_from_u64(0));

        assert_eq!(result.hits().len(), 2);
        assert_eq!(result.total_mined(), 0.0);
        assert_eq!(result.mean_mined_per_trial(), 0.0);
        assert_eq!(result.profit_per_hour_usd(), 0.0);
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let (dist, rewards) = two_level_setup();
        let sim = DaySimulator::new(&dist, &rewards, 1.5, CostModel::new(10_000, 0.5), prices()).unwrap();

        let a = sim.run_day(&mut ChaCha8Rng::seed_from_u64(42));
        let b = sim.run_day(&mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
        assert_eq!(a.total_mined().to_bits(), b.total_mined().to_bits());
    }

    #[test]
    fn test_two_level_scenario_total() {
        let (dist, rewards) = two_level_setup();
        let sim = DaySimulator::new(&dist, &rewards, 1.5, CostModel::new(0, 0.0), prices()).unwrap();
        let result = sim.run(1000, &mut ChaCha8Rng::seed_from_u64(2024));

        // 1000 * (0.7 * 0.01 + 0.3 * 0.02) * 1.5 = 19.5, sd of the total ~0.22
        assert!((result.total_mined() - 19.5).abs() < 19.5 * 0.05);
    }

    #[test]
    fn test_missing_reward_entry_pays_zero() {
        let dist = ProbabilityDistribution::from_weights(&[1, 2, 3], &[1.0, 1.0, 1.0]).unwrap();
        let rewards = RewardTable::from_iter([(2, 1.0)]);
        let sim = DaySimulator::new(&dist, &rewards, 1.0, CostModel::new(0, 0.0), prices()).unwrap();
        let result = sim.run(3000, &mut ChaCha8Rng::seed_from_u64(3));

        assert_eq!(result.total_mined(), result.hit_count(2) as f64);
    }

    #[test]
    fn test_profit_subtracts_costs() {
        let (dist, _) = two_level_setup();
        let empty = RewardTable::default();
        // 95_000 + 5_000 lamports at $150 plus $0.60/h = $0.025 per pass
        let sim = DaySimulator::new(&dist, &empty, 1.0, CostModel::new(95_000, 0.6), prices()).unwrap();
        let result = sim.run(100, &mut ChaCha8Rng::seed_from_u64(1));

        assert_eq!(result.total_mined(), 0.0);
        assert!((result.total_profit_usd() + 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_inputs_fail_before_running() {
        let (dist, rewards) = two_level_setup();
        let bad_prices = MarketPrices { ore_usd: 0.0, sol_usd: 150.0 };
        let costs = CostModel::new(0, 0.0);

        assert!(matches!(
            DaySimulator::new(&dist, &rewards, 1.0, costs, bad_prices),
            Err(SimError::InvalidInput(_))
        ));
        assert!(DaySimulator::new(&dist, &rewards, 0.0, costs, prices()).is_err());
        assert!(DaySimulator::new(&dist, &rewards, f64::NAN, costs, prices()).is_err());
        assert!(DaySimulator::new(&dist, &rewards, 1.0, CostModel::new(0, -2.0), prices()).is_err());
    }

    #[test]
    fn test_simulate_day_helper() {
        let (dist, rewards) = two_level_setup();
        let result = simulate_day(
            &dist,
            &rewards,
            1.0,
            CostModel::new(0, 0.0),
            prices(),
            MINUTES_PER_DAY,
            &mut ChaCha8Rng::seed_from_u64(9),
        )
        .unwrap();
        assert_eq!(result.total_hits(), 1440);
    }
}

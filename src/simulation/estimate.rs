//! End-to-end estimate pipeline
//!
//! Pulls the reward table and stake from a `MiningDataSource`, builds the
//! difficulty distribution from config, and runs the day simulation with its
//! projections.

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use super::{
    breakeven, stake_scenarios, tier_breakdown, BreakevenSuggestion, CostModel, DaySimulator,
    MarketPrices, RewardBasis, SimulationResult, StakeScenario, TierRow,
};
use crate::config::Config;
use crate::constants::MINUTES_PER_DAY;
use crate::model::{DecayScenario, ProbabilityDistribution, RewardTable, SimError, StakeState};
use crate::sources::MiningDataSource;

/// Seeded generator for reproducible runs, entropy otherwise
pub fn rng_from_seed(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Everything one `simulate` run produces
#[derive(Debug, Clone, Serialize)]
pub struct Estimate {
    pub prices: MarketPrices,
    pub stake: StakeState,
    pub multiplier: f64,
    pub scenario: Option<DecayScenario>,
    pub costs: CostModel,
    pub distribution: ProbabilityDistribution,
    pub mean_difficulty: f64,
    /// Probability-weighted ORE per pass (multiplier applied)
    pub expected_ore_per_pass: f64,
    pub expected_ore_per_day: f64,
    pub result: SimulationResult,
    pub tiers: Vec<TierRow>,
    pub stake_scenarios: Vec<StakeScenario>,
}

impl Estimate {
    pub fn cost_per_pass_usd(&self) -> f64 {
        self.costs.cost_per_pass_usd(self.prices.sol_usd)
    }

    pub fn mined_value_usd(&self) -> f64 {
        self.result.mined_value_usd(self.prices.ore_usd)
    }
}

/// Runs the estimate pipeline against one data source
pub struct Estimator<'a, S: MiningDataSource> {
    config: &'a Config,
    source: S,
}

impl<'a, S: MiningDataSource> Estimator<'a, S> {
    pub fn new(config: &'a Config, source: S) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    /// Reward table and stake snapshot; an empty table is missing data
    pub fn load_inputs(&self) -> Result<(RewardTable, StakeState), SimError> {
        let rewards = self.source.reward_table()?;
        if rewards.is_empty() {
            return Err(SimError::missing("reward table is empty"));
        }
        let stake = self.source.stake_state()?;
        debug!(
            "Loaded {} reward levels, stake {} / top {}",
            rewards.len(),
            stake.stake,
            stake.top_stake
        );
        Ok((rewards, stake))
    }

    /// Distribution over the configured levels
    ///
    /// Clipped to the levels the reward table covers when one is given and
    /// non-empty.
    pub fn distribution(&self, rewards: Option<&RewardTable>) -> Result<ProbabilityDistribution, SimError> {
        let model = self.config.difficulty_model()?;
        let observed = rewards.and_then(RewardTable::observed_range);
        model.scenario_distribution(&self.config.levels(), self.config.miner.scenario, observed)
    }

    /// Run the full simulation and its projections
    pub fn estimate<R: Rng + ?Sized>(&self, prices: MarketPrices, rng: &mut R) -> Result<Estimate, SimError> {
        self.config.validate()?;
        let (rewards, stake) = self.load_inputs()?;
        let distribution = self.distribution(Some(&rewards))?;
        let multiplier = stake.multiplier();
        let costs = self.config.cost_model();

        let result = DaySimulator::new(&distribution, &rewards, multiplier, costs, prices)?
            .run(self.config.simulation.trials, rng);
        info!(
            "Simulated {} passes: {:.8} ORE, ${:.4} profit",
            result.trials(),
            result.total_mined(),
            result.total_profit_usd()
        );

        let expected_ore_per_pass = distribution.expected_reward(&rewards, multiplier);
        let tiers = tier_breakdown(&result, &rewards, multiplier);
        let scenarios = stake_scenarios(
            &result,
            &rewards,
            &stake,
            prices.ore_usd,
            &self.config.simulation.stake_increments,
        )?;

        Ok(Estimate {
            prices,
            stake,
            multiplier,
            scenario: self.config.miner.scenario,
            costs,
            mean_difficulty: distribution.mean_difficulty(),
            expected_ore_per_pass,
            expected_ore_per_day: expected_ore_per_pass * MINUTES_PER_DAY as f64,
            distribution,
            result,
            tiers,
            stake_scenarios: scenarios,
        })
    }

    /// Breakeven ORE price and priority fee for the chosen reward basis
    pub fn breakeven(&self, prices: MarketPrices, basis: RewardBasis) -> Result<BreakevenSuggestion, SimError> {
        self.config.validate()?;
        let (rewards, stake) = self.load_inputs()?;
        let multiplier = stake.multiplier();

        let reward_per_pass = match basis {
            RewardBasis::Target(difficulty) => rewards.get(difficulty) * multiplier,
            RewardBasis::Expected => self
                .distribution(Some(&rewards))?
                .expected_reward(&rewards, multiplier),
        };

        breakeven(reward_per_pass, &self.config.cost_model(), &prices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::StaticSource;

    fn config() -> Config {
        let mut config = Config::default();
        config.miner.hashpower_per_second = 1000.0;
        config.miner.priority_fee_lamports = 10_000;
        config.miner.hourly_cost_usd = 0.3;
        config
    }

    fn source() -> StaticSource {
        let rewards = RewardTable::from_iter((10..=25).map(|d| (d, 0.0001 * f64::from(d - 9))));
        StaticSource::new(rewards, StakeState::new(50.0, 200.0))
    }

    fn prices() -> MarketPrices {
        MarketPrices::new(25.0, 150.0).unwrap()
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let a: u64 = rng_from_seed(Some(9)).gen();
        let b: u64 = rng_from_seed(Some(9)).gen();
        assert_eq!(a, b);
    }

    #[test]
    fn test_estimate_pipeline() {
        let config = config();
        let estimator = Estimator::new(&config, source());
        let estimate = estimator.estimate(prices(), &mut rng_from_seed(Some(1))).unwrap();

        assert_eq!(estimate.result.trials(), 1440);
        assert_eq!(estimate.result.total_hits(), 1440);
        assert_eq!(estimate.multiplier, 1.25);
        assert_eq!(estimate.distribution.min_level(), 10);
        assert_eq!(estimate.distribution.max_level(), 25);
        assert_eq!(estimate.stake_scenarios.len(), 7);
        assert!((estimate.expected_ore_per_day - estimate.expected_ore_per_pass * 1440.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_reward_table_is_missing_data() {
        let config = config();
        let source = StaticSource::new(RewardTable::default(), StakeState::new(0.0, 0.0));
        let err = Estimator::new(&config, source)
            .estimate(prices(), &mut rng_from_seed(Some(1)))
            .unwrap_err();
        assert!(matches!(err, SimError::MissingExternalData(_)));
    }

    #[test]
    fn test_missing_stake_is_missing_data() {
        let config = config();
        let source = StaticSource::rewards_only(RewardTable::from_iter([(10, 0.1)]));
        let err = Estimator::new(&config, source).load_inputs().unwrap_err();
        assert!(matches!(err, SimError::MissingExternalData(_)));
    }

    #[test]
    fn test_invalid_config_rejected_before_sampling() {
        let mut config = config();
        config.miner.hashpower_per_second = 0.0;
        let err = Estimator::new(&config, source())
            .estimate(prices(), &mut rng_from_seed(Some(1)))
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidInput(_)));
    }

    #[test]
    fn test_distribution_without_table_uses_config_bounds() {
        let config = config();
        let dist = Estimator::new(&config, source()).distribution(None).unwrap();
        assert_eq!(dist.min_level(), 1);
        assert_eq!(dist.max_level(), 50);
    }

    #[test]
    fn test_breakeven_bases() {
        let config = config();
        let estimator = Estimator::new(&config, source());

        let target = estimator.breakeven(prices(), RewardBasis::Target(12)).unwrap();
        assert!((target.reward_per_pass - 0.0003 * 1.25).abs() < 1e-12);

        let unknown = estimator.breakeven(prices(), RewardBasis::Target(40)).unwrap();
        assert!(!unknown.ore_price.is_attainable());

        let expected = estimator.breakeven(prices(), RewardBasis::Expected).unwrap();
        assert!(expected.reward_per_pass > 0.0);
    }
}

//! Projections derived from a simulation run
//!
//! Closed-form views on top of `SimulationResult`: the per-difficulty tier
//! table, stake increase scenarios, and breakeven points.

use serde::Serialize;

use super::{lamports_to_sol, CostModel, MarketPrices, SimulationResult};
use crate::constants::LAMPORTS_PER_SOL;
use crate::model::{preview_multipliers, Difficulty, RewardTable, SimError, StakeState};

/// One row of the solved-difficulty breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierRow {
    pub difficulty: Difficulty,
    /// Effective ORE per pass at this difficulty (multiplier applied)
    pub reward_rate: f64,
    pub solves: u64,
    pub percentage: f64,
    pub cumulative_percentage: f64,
}

/// Per-difficulty share of the simulated passes, easiest first
pub fn tier_breakdown(result: &SimulationResult, rewards: &RewardTable, multiplier: f64) -> Vec<TierRow> {
    let trials = result.trials();
    let mut cumulative = 0.0;

    result
        .hits()
        .iter()
        .map(|(&difficulty, &solves)| {
            let percentage = if trials == 0 {
                0.0
            } else {
                solves as f64 / trials as f64 * 100.0
            };
            cumulative += percentage;
            TierRow {
                difficulty,
                reward_rate: rewards.get(difficulty) * multiplier,
                solves,
                percentage,
                cumulative_percentage: cumulative,
            }
        })
        .collect()
}

/// Projected output after buying `increment` more ORE to stake
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StakeScenario {
    pub increment: f64,
    pub new_stake: f64,
    pub multiplier: f64,
    /// Multiplier gain over the current one (%)
    pub increase_pct: f64,
    /// Cost of buying the extra ORE at the current price (USD)
    pub purchase_cost_usd: f64,
    pub expected_ore_per_day: f64,
    pub expected_usd_per_day: f64,
}

/// Replay the simulated hits under each hypothetical stake
pub fn stake_scenarios(
    result: &SimulationResult,
    rewards: &RewardTable,
    stake: &StakeState,
    ore_price: f64,
    increments: &[f64],
) -> Result<Vec<StakeScenario>, SimError> {
    let current = stake.multiplier();
    let base_ore: f64 = result
        .hits()
        .iter()
        .map(|(&difficulty, &hits)| hits as f64 * rewards.get(difficulty))
        .sum();

    let previews = preview_multipliers(stake.stake, stake.top_stake, increments)?;

    Ok(previews
        .into_iter()
        .map(|preview| {
            let expected_ore_per_day = base_ore * preview.multiplier;
            StakeScenario {
                increment: preview.increment,
                new_stake: stake.stake + preview.increment,
                multiplier: preview.multiplier,
                increase_pct: if current > 0.0 {
                    (preview.multiplier - current) / current * 100.0
                } else {
                    0.0
                },
                purchase_cost_usd: preview.increment * ore_price,
                expected_ore_per_day,
                expected_usd_per_day: expected_ore_per_day * ore_price,
            }
        })
        .collect())
}

/// ORE price at which a pass pays for itself
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "usd", rename_all = "snake_case")]
pub enum BreakevenPrice {
    Price(f64),
    /// The pass earns nothing, so no price covers its cost
    Unattainable,
}

impl BreakevenPrice {
    pub fn value(&self) -> Option<f64> {
        match self {
            BreakevenPrice::Price(p) => Some(*p),
            BreakevenPrice::Unattainable => None,
        }
    }

    pub fn is_attainable(&self) -> bool {
        matches!(self, BreakevenPrice::Price(_))
    }
}

/// Breakeven targets for a given per-pass reward
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakevenSuggestion {
    pub reward_per_pass: f64,
    pub revenue_per_pass_usd: f64,
    pub cost_per_pass_usd: f64,
    pub profit_per_pass_usd: f64,
    pub ore_price: BreakevenPrice,
    /// Highest priority fee that still breaks even at today's ORE price
    pub max_priority_fee_lamports: u64,
}

impl BreakevenSuggestion {
    pub fn is_profitable(&self) -> bool {
        self.profit_per_pass_usd >= 0.0
    }
}

/// Which per-pass reward a breakeven is computed against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardBasis {
    /// Reward for always landing exactly this difficulty
    Target(Difficulty),
    /// Probability-weighted reward over the distribution
    Expected,
}

/// Breakeven ORE price and priority fee for `reward_per_pass` ORE per pass
pub fn breakeven(
    reward_per_pass: f64,
    costs: &CostModel,
    prices: &MarketPrices,
) -> Result<BreakevenSuggestion, SimError> {
    prices.validate()?;
    costs.validate()?;
    if !reward_per_pass.is_finite() || reward_per_pass < 0.0 {
        return Err(SimError::invalid(format!(
            "reward per pass must be non-negative, got {}",
            reward_per_pass
        )));
    }

    let revenue = reward_per_pass * prices.ore_usd;
    let cost = costs.cost_per_pass_usd(prices.sol_usd);

    let ore_price = if reward_per_pass > 0.0 {
        BreakevenPrice::Price(cost / reward_per_pass)
    } else {
        BreakevenPrice::Unattainable
    };

    let fee_budget_sol = (revenue - costs.external_cost_per_pass_usd()) / prices.sol_usd;
    let fee_budget_lamports = (fee_budget_sol * LAMPORTS_PER_SOL).floor();
    let max_priority_fee = (fee_budget_lamports - costs.mining_fee_lamports as f64).max(0.0);

    Ok(BreakevenSuggestion {
        reward_per_pass,
        revenue_per_pass_usd: revenue,
        cost_per_pass_usd: cost,
        profit_per_pass_usd: revenue - cost,
        ore_price,
        max_priority_fee_lamports: if max_priority_fee >= u64::MAX as f64 {
            u64::MAX
        } else {
            max_priority_fee as u64
        },
    })
}

/// Priority fee expressed in SOL, for display
pub fn priority_fee_sol(costs: &CostModel) -> f64 {
    lamports_to_sol(costs.priority_fee_lamports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProbabilityDistribution;
    use crate::simulation::DaySimulator;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn simulated(trials: u64) -> (SimulationResult, RewardTable) {
        let dist = ProbabilityDistribution::from_weights(&[1, 2, 3], &[0.5, 0.3, 0.2]).unwrap();
        let rewards = RewardTable::from_iter([(1, 0.01), (2, 0.02), (3, 0.04)]);
        let prices = MarketPrices::new(20.0, 150.0).unwrap();
        let result = DaySimulator::new(&dist, &rewards, 1.0, CostModel::new(0, 0.0), prices)
            .unwrap()
            .run(trials, &mut ChaCha8Rng::seed_from_u64(11));
        (result, rewards)
    }

    #[test]
    fn test_tier_breakdown_cumulates_to_100() {
        let (result, rewards) = simulated(1440);
        let rows = tier_breakdown(&result, &rewards, 2.0);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].difficulty, 1);
        assert_eq!(rows[2].reward_rate, 0.08);
        assert!((rows[2].cumulative_percentage - 100.0).abs() < 1e-9);
        assert_eq!(rows.iter().map(|r| r.solves).sum::<u64>(), 1440);
    }

    #[test]
    fn test_tier_breakdown_zero_trials() {
        let (result, rewards) = simulated(0);
        let rows = tier_breakdown(&result, &rewards, 1.0);
        assert!(rows.iter().all(|r| r.percentage == 0.0 && r.cumulative_percentage == 0.0));
    }

    #[test]
    fn test_stake_scenarios_scale_simulated_output() {
        let (result, rewards) = simulated(1440);
        let stake = StakeState::new(10.0, 100.0);
        let rows = stake_scenarios(&result, &rewards, &stake, 20.0, &[10.0, 90.0]).unwrap();

        // Hits are replayed under each multiplier: base output * m'
        let base = result.total_mined();
        assert!((rows[0].multiplier - 1.2).abs() < 1e-12);
        assert!((rows[0].expected_ore_per_day - base * 1.2).abs() < 1e-9);
        assert!((rows[1].multiplier - 2.0).abs() < 1e-12);
        assert!((rows[1].increase_pct - (2.0 - 1.1) / 1.1 * 100.0).abs() < 1e-9);
        assert_eq!(rows[1].purchase_cost_usd, 1800.0);
        assert_eq!(rows[1].new_stake, 100.0);
    }

    #[test]
    fn test_stake_scenarios_without_top_stake() {
        let (result, rewards) = simulated(100);
        let stake = StakeState::new(5.0, 0.0);
        let rows = stake_scenarios(&result, &rewards, &stake, 20.0, &[1.0]).unwrap();
        assert_eq!(rows[0].multiplier, 1.0);
        assert_eq!(rows[0].increase_pct, 0.0);
    }

    #[test]
    fn test_breakeven_price() {
        let costs = CostModel::new(95_000, 0.6);
        let prices = MarketPrices::new(20.0, 150.0).unwrap();
        let suggestion = breakeven(0.005, &costs, &prices).unwrap();

        // $0.025 cost per pass / 0.005 ORE
        assert!((suggestion.ore_price.value().unwrap() - 5.0).abs() < 1e-9);
        assert!((suggestion.revenue_per_pass_usd - 0.1).abs() < 1e-12);
        assert!(suggestion.is_profitable());
    }

    #[test]
    fn test_breakeven_priority_fee() {
        let costs = CostModel::new(0, 0.6);
        let prices = MarketPrices::new(20.0, 100.0).unwrap();
        // revenue $0.02, running cost $0.01 -> $0.01 of fees = 100_000 lamports
        let suggestion = breakeven(0.001, &costs, &prices).unwrap();
        let expected = 100_000 - costs.mining_fee_lamports;
        assert!(suggestion.max_priority_fee_lamports.abs_diff(expected) <= 1);
    }

    #[test]
    fn test_zero_reward_is_unattainable() {
        let costs = CostModel::new(10_000, 1.0);
        let prices = MarketPrices::new(20.0, 150.0).unwrap();
        let suggestion = breakeven(0.0, &costs, &prices).unwrap();

        assert_eq!(suggestion.ore_price, BreakevenPrice::Unattainable);
        assert!(!suggestion.ore_price.is_attainable());
        assert_eq!(suggestion.max_priority_fee_lamports, 0);
        assert!(!suggestion.is_profitable());
    }

    #[test]
    fn test_breakeven_rejects_bad_reward() {
        let prices = MarketPrices::new(20.0, 150.0).unwrap();
        assert!(breakeven(-1.0, &CostModel::new(0, 0.0), &prices).is_err());
        assert!(breakeven(f64::NAN, &CostModel::new(0, 0.0), &prices).is_err());
    }
}

//! Stake reward multiplier
//!
//! Rewards scale with the miner's stake relative to the top staker:
//! `1 + stake / top_stake`. With no top stake on record the multiplier is
//! neutral.

use serde::{Deserialize, Serialize};

use super::SimError;

/// Snapshot of the miner's stake and the largest stake on the network (ORE)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StakeState {
    pub stake: f64,
    pub top_stake: f64,
}

impl StakeState {
    pub fn new(stake: f64, top_stake: f64) -> Self {
        Self { stake, top_stake }
    }

    pub fn multiplier(&self) -> f64 {
        calculate_multiplier(self.stake, self.top_stake)
    }
}

/// One row of the "what if I staked more" preview
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MultiplierPreview {
    pub increment: f64,
    pub multiplier: f64,
}

/// Reward multiplier for `stake` against `top_stake`
pub fn calculate_multiplier(stake: f64, top_stake: f64) -> f64 {
    if !top_stake.is_finite() || top_stake <= 0.0 {
        return 1.0;
    }
    1.0 + stake / top_stake
}

/// Multipliers after adding each increment to the current stake
pub fn preview_multipliers(
    stake: f64,
    top_stake: f64,
    increments: &[f64],
) -> Result<Vec<MultiplierPreview>, SimError> {
    validate_increments(increments)?;

    Ok(increments
        .iter()
        .map(|&increment| MultiplierPreview {
            increment,
            multiplier: calculate_multiplier(stake + increment, top_stake),
        })
        .collect())
}

/// Increments must be non-empty, non-negative and strictly ascending
pub fn validate_increments(increments: &[f64]) -> Result<(), SimError> {
    if increments.is_empty() {
        return Err(SimError::invalid("stake increment list is empty"));
    }
    if let Some(bad) = increments.iter().find(|i| !i.is_finite() || **i < 0.0) {
        return Err(SimError::invalid(format!("stake increment {} is not a non-negative number", bad)));
    }
    if increments.windows(2).any(|w| w[0] >= w[1]) {
        return Err(SimError::invalid("stake increments must be strictly ascending"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_STAKE_INCREMENTS;

    #[test]
    fn test_multiplier_formula() {
        assert_eq!(calculate_multiplier(50.0, 100.0), 1.5);
        assert_eq!(calculate_multiplier(100.0, 100.0), 2.0);
    }

    #[test]
    fn test_zero_stake_is_neutral() {
        assert_eq!(calculate_multiplier(0.0, 250.0), 1.0);
    }

    #[test]
    fn test_no_top_stake_is_neutral() {
        assert_eq!(calculate_multiplier(42.0, 0.0), 1.0);
        assert_eq!(calculate_multiplier(42.0, -1.0), 1.0);
        assert_eq!(calculate_multiplier(42.0, f64::NAN), 1.0);
    }

    #[test]
    fn test_preview_default_increments() {
        let preview = preview_multipliers(10.0, 100.0, &DEFAULT_STAKE_INCREMENTS).unwrap();

        assert_eq!(preview.len(), 7);
        assert_eq!(preview[0].increment, 1.0);
        assert!((preview[0].multiplier - 1.11).abs() < 1e-12);
        assert!((preview[6].multiplier - 2.1).abs() < 1e-12);
        assert!(preview.windows(2).all(|w| w[0].multiplier <= w[1].multiplier));
    }

    #[test]
    fn test_preview_rejects_malformed_increments() {
        assert!(preview_multipliers(1.0, 10.0, &[]).is_err());
        assert!(preview_multipliers(1.0, 10.0, &[5.0, 1.0]).is_err());
        assert!(preview_multipliers(1.0, 10.0, &[1.0, 1.0]).is_err());
        assert!(preview_multipliers(1.0, 10.0, &[-1.0, 1.0]).is_err());
    }

    #[test]
    fn test_stake_state_multiplier() {
        let state = StakeState::new(25.0, 100.0);
        assert_eq!(state.multiplier(), 1.25);
    }
}

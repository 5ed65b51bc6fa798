//! In-memory data source for tests and offline runs

use super::{parse_reward_table, parse_stake, parse_top_stake, MiningDataSource, SourceError};
use crate::model::{RewardTable, StakeState};

/// Returns preset data instead of calling the mining client
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    rewards: RewardTable,
    stake: Option<StakeState>,
}

impl StaticSource {
    pub fn new(rewards: RewardTable, stake: StakeState) -> Self {
        Self {
            rewards,
            stake: Some(stake),
        }
    }

    /// Source with a reward table but no stake snapshot
    pub fn rewards_only(rewards: RewardTable) -> Self {
        Self { rewards, stake: None }
    }

    /// Build from captured `ore rewards`, `ore balance` and `ore config` output
    pub fn from_cli_output(rewards: &str, balance: &str, config: &str) -> Result<Self, SourceError> {
        Ok(Self::new(
            parse_reward_table(rewards),
            StakeState::new(parse_stake(balance)?, parse_top_stake(config)?),
        ))
    }
}

impl MiningDataSource for StaticSource {
    fn reward_table(&self) -> Result<RewardTable, SourceError> {
        Ok(self.rewards.clone())
    }

    fn stake_state(&self) -> Result<StakeState, SourceError> {
        self.stake
            .ok_or_else(|| SourceError::Unavailable("no stake snapshot".to_string()))
    }
}

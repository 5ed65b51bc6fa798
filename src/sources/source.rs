//! Mining data source interface

use thiserror::Error;

use crate::model::{RewardTable, SimError, StakeState};

/// Failures while collecting external mining data
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to run `{command}`: {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
    #[error("Malformed {label} line: {line}")]
    Parse { label: String, line: String },
    #[error("Data unavailable: {0}")]
    Unavailable(String),
}

impl From<SourceError> for SimError {
    fn from(err: SourceError) -> Self {
        SimError::MissingExternalData(err.to_string())
    }
}

/// Provider of the reward schedule and stake snapshot
pub trait MiningDataSource {
    /// Difficulty -> ORE per pass
    fn reward_table(&self) -> Result<RewardTable, SourceError>;

    /// Current stake and the largest stake on the network
    fn stake_state(&self) -> Result<StakeState, SourceError>;
}

impl<T: MiningDataSource + ?Sized> MiningDataSource for &T {
    fn reward_table(&self) -> Result<RewardTable, SourceError> {
        (**self).reward_table()
    }

    fn stake_state(&self) -> Result<StakeState, SourceError> {
        (**self).stake_state()
    }
}

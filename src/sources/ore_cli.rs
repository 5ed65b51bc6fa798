//! Adapter for the `ore` mining client binary

use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, warn};

use super::{parse_reward_table, parse_stake, parse_top_stake, MiningDataSource, SourceError};
use crate::model::{RewardTable, StakeState};

/// Shells out to the `ore` CLI and parses its text output
#[derive(Debug, Clone)]
pub struct OreCli {
    binary: PathBuf,
    /// Extra arguments placed before every subcommand (e.g. `--rpc`, `--keypair`)
    args: Vec<String>,
}

impl OreCli {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Run `ore <args> <subcommand>` and return its stdout
    pub fn run(&self, subcommand: &str) -> Result<String, SourceError> {
        let command = format!("{} {}", self.binary.display(), subcommand);
        debug!("Running `{}`", command);

        let output = Command::new(&self.binary)
            .args(&self.args)
            .arg(subcommand)
            .output()
            .map_err(|source| SourceError::Io {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!("`{}` failed: {}", command, stderr);
            return Err(SourceError::CommandFailed {
                command,
                status: output.status.to_string(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Default for OreCli {
    fn default() -> Self {
        Self::new("ore")
    }
}

impl MiningDataSource for OreCli {
    fn reward_table(&self) -> Result<RewardTable, SourceError> {
        let table = parse_reward_table(&self.run("rewards")?);
        debug!("Parsed {} reward levels", table.len());
        Ok(table)
    }

    fn stake_state(&self) -> Result<StakeState, SourceError> {
        let stake = parse_stake(&self.run("balance")?)?;
        let top_stake = parse_top_stake(&self.run("config")?)?;
        debug!("Stake {} ORE, top stake {} ORE", stake, top_stake);
        Ok(StakeState::new(stake, top_stake))
    }
}

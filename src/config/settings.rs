//! Estimator configuration
//!
//! Loaded from `~/.ore-calc/config.toml` when present. Every field has a
//! default, so a partial file is enough.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    BIRDEYE_API_URL, DEFAULT_MAX_DIFFICULTY, DEFAULT_MIN_DIFFICULTY, DEFAULT_STAKE_INCREMENTS,
    MINUTES_PER_DAY, ORE_ADDRESS, ORE_MINING_FEE_LAMPORTS, SOL_ADDRESS,
};
use crate::model::{level_range, validate_increments, DecayScenario, Difficulty, DifficultyModel, SimError};
use crate::simulation::CostModel;

/// Environment variable that overrides `api.api_key`
pub const API_KEY_ENV: &str = "ORE_CALC_API_KEY";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub miner: MinerConfig,

    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Price API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// BirdEye API key
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_sol_address")]
    pub sol_address: String,

    #[serde(default = "default_ore_address")]
    pub ore_address: String,

    /// Request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// The miner being estimated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinerConfig {
    /// Benchmark hash rate (H/s)
    #[serde(default)]
    pub hashpower_per_second: f64,

    #[serde(default)]
    pub priority_fee_lamports: u64,

    /// Electricity or rental cost (USD per hour)
    #[serde(default)]
    pub hourly_cost_usd: f64,

    /// Decay preset; `None` uses the raw model
    #[serde(default)]
    pub scenario: Option<DecayScenario>,

    /// Path or name of the `ore` client
    #[serde(default = "default_ore_binary")]
    pub ore_binary: String,

    /// Extra arguments passed to every `ore` call (RPC URL, keypair)
    #[serde(default)]
    pub ore_args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_trials")]
    pub trials: u64,

    /// Fixed RNG seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default = "default_min_difficulty")]
    pub min_difficulty: Difficulty,

    #[serde(default = "default_max_difficulty")]
    pub max_difficulty: Difficulty,

    #[serde(default = "default_mining_fee")]
    pub mining_fee_lamports: u64,

    /// Stake increases shown in the multiplier preview (ORE)
    #[serde(default = "default_stake_increments")]
    pub stake_increments: Vec<f64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            sol_address: default_sol_address(),
            ore_address: default_ore_address(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            hashpower_per_second: 0.0,
            priority_fee_lamports: 0,
            hourly_cost_usd: 0.0,
            scenario: None,
            ore_binary: default_ore_binary(),
            ore_args: Vec::new(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: default_trials(),
            seed: None,
            min_difficulty: default_min_difficulty(),
            max_difficulty: default_max_difficulty(),
            mining_fee_lamports: default_mining_fee(),
            stake_increments: default_stake_increments(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config TOML {}", path.display()))?;

        Ok(config)
    }

    /// Save config to a TOML file, creating the parent directory
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let text = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, text).context("Failed to write config file")?;

        Ok(())
    }

    /// `~/.ore-calc/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".ore-calc").join("config.toml"))
    }

    /// Load `path`, or the default location when `None`
    ///
    /// A missing default file yields defaults; a missing explicit file is an
    /// error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::from_file(path)?
                } else {
                    log::debug!("No config at {}, using defaults", path.display());
                    Self::default()
                }
            }
        };
        config.apply_env();
        Ok(config)
    }

    /// Apply environment overrides
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.api.api_key = key.trim().to_string();
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), SimError> {
        let hashpower = self.miner.hashpower_per_second;
        if !hashpower.is_finite() || hashpower <= 0.0 {
            return Err(SimError::invalid(format!(
                "hashpower must be positive, got {} H/s",
                hashpower
            )));
        }

        if self.simulation.min_difficulty == 0 {
            return Err(SimError::invalid("minimum difficulty must be at least 1"));
        }
        if self.simulation.min_difficulty > self.simulation.max_difficulty {
            return Err(SimError::invalid(format!(
                "difficulty bounds [{}, {}] are inverted",
                self.simulation.min_difficulty, self.simulation.max_difficulty
            )));
        }

        self.cost_model().validate()?;
        validate_increments(&self.simulation.stake_increments)?;

        Ok(())
    }

    /// Modelled difficulty levels from the configured bounds
    pub fn levels(&self) -> Vec<Difficulty> {
        level_range(self.simulation.min_difficulty, self.simulation.max_difficulty)
    }

    pub fn cost_model(&self) -> CostModel {
        CostModel::new(self.miner.priority_fee_lamports, self.miner.hourly_cost_usd)
            .with_mining_fee(self.simulation.mining_fee_lamports)
    }

    pub fn difficulty_model(&self) -> Result<DifficultyModel, SimError> {
        DifficultyModel::from_hashes_per_second(self.miner.hashpower_per_second)
    }
}

// Default value functions
fn default_base_url() -> String {
    BIRDEYE_API_URL.to_string()
}

fn default_sol_address() -> String {
    SOL_ADDRESS.to_string()
}

fn default_ore_address() -> String {
    ORE_ADDRESS.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_ore_binary() -> String {
    "ore".to_string()
}

fn default_trials() -> u64 {
    MINUTES_PER_DAY
}

fn default_min_difficulty() -> Difficulty {
    DEFAULT_MIN_DIFFICULTY
}

fn default_max_difficulty() -> Difficulty {
    DEFAULT_MAX_DIFFICULTY
}

fn default_mining_fee() -> u64 {
    ORE_MINING_FEE_LAMPORTS
}

fn default_stake_increments() -> Vec<f64> {
    DEFAULT_STAKE_INCREMENTS.to_vec()
}

//! ORE mining economics estimator
//!
//! Models the per-minute difficulty distribution a miner hits for a given
//! hashpower, applies the stake multiplier to the reward schedule, and runs
//! a Monte Carlo simulation of one day of mining to project output and profit.

pub mod model;
pub mod simulation;
pub mod sources;
pub mod config;
pub mod report;

/// Protocol and tool constants
pub mod constants {
    /// Easiest difficulty level modelled by default
    pub const DEFAULT_MIN_DIFFICULTY: u32 = 1;

    /// Hardest difficulty level modelled by default
    pub const DEFAULT_MAX_DIFFICULTY: u32 = 50;

    /// One simulated pass per minute over 24 hours
    pub const MINUTES_PER_DAY: u64 = 1440;

    /// Lamports in one SOL
    pub const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

    /// Flat per-transaction mining fee (lamports)
    pub const ORE_MINING_FEE_LAMPORTS: u64 = 5000;

    /// Hypothetical stake increases shown in the multiplier preview (ORE)
    pub const DEFAULT_STAKE_INCREMENTS: [f64; 7] = [1.0, 5.0, 10.0, 15.0, 20.0, 50.0, 100.0];

    /// Wrapped SOL mint
    pub const SOL_ADDRESS: &str = "So11111111111111111111111111111111111111112";

    /// ORE mint
    pub const ORE_ADDRESS: &str = "oreoU2P8bN6jkk3jbaiVxYnG1dCXcYxwhwyK9jSybcp";

    /// BirdEye public API root
    pub const BIRDEYE_API_URL: &str = "https://public-api.birdeye.so";
}

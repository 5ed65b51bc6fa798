//! ORE mining calculator
//!
//! Estimates daily ORE output and profit for a miner from its hashpower,
//! the live reward table, its stake, and current token prices.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use log::{info, warn};
use std::path::PathBuf;

use ore_calc::config::Config;
use ore_calc::model::{preview_multipliers, DecayScenario, Difficulty};
use ore_calc::report;
use ore_calc::simulation::{rng_from_seed, Estimator, MarketPrices, RewardBasis};
use ore_calc::sources::{MiningDataSource, OreCli, PriceClient};

#[derive(Parser)]
#[command(name = "ore-calc")]
#[command(version)]
#[command(about = "ORE mining economics estimator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path (default: ~/.ore-calc/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Benchmark hash rate (H/s)
    #[arg(long, global = true)]
    hashpower: Option<f64>,

    /// Priority fee per transaction (lamports)
    #[arg(long, global = true)]
    priority_fee: Option<u64>,

    /// Electricity or rental cost (USD per hour)
    #[arg(long, global = true)]
    hourly_cost: Option<f64>,

    /// Decay scenario: optimistic, normal or pessimistic
    #[arg(long, global = true)]
    scenario: Option<DecayScenario>,

    /// RNG seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Number of simulated passes
    #[arg(long, global = true)]
    trials: Option<u64>,

    /// ORE price in USD (skips the price API)
    #[arg(long, global = true)]
    ore_price: Option<f64>,

    /// SOL price in USD (skips the price API)
    #[arg(long, global = true)]
    sol_price: Option<f64>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// Simulate one day of mining (default)
    Simulate {
        /// Print the estimate as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the difficulty distribution for the configured hashpower
    Distribution,

    /// Show the current stake multiplier and what more stake would give
    Multiplier,

    /// Breakeven ORE price and priority fee
    Breakeven {
        /// Target difficulty (default: probability-weighted expectation)
        #[arg(short, long)]
        difficulty: Option<Difficulty>,
    },
}

impl Cli {
    /// Fold command-line overrides into the loaded config
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(hashpower) = self.hashpower {
            config.miner.hashpower_per_second = hashpower;
        }
        if let Some(fee) = self.priority_fee {
            config.miner.priority_fee_lamports = fee;
        }
        if let Some(cost) = self.hourly_cost {
            config.miner.hourly_cost_usd = cost;
        }
        if self.scenario.is_some() {
            config.miner.scenario = self.scenario;
        }
        if self.seed.is_some() {
            config.simulation.seed = self.seed;
        }
        if let Some(trials) = self.trials {
            config.simulation.trials = trials;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else if cli.quiet {
        log::LevelFilter::Warn
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    let command = cli.command.clone().unwrap_or(Commands::Simulate { json: false });
    // The stake preview does not depend on hashpower
    if !matches!(command, Commands::Multiplier) {
        config.validate().context("Invalid configuration")?;
    }

    let source = OreCli::new(&config.miner.ore_binary).with_args(config.miner.ore_args.clone());

    match command {
        Commands::Simulate { json } => {
            let prices = market_prices(&cli, &config).await?;
            let estimator = Estimator::new(&config, source);
            let mut rng = rng_from_seed(config.simulation.seed);
            let estimate = estimator.estimate(prices, &mut rng)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&estimate)?);
            } else {
                print!("{}", report::render_estimate(&estimate));
            }
        }

        Commands::Distribution => {
            let rewards = match source.reward_table() {
                Ok(table) if !table.is_empty() => Some(table),
                Ok(_) => {
                    warn!("Reward table is empty, using configured difficulty bounds");
                    None
                }
                Err(e) => {
                    warn!("{}; using configured difficulty bounds", e);
                    None
                }
            };
            let distribution = Estimator::new(&config, &source).distribution(rewards.as_ref())?;
            print!("{}", report::render_distribution(&distribution));
        }

        Commands::Multiplier => {
            let stake = source.stake_state()?;
            let previews = preview_multipliers(
                stake.stake,
                stake.top_stake,
                &config.simulation.stake_increments,
            )?;
            print!("{}", report::render_multiplier_preview(&stake, &previews));
        }

        Commands::Breakeven { difficulty } => {
            let prices = market_prices(&cli, &config).await?;
            let estimator = Estimator::new(&config, source);

            let (basis, label) = match difficulty {
                Some(d) => (RewardBasis::Target(d), format!("difficulty {}", d)),
                None => (RewardBasis::Expected, "expected reward".to_string()),
            };
            let suggestion = estimator.breakeven(prices, basis)?;
            print!("{}", report::render_breakeven(&label, &suggestion));

            if !suggestion.is_profitable() {
                println!("{}", "Mining at these settings loses money.".red().bold());
            }
        }
    }

    Ok(())
}

/// Prices from the command line, or fetched from the price API
async fn market_prices(cli: &Cli, config: &Config) -> Result<MarketPrices> {
    if let (Some(ore), Some(sol)) = (cli.ore_price, cli.sol_price) {
        return Ok(MarketPrices::new(ore, sol)?);
    }

    if config.api.api_key.is_empty() {
        anyhow::bail!(
            "No price API key; set api.api_key, ORE_CALC_API_KEY, or pass --ore-price and --sol-price"
        );
    }

    let client = PriceClient::new(&config.api.base_url, &config.api.api_key, config.api.timeout())
        .context("Failed to build HTTP client")?;
    let prices = client
        .fetch_market_prices(&config.api.ore_address, &config.api.sol_address)
        .await?;

    // A single price given on the command line still wins over the fetched one
    let prices = MarketPrices::new(
        cli.ore_price.unwrap_or(prices.ore_usd),
        cli.sol_price.unwrap_or(prices.sol_usd),
    )?;
    info!("ORE ${:.4}, SOL ${:.4}", prices.ore_usd, prices.sol_usd);
    Ok(prices)
}

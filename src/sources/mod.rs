//! External data sources - Mining client output, fixtures, and token prices
//!
//! Everything the estimator learns from outside the process comes through
//! here. Reward tables and stake snapshots sit behind `MiningDataSource`;
//! token prices come from the HTTP `PriceClient`.

mod source;
mod parser;
mod ore_cli;
mod fixture;
mod price;

pub use source::*;
pub use parser::*;
pub use ore_cli::*;
pub use fixture::*;
pub use price::*;

//! Simulation module - Cost model, Monte Carlo day simulation, and projections

mod cost;
mod simulator;
mod summary;
mod estimate;

pub use cost::*;
pub use simulator::*;
pub use summary::*;
pub use estimate::*;

//! Model module - Difficulty distribution, reward table, and stake multiplier

mod error;
mod difficulty;
mod rewards;
mod multiplier;

pub use error::*;
pub use difficulty::*;
pub use rewards::*;
pub use multiplier::*;

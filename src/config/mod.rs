//! Config module - TOML settings file and CLI overrides

mod settings;

pub use settings::*;

//! Report module - Text rendering of estimates for the terminal

mod render;

pub use render::*;

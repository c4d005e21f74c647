//! CLI library components for the evidence parser.

pub mod clingen;
pub mod config;
pub mod logging;
pub mod pipeline;
pub mod types;

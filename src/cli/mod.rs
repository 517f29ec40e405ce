//! Command implementations for the CLI host

pub mod convert;
pub mod currencies;
pub mod setup;
pub mod ui;

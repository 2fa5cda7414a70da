//! CLI subcommand implementations.

pub mod code;
pub mod country;
pub mod ping;
pub mod search;
pub mod trade;

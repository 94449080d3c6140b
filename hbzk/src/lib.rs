//! Command line tooling around the balancing proof: key generation, proving and verification on
//! files.

pub mod commands;
pub mod config;
pub mod exit;

//! Prover and verifier functionality as well as circuit implementation for the balancing proof of
//! a matched exchange: the initiating and reciprocating ratios cross-multiply equal.

mod circuit;
pub mod generator;
pub mod prover;
pub mod verifier;

pub use circuit::{build_circuit, CircuitHandle};

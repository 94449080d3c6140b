//! Prover and verifier functionality for the balancing proof of matched exchanges.

// Reusable sub-circuits.
mod helper_functions;
mod shape;

// Full-circuit functionality.
pub mod balance;

// Keys and proofs in transit.
pub mod artifact;
pub mod keys;

pub use shape::CircuitShape;

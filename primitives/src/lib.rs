//! Out-circuit primitives of the balancing proof system: exchange quantities, the witness and its
//! public inputs, prime identifiers, errors and serialisation.

pub mod constants;
pub mod definitions;
pub mod error;
pub mod primes;
pub mod serialise;

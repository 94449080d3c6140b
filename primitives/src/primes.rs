//! Prime identifiers for units and assets.
//!
//! Units and assets are identified by distinct primes, so the product `unit * asset` (the
//! dimension of a quantity) determines the pair uniquely.

use rand::Rng;

/// Deterministic primality test by trial division over `6k ± 1`. Identifiers are at most 32 bits,
/// so at most 2^16 candidate divisors are tried.
pub fn is_prime(n: u64) -> bool {
    if n < 4 {
        return n >= 2;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut divisor = 5;
    while divisor <= n / divisor {
        if n % divisor == 0 || n % (divisor + 2) == 0 {
            return false;
        }
        divisor += 6;
    }
    true
}

/// Sample a random prime strictly below `bound`.
pub fn random_prime<R: Rng>(rng: &mut R, bound: u32) -> u32 {
    assert!(bound > 2);
    loop {
        let candidate = rng.gen_range(2..bound);
        if is_prime(candidate as u64) {
            return candidate;
        }
    }
}

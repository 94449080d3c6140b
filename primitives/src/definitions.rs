//! Definitions of the exchange quantities, the witness and the public inputs, and some basic
//! generation functionality.

use std::convert::TryFrom;
use std::fmt::Formatter;

use bls12_381::Scalar;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    ENCODED_QUANTITY_BITS, IDENTIFIER_BITS, KEY_PAIR_ID_SIZE, PERSONALISATION_KEY_PAIR_ID,
    VALUE_BITS,
};
use crate::error::{Error, Result};
use crate::primes::{is_prime, random_prime};

/// Quantity
///
/// An amount of an asset measured in a unit. Unit and asset are distinct primes, so the
/// dimension `unit * asset` names the combination and the encoded quantity
/// `value * unit * asset` carries both the amount and its dimension into the balancing equation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedQuantity")]
pub struct Quantity {
    value: u64,
    unit: u64,
    asset: u64,
}

/// Quantity as it appears in a document, before any check. Numbers are read wide so an oversized
/// value is reported as out of range instead of as a malformed document.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct UncheckedQuantity {
    pub value: u128,
    pub unit: u128,
    pub asset: u128,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct UncheckedRatio {
    pub numerator: UncheckedQuantity,
    pub denominator: UncheckedQuantity,
}

/// Witness document as read from a file. Convert with `Witness::try_from` to check it.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct UncheckedWitness {
    pub initiator: UncheckedRatio,
    pub reciprocator: UncheckedRatio,
}

/// Ratio
///
/// One side of an exchange: what is offered relative to what is asked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratio {
    pub numerator: Quantity,
    pub denominator: Quantity,
}

/// Witness
///
/// The initiating (UTXQ) and reciprocating (MTXQ) ratios of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness {
    pub initiator: Ratio,
    pub reciprocator: Ratio,
}

/// Dimensions of both quantities of a ratio.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatioDimensions {
    pub numerator: u64,
    pub denominator: u64,
}

/// Public inputs
///
/// The dimensions of the four quantities. They bind a proof to the unit and asset combinations
/// being exchanged without revealing any value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicInputs {
    pub initiator: RatioDimensions,
    pub reciprocator: RatioDimensions,
}

/// Key pair identifier
///
/// Digest of an encoded verifying key. Proofs carry the identifier of the key pair they were
/// generated with, so a verifier can tell a stale pairing from an invalid proof.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyPairId(pub [u8; KEY_PAIR_ID_SIZE]);

impl Quantity {
    /// Construct a quantity, checking that `unit` and `asset` are distinct primes of at most
    /// [`IDENTIFIER_BITS`] bits.
    pub fn new(value: u64, unit: u64, asset: u64) -> Result<Self> {
        for &identifier in &[unit, asset] {
            if identifier > u32::MAX as u64 {
                return Err(Error::ValueOutOfRange {
                    what: "identifier",
                    bits: IDENTIFIER_BITS,
                });
            }
            if !is_prime(identifier) {
                return Err(Error::InvalidIdentifier {
                    identifier,
                    reason: "not a prime",
                });
            }
        }
        if unit == asset {
            return Err(Error::InvalidIdentifier {
                identifier: unit,
                reason: "unit and asset must be distinct primes",
            });
        }
        Ok(Self { value, unit, asset })
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn unit(&self) -> u64 {
        self.unit
    }

    pub fn asset(&self) -> u64 {
        self.asset
    }

    /// The product `unit * asset`; both are at most 32 bits so this cannot overflow.
    pub fn dimension(&self) -> u64 {
        self.unit * self.asset
    }

    /// The integer `value * unit * asset`; at most 128 bits so this cannot overflow.
    pub fn encoded(&self) -> u128 {
        self.value as u128 * self.dimension() as u128
    }

    /// Whether the encoded quantity fits in [`ENCODED_QUANTITY_BITS`] bits.
    pub fn is_in_range(&self) -> bool {
        self.encoded() >> ENCODED_QUANTITY_BITS == 0
    }

    pub fn value_scalar(&self) -> Scalar {
        Scalar::from(self.value)
    }

    pub fn unit_scalar(&self) -> Scalar {
        Scalar::from(self.unit)
    }

    pub fn asset_scalar(&self) -> Scalar {
        Scalar::from(self.asset)
    }

    pub fn dimension_scalar(&self) -> Scalar {
        Scalar::from(self.dimension())
    }

    /// The encoded quantity reduced into the scalar field.
    pub fn encoded_scalar(&self) -> Scalar {
        self.value_scalar() * self.dimension_scalar()
    }

    /// Generate a quantity with the given `value` and random distinct primes below `bound`.
    pub fn generate_random_from_value<R: Rng>(value: u64, bound: u32, rng: &mut R) -> Self {
        let unit = random_prime(rng, bound) as u64;
        let asset = loop {
            let asset = random_prime(rng, bound) as u64;
            if asset != unit {
                break asset;
            }
        };
        Self { value, unit, asset }
    }

    /// Generate a quantity with the dimension of `self` and a different `value`.
    pub fn with_value(&self, value: u64) -> Self {
        Self { value, ..*self }
    }
}

impl TryFrom<UncheckedQuantity> for Quantity {
    type Error = Error;

    fn try_from(quantity: UncheckedQuantity) -> Result<Self> {
        let value = u64::try_from(quantity.value).map_err(|_| Error::ValueOutOfRange {
            what: "value",
            bits: VALUE_BITS,
        })?;
        let identifier = |identifier: u128| {
            u64::try_from(identifier).map_err(|_| Error::ValueOutOfRange {
                what: "identifier",
                bits: IDENTIFIER_BITS,
            })
        };
        Quantity::new(value, identifier(quantity.unit)?, identifier(quantity.asset)?)
    }
}

impl TryFrom<UncheckedRatio> for Ratio {
    type Error = Error;

    fn try_from(ratio: UncheckedRatio) -> Result<Self> {
        Ok(Ratio::new(
            Quantity::try_from(ratio.numerator)?,
            Quantity::try_from(ratio.denominator)?,
        ))
    }
}

impl TryFrom<UncheckedWitness> for Witness {
    type Error = Error;

    fn try_from(witness: UncheckedWitness) -> Result<Self> {
        Ok(Witness::new(
            Ratio::try_from(witness.initiator)?,
            Ratio::try_from(witness.reciprocator)?,
        ))
    }
}

impl Ratio {
    pub fn new(numerator: Quantity, denominator: Quantity) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub fn dimensions(&self) -> RatioDimensions {
        RatioDimensions {
            numerator: self.numerator.dimension(),
            denominator: self.denominator.dimension(),
        }
    }
}

impl Witness {
    pub fn new(initiator: Ratio, reciprocator: Ratio) -> Self {
        Self {
            initiator,
            reciprocator,
        }
    }

    /// The quantities in circuit order: initiator numerator, initiator denominator, reciprocator
    /// numerator, reciprocator denominator.
    pub fn quantities(&self) -> [&Quantity; 4] {
        [
            &self.initiator.numerator,
            &self.initiator.denominator,
            &self.reciprocator.numerator,
            &self.reciprocator.denominator,
        ]
    }

    pub fn public_inputs(&self) -> PublicInputs {
        PublicInputs {
            initiator: self.initiator.dimensions(),
            reciprocator: self.reciprocator.dimensions(),
        }
    }

    /// Check the witness out of circuit: every encoded quantity must fit the range check, the
    /// dimensions must balance and the encoded ratios must cross-multiply equal in the field.
    pub fn check(&self) -> Result<()> {
        if !self.quantities().iter().all(|quantity| quantity.is_in_range()) {
            return Err(Error::ValueOutOfRange {
                what: "encoded quantity",
                bits: ENCODED_QUANTITY_BITS,
            });
        }
        if !self.public_inputs().is_balanced() {
            return Err(Error::ConstraintUnsatisfied);
        }
        let lhs = self.initiator.numerator.encoded_scalar()
            * self.reciprocator.denominator.encoded_scalar();
        let rhs = self.reciprocator.numerator.encoded_scalar()
            * self.initiator.denominator.encoded_scalar();
        if lhs != rhs {
            return Err(Error::ConstraintUnsatisfied);
        }
        Ok(())
    }

    /// Generate a random balanced witness: the reciprocating ratio is the initiating ratio with
    /// both values scaled by the same random factor.
    pub fn generate_random_balanced<R: Rng>(rng: &mut R) -> Self {
        let numerator = Quantity::generate_random_from_value(rng.gen::<u32>() as u64, 1 << 16, rng);
        let denominator =
            Quantity::generate_random_from_value(rng.gen::<u32>() as u64, 1 << 16, rng);
        let factor = rng.gen_range(1..1u64 << 16);
        Self::new(
            Ratio::new(numerator, denominator),
            Ratio::new(
                numerator.with_value(numerator.value * factor),
                denominator.with_value(denominator.value * factor),
            ),
        )
    }
}

impl PublicInputs {
    /// Whether the dimensions are nonzero and cross-multiply equal over the integers.
    ///
    /// Under balanced dimensions the balancing equation on encoded quantities holds exactly when
    /// it holds on the values, so verifiers reject public inputs that fail this check.
    pub fn is_balanced(&self) -> bool {
        let dimensions = self.to_array();
        dimensions.iter().all(|&d| d != 0)
            && self.initiator.numerator as u128 * self.reciprocator.denominator as u128
                == self.reciprocator.numerator as u128 * self.initiator.denominator as u128
    }

    /// The public inputs as scalars, in circuit order.
    pub fn to_scalars(&self) -> Vec<Scalar> {
        self.to_array().iter().map(|&d| Scalar::from(d)).collect()
    }

    fn to_array(&self) -> [u64; 4] {
        [
            self.initiator.numerator,
            self.initiator.denominator,
            self.reciprocator.numerator,
            self.reciprocator.denominator,
        ]
    }
}

impl KeyPairId {
    /// Derive the identifier from the bytes of an encoded verifying key.
    pub fn from_verifying_key_bytes(bytes: &[u8]) -> Self {
        KeyPairId(
            *blake2s_simd::Params::new()
                .hash_length(KEY_PAIR_ID_SIZE)
                .personal(PERSONALISATION_KEY_PAIR_ID)
                .hash(bytes)
                .as_array(),
        )
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (unit {}, asset {})",
            self.value, self.unit, self.asset
        )
    }
}

impl std::fmt::Display for Ratio {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.numerator, self.denominator)
    }
}

impl std::fmt::Display for Witness {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "   Initiator:      {}", self.initiator)?;
        writeln!(f, "   Reciprocator:   {}", self.reciprocator)?;
        Ok(())
    }
}

impl std::fmt::Display for KeyPairId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod test {
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use super::*;

    fn quantity(value: u64) -> Quantity {
        Quantity::new(value, 7, 11).unwrap()
    }

    /// 100/50 against 50/25: 100 * 25 == 50 * 50.
    fn scenario() -> Witness {
        Witness::new(
            Ratio::new(quantity(100), quantity(50)),
            Ratio::new(quantity(50), quantity(25)),
        )
    }

    #[test]
    fn test_identifiers() {
        assert!(Quantity::new(1, 7, 11).is_ok());
        assert!(matches!(
            Quantity::new(1, 8, 11),
            Err(Error::InvalidIdentifier { identifier: 8, .. })
        ));
        assert!(matches!(
            Quantity::new(1, 7, 1),
            Err(Error::InvalidIdentifier { identifier: 1, .. })
        ));
        assert!(matches!(
            Quantity::new(1, 7, 7),
            Err(Error::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            Quantity::new(1, 7, 4_294_967_311),
            Err(Error::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn test_encoding() {
        let q = quantity(100);
        assert_eq!(q.dimension(), 77);
        assert_eq!(q.encoded(), 7700);
        assert_eq!(q.encoded_scalar(), Scalar::from(7700u64));

        let largest = Quantity::new(u64::MAX, 4_294_967_291, 4_294_967_279).unwrap();
        assert!(!largest.is_in_range());
        assert!(Quantity::new(u64::MAX, 2, 3).unwrap().is_in_range());
    }

    #[test]
    fn test_check_scenario() {
        let witness = scenario();
        assert!(witness.check().is_ok());

        let mut off_by_one = witness;
        off_by_one.initiator.numerator = quantity(101);
        assert!(matches!(
            off_by_one.check(),
            Err(Error::ConstraintUnsatisfied)
        ));

        let mut off_by_one = witness;
        off_by_one.reciprocator.denominator = quantity(26);
        assert!(matches!(
            off_by_one.check(),
            Err(Error::ConstraintUnsatisfied)
        ));
    }

    #[test]
    fn test_check_mixed_dimensions() {
        let oil = |value| Quantity::new(value, 13, 17).unwrap();

        let witness = Witness::new(
            Ratio::new(quantity(100), oil(50)),
            Ratio::new(quantity(50), oil(25)),
        );
        assert!(witness.public_inputs().is_balanced());
        assert!(witness.check().is_ok());

        // Values balance but the dimensions cross.
        let crossed = Witness::new(
            Ratio::new(quantity(100), oil(50)),
            Ratio::new(oil(50), quantity(25)),
        );
        assert!(matches!(
            crossed.check(),
            Err(Error::ConstraintUnsatisfied)
        ));

        // Encoded quantities balance but the values do not: 221 * 1 != 1 * 77.
        let forged = Witness::new(
            Ratio::new(quantity(221), oil(77)),
            Ratio::new(quantity(1), quantity(1)),
        );
        assert_eq!(
            forged.initiator.numerator.encoded() * forged.reciprocator.denominator.encoded(),
            forged.reciprocator.numerator.encoded() * forged.initiator.denominator.encoded()
        );
        assert!(matches!(
            forged.check(),
            Err(Error::ConstraintUnsatisfied)
        ));
    }

    #[test]
    fn test_dimension_balance() {
        let dimensions = |a, b, c, d| PublicInputs {
            initiator: RatioDimensions {
                numerator: a,
                denominator: b,
            },
            reciprocator: RatioDimensions {
                numerator: c,
                denominator: d,
            },
        };
        assert!(dimensions(77, 77, 77, 77).is_balanced());
        assert!(dimensions(77, 221, 77, 221).is_balanced());
        assert!(dimensions(6, 10, 21, 35).is_balanced());
        assert!(!dimensions(77, 221, 221, 77).is_balanced());
        assert!(!dimensions(0, 0, 0, 0).is_balanced());
        assert!(dimensions(u64::MAX, u64::MAX, u64::MAX, u64::MAX).is_balanced());
    }

    #[test]
    fn test_check_zero() {
        // 0 * 25 == 0 * 50
        let witness = Witness::new(
            Ratio::new(quantity(0), quantity(50)),
            Ratio::new(quantity(0), quantity(25)),
        );
        assert!(witness.check().is_ok());
    }

    #[test]
    fn test_check_out_of_range() {
        let big = Quantity::new(u64::MAX, 4_294_967_291, 4_294_967_279).unwrap();
        let witness = Witness::new(Ratio::new(big, big), Ratio::new(big, big));
        assert!(matches!(
            witness.check(),
            Err(Error::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn test_random_balanced() {
        let mut rng = XorShiftRng::from_seed([
            0x59, 0x62, 0xbe, 0x5d, 0x76, 0x3d, 0x31, 0x8d, 0x17, 0xdb, 0x37, 0x32, 0x54, 0x06,
            0xbc, 0xe5,
        ]);
        for _ in 0..50 {
            let witness = Witness::generate_random_balanced(&mut rng);
            assert!(witness.check().is_ok());
            assert_eq!(
                witness.public_inputs().initiator,
                witness.public_inputs().reciprocator
            );
        }
    }

    #[test]
    fn test_json() {
        let json = r#"{
            "initiator": {
                "numerator": {"value": 100, "unit": 7, "asset": 11},
                "denominator": {"value": 50, "unit": 7, "asset": 11}
            },
            "reciprocator": {
                "numerator": {"value": 50, "unit": 7, "asset": 11, "unmatched": true},
                "denominator": {"value": 25, "unit": 7, "asset": 11}
            }
        }"#;
        let witness: Witness = serde_json::from_str(json).unwrap();
        assert_eq!(witness, scenario());

        let bad = json.replacen("\"unit\": 7", "\"unit\": 9", 1);
        assert!(serde_json::from_str::<Witness>(&bad).is_err());
    }

    #[test]
    fn test_unchecked_witness() {
        let json = r#"{
            "initiator": {
                "numerator": {"value": 100, "unit": 7, "asset": 11},
                "denominator": {"value": 50, "unit": 7, "asset": 11}
            },
            "reciprocator": {
                "numerator": {"value": 50, "unit": 7, "asset": 11},
                "denominator": {"value": 25, "unit": 7, "asset": 11}
            }
        }"#;
        let read = |json: &str| {
            Witness::try_from(serde_json::from_str::<UncheckedWitness>(json).unwrap())
        };
        assert_eq!(read(json).unwrap(), scenario());

        let bad = json.replacen("\"unit\": 7", "\"unit\": 9", 1);
        assert!(matches!(
            read(&bad),
            Err(Error::InvalidIdentifier { identifier: 9, .. })
        ));
        let bad = json.replacen("\"unit\": 7", "\"unit\": 4294967311", 1);
        assert!(matches!(
            read(&bad),
            Err(Error::ValueOutOfRange {
                what: "identifier",
                ..
            })
        ));
        let bad = json.replacen("\"unit\": 7", "\"unit\": 18446744073709551616", 1);
        assert!(matches!(
            read(&bad),
            Err(Error::ValueOutOfRange {
                what: "identifier",
                ..
            })
        ));
        let bad = json.replacen("100", "18446744073709551616", 1);
        assert!(matches!(
            read(&bad),
            Err(Error::ValueOutOfRange { what: "value", .. })
        ));
    }

    #[test]
    fn test_public_inputs() {
        let public_inputs = scenario().public_inputs();
        assert!(public_inputs.is_balanced());
        assert_eq!(public_inputs.to_scalars(), vec![Scalar::from(77u64); 4]);

        let json = serde_json::to_string(&public_inputs).unwrap();
        assert_eq!(
            serde_json::from_str::<PublicInputs>(&json).unwrap(),
            public_inputs
        );
    }

    #[test]
    fn test_key_pair_id() {
        let a = KeyPairId::from_verifying_key_bytes(b"verifying key a");
        let b = KeyPairId::from_verifying_key_bytes(b"verifying key b");
        assert_ne!(a, b);
        assert_eq!(a, KeyPairId::from_verifying_key_bytes(b"verifying key a"));
        assert_eq!(a.to_string().len(), 2 + 2 * KEY_PAIR_ID_SIZE);
    }
}

//! Helper gadgets that do not fit in a specific circuit.

use bellman::gadgets::boolean::AllocatedBit;
use bellman::gadgets::num::AllocatedNum;
use bellman::{ConstraintSystem, LinearCombination, SynthesisError};
use ff::PrimeField;

/// Witness a field element to the circuit.
pub fn witness_num<Scalar: PrimeField, CS: ConstraintSystem<Scalar>>(
    cs: CS,
    value: Option<Scalar>,
) -> Result<AllocatedNum<Scalar>, SynthesisError> {
    AllocatedNum::alloc(cs, || value.ok_or(SynthesisError::AssignmentMissing))
}

/// The `num_bits` least significant bits of `value`, least significant first.
/// Note: assumes a little-endian `Repr`, as used by `bls12_381::Scalar`.
fn le_bits<Scalar: PrimeField>(value: &Scalar, num_bits: usize) -> Vec<bool> {
    value
        .to_repr()
        .as_ref()
        .iter()
        .flat_map(|&byte| (0..8).map(move |i| byte >> i & 1 == 1))
        .take(num_bits)
        .collect()
}

/// Enforce the constraints that ensure that `num` fits in `num_bits` bits: witness its
/// little-endian binary decomposition, boolean constrain every bit and enforce that the bits pack
/// back into `num`.
pub fn range_check<Scalar: PrimeField, CS: ConstraintSystem<Scalar>>(
    mut cs: CS,
    num: &AllocatedNum<Scalar>,
    num_bits: usize,
) -> Result<(), SynthesisError> {
    assert!(num_bits <= Scalar::CAPACITY as usize);
    let bit_values: Vec<Option<bool>> = match num.get_value() {
        Some(value) => le_bits(&value, num_bits).into_iter().map(Some).collect(),
        None => vec![None; num_bits],
    };

    // Double-and-add over the bits, least significant first.
    let mut packed = LinearCombination::zero();
    let mut coefficient = Scalar::one();
    for (i, value) in bit_values.into_iter().enumerate() {
        let bit = AllocatedBit::alloc(cs.namespace(|| format!("bit {}", i)), value)?;
        packed = packed + (coefficient, bit.get_variable());
        coefficient = coefficient.double();
    }

    cs.enforce(
        || "packing",
        |_| packed,
        |lc| lc + CS::one(),
        |lc| lc + num.get_variable(),
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use bellman::gadgets::test::TestConstraintSystem;
    use bellman::ConstraintSystem;
    use bls12_381::Scalar;

    use super::{range_check, witness_num};

    fn check(value: Scalar, num_bits: usize) -> bool {
        let mut cs = TestConstraintSystem::<Scalar>::new();
        let num = witness_num(cs.namespace(|| "num"), Some(value)).unwrap();
        range_check(cs.namespace(|| "range"), &num, num_bits).unwrap();
        assert_eq!(cs.num_constraints(), num_bits + 1);
        cs.is_satisfied()
    }

    #[test]
    fn test_range_check() {
        assert!(check(Scalar::from(0u64), 8));
        assert!(check(Scalar::from(255u64), 8));
        assert!(!check(Scalar::from(256u64), 8));
        assert!(check(Scalar::from(u64::MAX), 64));
        assert!(!check(-Scalar::one(), 127));
    }

    #[test]
    fn test_missing_assignment() {
        let mut cs = TestConstraintSystem::<Scalar>::new();
        assert!(witness_num(cs.namespace(|| "num"), None).is_err());
    }
}

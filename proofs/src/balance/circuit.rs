//! Balance circuit implementation.

use bellman::gadgets::num::AllocatedNum;
use bellman::{Circuit, ConstraintSystem, SynthesisError};
use bls12_381::Scalar;

use primitives::constants::{ENCODED_QUANTITY_BITS, PUBLIC_INPUT_COUNT, VALUE_BITS};
use primitives::definitions::{Quantity, Witness};
use primitives::error::Result;

use crate::helper_functions::{range_check, witness_num};
use crate::shape::{CircuitShape, ShapeSystem};

/// Auxiliary variables for the Balance circuit.
pub struct Balance<'a> {
    pub witness: Option<&'a Witness>,
}

/// Reusable handle to the fixed topology of the Balance circuit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CircuitHandle {
    shape: CircuitShape,
}

/// Declare the Balance circuit: synthesize it without an assignment and record its shape.
pub fn build_circuit() -> Result<CircuitHandle> {
    let mut cs = ShapeSystem::new();
    Balance { witness: None }.synthesize(&mut cs)?;
    let shape = cs.shape();
    debug_assert_eq!(shape.num_inputs, PUBLIC_INPUT_COUNT + 1);
    tracing::debug!(
        constraints = shape.num_constraints,
        inputs = shape.num_inputs,
        aux = shape.num_aux,
        "balance circuit built"
    );
    Ok(CircuitHandle { shape })
}

impl CircuitHandle {
    pub fn shape(&self) -> CircuitShape {
        self.shape
    }

    /// Number of public inputs, excluding the constant one.
    pub fn num_public_inputs(&self) -> usize {
        self.shape.num_inputs - 1
    }

    /// The circuit without an assignment, as used during parameter generation.
    pub(crate) fn blank(&self) -> Balance<'static> {
        Balance { witness: None }
    }

    /// The circuit assigned with `witness`.
    pub(crate) fn assign<'a>(&self, witness: &'a Witness) -> Balance<'a> {
        Balance {
            witness: Some(witness),
        }
    }
}

/// A quantity inside the circuit.
struct AllocatedQuantity {
    /// unit * asset
    dimension: AllocatedNum<Scalar>,
    /// value * unit * asset
    encoded: AllocatedNum<Scalar>,
}

/// Witness a quantity, compute its dimension and encoded form, and range check the value and the
/// encoded form.
fn witness_quantity<CS: ConstraintSystem<Scalar>>(
    mut cs: CS,
    quantity: Option<&Quantity>,
) -> std::result::Result<AllocatedQuantity, SynthesisError> {
    let value = witness_num(
        cs.namespace(|| "value"),
        quantity.map(Quantity::value_scalar),
    )?;
    let unit = witness_num(cs.namespace(|| "unit"), quantity.map(Quantity::unit_scalar))?;
    let asset = witness_num(
        cs.namespace(|| "asset"),
        quantity.map(Quantity::asset_scalar),
    )?;

    let dimension = unit.mul(cs.namespace(|| "dimension"), &asset)?;
    let encoded = value.mul(cs.namespace(|| "encoded quantity"), &dimension)?;

    range_check(cs.namespace(|| "value range"), &value, VALUE_BITS)?;
    range_check(
        cs.namespace(|| "encoded quantity range"),
        &encoded,
        ENCODED_QUANTITY_BITS,
    )?;

    Ok(AllocatedQuantity { dimension, encoded })
}

impl<'a> Circuit<Scalar> for Balance<'a> {
    fn synthesize<CS: ConstraintSystem<Scalar>>(
        self,
        cs: &mut CS,
    ) -> std::result::Result<(), SynthesisError> {
        // Witness all four quantities.
        let initiator_numerator = witness_quantity(
            cs.namespace(|| "initiator numerator"),
            self.witness.map(|witness| &witness.initiator.numerator),
        )?;
        let initiator_denominator = witness_quantity(
            cs.namespace(|| "initiator denominator"),
            self.witness.map(|witness| &witness.initiator.denominator),
        )?;
        let reciprocator_numerator = witness_quantity(
            cs.namespace(|| "reciprocator numerator"),
            self.witness.map(|witness| &witness.reciprocator.numerator),
        )?;
        let reciprocator_denominator = witness_quantity(
            cs.namespace(|| "reciprocator denominator"),
            self.witness.map(|witness| &witness.reciprocator.denominator),
        )?;

        // Balancing equation on encoded quantities. It is the equation on values only for public
        // inputs whose dimensions balance, which verifiers check outside the circuit.
        let cross = reciprocator_numerator
            .encoded
            .mul(cs.namespace(|| "cross product"), &initiator_denominator.encoded)?;
        cs.enforce(
            || "balancing equation",
            |lc| lc + initiator_numerator.encoded.get_variable(),
            |lc| lc + reciprocator_denominator.encoded.get_variable(),
            |lc| lc + cross.get_variable(),
        );

        // Expose public inputs.
        initiator_numerator
            .dimension
            .inputize(cs.namespace(|| "initiator numerator dimension"))?;
        initiator_denominator
            .dimension
            .inputize(cs.namespace(|| "initiator denominator dimension"))?;
        reciprocator_numerator
            .dimension
            .inputize(cs.namespace(|| "reciprocator numerator dimension"))?;
        reciprocator_denominator
            .dimension
            .inputize(cs.namespace(|| "reciprocator denominator dimension"))
    }
}

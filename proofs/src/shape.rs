//! A constraint system that records the shape of a circuit without evaluating any assignment.

use bellman::{ConstraintSystem, Index, LinearCombination, SynthesisError, Variable};
use ff::PrimeField;

/// Number of variables and constraints of a synthesized circuit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CircuitShape {
    /// Public inputs, including the constant one.
    pub num_inputs: usize,
    /// Private (auxiliary) variables.
    pub num_aux: usize,
    pub num_constraints: usize,
}

pub struct ShapeSystem {
    shape: CircuitShape,
}

impl ShapeSystem {
    pub fn new() -> Self {
        ShapeSystem {
            shape: CircuitShape {
                num_inputs: 1,
                num_aux: 0,
                num_constraints: 0,
            },
        }
    }

    pub fn shape(&self) -> CircuitShape {
        self.shape
    }
}

impl Default for ShapeSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl<Scalar: PrimeField> ConstraintSystem<Scalar> for ShapeSystem {
    type Root = Self;

    fn alloc<F, A, AR>(&mut self, _annotation: A, _f: F) -> Result<Variable, SynthesisError>
    where
        F: FnOnce() -> Result<Scalar, SynthesisError>,
        A: FnOnce() -> AR,
        AR: Into<String>,
    {
        let index = self.shape.num_aux;
        self.shape.num_aux += 1;
        Ok(Variable::new_unchecked(Index::Aux(index)))
    }

    fn alloc_input<F, A, AR>(&mut self, _annotation: A, _f: F) -> Result<Variable, SynthesisError>
    where
        F: FnOnce() -> Result<Scalar, SynthesisError>,
        A: FnOnce() -> AR,
        AR: Into<String>,
    {
        let index = self.shape.num_inputs;
        self.shape.num_inputs += 1;
        Ok(Variable::new_unchecked(Index::Input(index)))
    }

    fn enforce<A, AR, LA, LB, LC>(&mut self, _annotation: A, _a: LA, _b: LB, _c: LC)
    where
        A: FnOnce() -> AR,
        AR: Into<String>,
        LA: FnOnce(LinearCombination<Scalar>) -> LinearCombination<Scalar>,
        LB: FnOnce(LinearCombination<Scalar>) -> LinearCombination<Scalar>,
        LC: FnOnce(LinearCombination<Scalar>) -> LinearCombination<Scalar>,
    {
        self.shape.num_constraints += 1;
    }

    fn push_namespace<NR, N>(&mut self, _name_fn: N)
    where
        NR: Into<String>,
        N: FnOnce() -> NR,
    {
    }

    fn pop_namespace(&mut self) {}

    fn get_root(&mut self) -> &mut Self::Root {
        self
    }
}

use crate::{
    errors::Result,
    solver::Solver,
    variable::{CsIndex, VarIndex, VariableTable},
    witness::{expand_with, Assignment, Witness},
};
use ark_std::{end_timer, start_timer};
use zksok_algebra::prelude::*;

/// The number of wires of a sparse gate.
pub const N_WIRES_PER_GATE: usize = 3;

/// The number of selectors of a sparse gate.
pub const N_SELECTORS: usize = 5;

/// Selector positions of a sparse gate.
pub const Q_L: usize = 0;
#[allow(missing_docs)]
pub const Q_R: usize = 1;
#[allow(missing_docs)]
pub const Q_M: usize = 2;
#[allow(missing_docs)]
pub const Q_O: usize = 3;
#[allow(missing_docs)]
pub const Q_C: usize = 4;

/// Which constraint form a circuit compiles to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintForm {
    /// Rank-1 constraints, proven with Groth16.
    R1cs,
    /// Sparse three-wire gates, proven with PLONK.
    Sparse,
}

/// A sparse linear combination `Σ coeff·z[index]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: Scalar")]
pub struct LinearCombination<F>(pub Vec<(VarIndex, F)>);

impl<F: Scalar> LinearCombination<F> {
    /// The empty combination, evaluating to zero.
    pub fn zero() -> Self {
        LinearCombination(vec![])
    }

    /// A single term.
    pub fn term(index: VarIndex, coeff: F) -> Self {
        LinearCombination(vec![(index, coeff)])
    }

    /// Append a term.
    pub fn push(&mut self, index: VarIndex, coeff: F) {
        self.0.push((index, coeff));
    }

    /// Evaluate against a witness.
    pub fn eval(&self, witness: &[F]) -> F {
        self.0
            .iter()
            .map(|(i, c)| c.mul(&witness[*i]))
            .fold(F::zero(), |acc, v| acc + v)
    }

    /// Iterate over the terms.
    pub fn terms(&self) -> impl Iterator<Item = &(VarIndex, F)> {
        self.0.iter()
    }
}

/// `(A·z)·(B·z) = C·z`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: Scalar")]
pub struct R1csConstraint<F> {
    /// left factor
    pub a: LinearCombination<F>,
    /// right factor
    pub b: LinearCombination<F>,
    /// product
    pub c: LinearCombination<F>,
}

impl<F: Scalar> R1csConstraint<F> {
    /// Check the relation against a witness.
    pub fn is_satisfied(&self, witness: &[F]) -> bool {
        self.a.eval(witness).mul(&self.b.eval(witness)) == self.c.eval(witness)
    }
}

/// A rank-1 constraint system. Variable 0 is the constant one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: Scalar")]
pub struct R1csSystem<F> {
    /// the variable table
    pub variables: VariableTable,
    /// the constraints, in emission order
    pub constraints: Vec<R1csConstraint<F>>,
    /// the witness program
    pub solver: Solver<F>,
}

impl<F: Scalar> R1csSystem<F> {
    pub(crate) fn new() -> Self {
        R1csSystem {
            variables: VariableTable::new(),
            constraints: vec![],
            solver: Solver::new(),
        }
    }

    /// The number of constraints.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// The number of variables, the constant one included.
    pub fn num_vars(&self) -> usize {
        self.variables.len()
    }

    /// Return the first constraint the witness violates.
    pub fn first_unsatisfied(&self, witness: &[F]) -> Option<CsIndex> {
        if witness.len() != self.num_vars() {
            return Some(0);
        }
        self.constraints
            .iter()
            .position(|c| !c.is_satisfied(witness))
    }

    /// The instance variables: the constant one followed by the public inputs.
    pub fn instance_indices(&self) -> Vec<VarIndex> {
        let mut res = vec![0];
        res.extend_from_slice(self.variables.public_indices());
        res
    }
}

/// A sparse gate system, evaluating
/// ```text
///     qL·a + qR·b + qM·a·b + qC + PI - qO·c = 0
/// ```
/// on every row, where `PI` is the value of the public variable owning the row
/// (zero on other rows).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: Scalar")]
pub struct SparseSystem<F> {
    /// the variable table
    pub variables: VariableTable,
    /// the selectors of the circuit, indexed by [`Q_L`] .. [`Q_C`]
    pub selectors: Vec<Vec<F>>,
    /// the wiring of the circuit: left, right, output
    pub wiring: [Vec<VarIndex>; N_WIRES_PER_GATE],
    /// the rows carrying a public input
    pub public_vars_constraint_indices: Vec<CsIndex>,
    /// the public variables, in the same order as their rows
    pub public_vars_witness_indices: Vec<VarIndex>,
    /// the witness program
    pub solver: Solver<F>,
}

impl<F: Scalar> SparseSystem<F> {
    pub(crate) fn new() -> Self {
        SparseSystem {
            variables: VariableTable::new(),
            selectors: vec![vec![]; N_SELECTORS],
            wiring: [vec![], vec![], vec![]],
            public_vars_constraint_indices: vec![],
            public_vars_witness_indices: vec![],
            solver: Solver::new(),
        }
    }

    pub(crate) fn push_gate(&mut self, wires: [VarIndex; N_WIRES_PER_GATE], sels: [F; N_SELECTORS]) {
        for (wiring, w) in self.wiring.iter_mut().zip(wires.iter()) {
            wiring.push(*w);
        }
        for (selector, q) in self.selectors.iter_mut().zip(sels.iter()) {
            selector.push(*q);
        }
    }

    /// The number of gates.
    pub fn size(&self) -> usize {
        self.wiring[0].len()
    }

    /// The number of variables, the constant one included.
    pub fn num_vars(&self) -> usize {
        self.variables.len()
    }

    /// The selector column `index`.
    pub fn selector(&self, index: usize) -> &[F] {
        &self.selectors[index]
    }

    /// The gate equation on explicit wire and selector values.
    pub fn eval_gate_func(wire_vals: &[F; N_WIRES_PER_GATE], sel_vals: &[F; N_SELECTORS], pub_input: &F) -> F {
        let [a, b, c] = wire_vals;
        sel_vals[Q_L].mul(a)
            + sel_vals[Q_R].mul(b)
            + sel_vals[Q_M].mul(a).mul(b)
            + sel_vals[Q_C]
            + *pub_input
            - &sel_vals[Q_O].mul(c)
    }

    /// The public input value of every row, zero outside public rows.
    pub fn public_input_column(&self, witness: &[F]) -> Vec<F> {
        let mut pi = vec![F::zero(); self.size()];
        for (row, var) in self
            .public_vars_constraint_indices
            .iter()
            .zip(self.public_vars_witness_indices.iter())
        {
            pi[*row] = witness[*var];
        }
        pi
    }

    /// Return the first gate the witness violates.
    pub fn first_unsatisfied(&self, witness: &[F]) -> Option<CsIndex> {
        if witness.len() != self.num_vars() {
            return Some(0);
        }
        let pi = self.public_input_column(witness);
        (0..self.size()).find(|&i| {
            let wires = [
                witness[self.wiring[0][i]],
                witness[self.wiring[1][i]],
                witness[self.wiring[2][i]],
            ];
            let sels = [
                self.selectors[Q_L][i],
                self.selectors[Q_R][i],
                self.selectors[Q_M][i],
                self.selectors[Q_O][i],
                self.selectors[Q_C][i],
            ];
            !Self::eval_gate_func(&wires, &sels, &pi[i]).is_zero()
        })
    }
}

/// A compiled circuit, in one of the two supported forms.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: Scalar")]
pub enum ConstraintSystem<F> {
    /// rank-1 form
    R1cs(R1csSystem<F>),
    /// sparse gate form
    Sparse(SparseSystem<F>),
}

impl<F: Scalar> ConstraintSystem<F> {
    /// The form of this system.
    pub fn form(&self) -> ConstraintForm {
        match self {
            ConstraintSystem::R1cs(_) => ConstraintForm::R1cs,
            ConstraintSystem::Sparse(_) => ConstraintForm::Sparse,
        }
    }

    /// The variable table.
    pub fn variables(&self) -> &VariableTable {
        match self {
            ConstraintSystem::R1cs(cs) => &cs.variables,
            ConstraintSystem::Sparse(cs) => &cs.variables,
        }
    }

    /// The witness program.
    pub fn solver(&self) -> &Solver<F> {
        match self {
            ConstraintSystem::R1cs(cs) => &cs.solver,
            ConstraintSystem::Sparse(cs) => &cs.solver,
        }
    }

    /// The number of constraints (rows for the rank-1 form, gates for the sparse form).
    pub fn num_constraints(&self) -> usize {
        match self {
            ConstraintSystem::R1cs(cs) => cs.num_constraints(),
            ConstraintSystem::Sparse(cs) => cs.size(),
        }
    }

    /// The number of variables, the constant one included.
    pub fn num_variables(&self) -> usize {
        self.variables().len()
    }

    /// The public variables in declaration order.
    pub fn public_variables(&self) -> &[VarIndex] {
        self.variables().public_indices()
    }

    /// The smallest power of two bounding both the constraint and the variable count.
    pub fn bounding_size(&self) -> usize {
        self.num_constraints()
            .max(self.num_variables())
            .next_power_of_two()
    }

    /// Return the first constraint the witness violates.
    pub fn first_unsatisfied(&self, witness: &[F]) -> Option<CsIndex> {
        match self {
            ConstraintSystem::R1cs(cs) => cs.first_unsatisfied(witness),
            ConstraintSystem::Sparse(cs) => cs.first_unsatisfied(witness),
        }
    }

    /// Whether the witness satisfies every constraint.
    pub fn is_satisfied_by(&self, witness: &[F]) -> bool {
        self.first_unsatisfied(witness).is_none()
    }

    /// Expand an assignment of the inputs into a full witness.
    pub fn expand(&self, assignment: &Assignment<F>) -> Result<Witness<F>> {
        let time = start_timer!(|| "expand witness");
        let res = expand_with(self.variables(), self.solver(), assignment, |w| {
            self.first_unsatisfied(w)
        });
        end_timer!(time);
        res
    }

    /// The rank-1 system, if this is one.
    pub fn as_r1cs(&self) -> Option<&R1csSystem<F>> {
        match self {
            ConstraintSystem::R1cs(cs) => Some(cs),
            ConstraintSystem::Sparse(_) => None,
        }
    }

    /// The sparse system, if this is one.
    pub fn as_sparse(&self) -> Option<&SparseSystem<F>> {
        match self {
            ConstraintSystem::R1cs(_) => None,
            ConstraintSystem::Sparse(cs) => Some(cs),
        }
    }
}

use crate::errors::{PlonkError, Result};
use zksok_algebra::prelude::*;
use zksok_frontend::constraint::{SparseSystem, N_SELECTORS, N_WIRES_PER_GATE, Q_C, Q_L, Q_M, Q_O, Q_R};

pub use zksok_frontend::variable::{CsIndex, VarIndex};

/// The smallest evaluation domain the prover works over.
pub const MIN_DOMAIN_SIZE: usize = 8;

/// The quotient polynomial is evaluated over a coset this many times larger than the domain.
pub const QUOTIENT_FACTOR: usize = 4;

/// Trait for PLONK constraint systems.
pub trait ConstraintSystem: Sized {
    /// The field of the wire values.
    type Field: Scalar;

    /// Return the number of constraints in the system.
    /// `size` should divide q-1 where q is the size of the prime field.
    /// This enables finding a multiplicative subgroup with order `size`.
    fn size(&self) -> usize;

    /// Return number of variables in the constrain system
    fn num_vars(&self) -> usize;

    /// Return the wiring of the constrain system
    fn wiring(&self) -> &[Vec<VarIndex>];

    /// Return the size of the evaluation domain for computing the quotient polynomial.
    /// `quot_eval_dom_size` is larger than the degree of the quotient polynomial
    /// and is a multiple of `size`.
    fn quot_eval_dom_size(&self) -> usize;

    /// Return the number of wires in a single gate.
    fn n_wires_per_gate() -> usize;

    /// Return the number of selectors.
    fn num_selectors(&self) -> usize;

    /// Compute the permutation implied by the copy constraints.
    ///
    /// Every wire position points to the next position holding the same variable, and the
    /// last one points back to the first, so each variable forms one cycle.
    fn compute_permutation(&self) -> Vec<usize> {
        let n = self.size();
        let n_wires_per_gate = Self::n_wires_per_gate();
        let mut perm = vec![0usize; n_wires_per_gate * n];
        let mut first: Vec<Option<usize>> = vec![None; self.num_vars()];
        let mut last: Vec<usize> = vec![0; self.num_vars()];

        for (pos, var) in self.wiring().iter().flatten().enumerate() {
            match first[*var] {
                None => first[*var] = Some(pos),
                Some(_) => perm[last[*var]] = pos,
            }
            last[*var] = pos;
        }
        for (var, head) in first.iter().enumerate() {
            if let Some(head) = head {
                perm[last[var]] = *head;
            }
        }
        perm
    }

    /// Compute the indices of the constraints related to public inputs.
    fn public_vars_constraint_indices(&self) -> &[CsIndex];

    /// Compute the indices of the witnesses related to public inputs.
    fn public_vars_witness_indices(&self) -> &[VarIndex];

    /// Map the witnesses into the wires of the circuit.
    /// The (i * size + j)-th output element is the value of the i-th wire on the j-th gate.
    fn extend_witness(&self, witness: &[Self::Field]) -> Vec<Self::Field> {
        let mut extended = Vec::with_capacity(Self::n_wires_per_gate() * self.size());
        for wire_slice in self.wiring().iter() {
            for index in wire_slice.iter() {
                extended.push(witness[*index]);
            }
        }
        extended
    }

    /// Borrow the (index)-th selector vector.
    fn selector(&self, index: usize) -> Result<&[Self::Field]>;

    /// Evaluate the constraint equation given public input and the values of the wires and the selectors.
    fn eval_gate_func(
        wire_vals: &[&Self::Field],
        sel_vals: &[&Self::Field],
        pub_input: &Self::Field,
    ) -> Result<Self::Field>;

    /// Given the wires values of a gate, evaluate the coefficients of the selectors in the
    /// constraint equation.
    fn eval_selector_multipliers(wire_vals: &[&Self::Field]) -> Result<Vec<Self::Field>>;

    /// Return the first gate the witness violates.
    fn first_unsatisfied(&self, witness: &[Self::Field]) -> Option<CsIndex>;
}

/// A sparse system padded to a power-of-two number of gates.
///
/// Padding gates wire the constant one variable everywhere and have all selectors zero,
/// so they hold for any witness.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlonkCircuit<F> {
    selectors: Vec<Vec<F>>,
    wiring: Vec<Vec<VarIndex>>,
    num_vars: usize,
    public_vars_constraint_indices: Vec<CsIndex>,
    public_vars_witness_indices: Vec<VarIndex>,
}

/// The number of gates a sparse system of `num_gates` gates is padded to.
pub fn padded_size(num_gates: usize) -> usize {
    min_greater_equal_power_of_two(num_gates).max(MIN_DOMAIN_SIZE)
}

impl<F: Scalar> PlonkCircuit<F> {
    /// Pad `system` for the prover.
    pub fn new(system: &SparseSystem<F>) -> Result<Self> {
        let num_gates = system.size();
        if num_gates == 0 {
            return Err(PlonkError::MalformedCircuit("the circuit has no gates".into()));
        }
        if system.selectors.len() != N_SELECTORS
            || system.selectors.iter().any(|q| q.len() != num_gates)
            || system.wiring.iter().any(|w| w.len() != num_gates)
        {
            return Err(PlonkError::MalformedCircuit(
                "selector and wiring columns differ in length".into(),
            ));
        }
        let num_vars = system.num_vars();
        if system.wiring.iter().flatten().any(|v| *v >= num_vars) {
            return Err(PlonkError::MalformedCircuit(
                "a gate wires an unknown variable".into(),
            ));
        }
        if system.public_vars_constraint_indices.len() != system.public_vars_witness_indices.len()
            || system.public_vars_constraint_indices.iter().any(|i| *i >= num_gates)
        {
            return Err(PlonkError::MalformedCircuit(
                "public input rows do not match the public variables".into(),
            ));
        }

        let n = padded_size(num_gates);
        let selectors = system
            .selectors
            .iter()
            .map(|q| {
                let mut q = q.clone();
                q.resize(n, F::zero());
                q
            })
            .collect();
        let wiring = system
            .wiring
            .iter()
            .map(|w| {
                let mut w = w.clone();
                w.resize(n, 0);
                w
            })
            .collect();

        Ok(PlonkCircuit {
            selectors,
            wiring,
            num_vars,
            public_vars_constraint_indices: system.public_vars_constraint_indices.clone(),
            public_vars_witness_indices: system.public_vars_witness_indices.clone(),
        })
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
}

impl<F: Scalar> ConstraintSystem for PlonkCircuit<F> {
    type Field = F;

    fn size(&self) -> usize {
        self.wiring[0].len()
    }

    fn num_vars(&self) -> usize {
        self.num_vars
    }

    fn wiring(&self) -> &[Vec<VarIndex>] {
        &self.wiring
    }

    fn quot_eval_dom_size(&self) -> usize {
        self.size() * QUOTIENT_FACTOR
    }

    fn n_wires_per_gate() -> usize {
        N_WIRES_PER_GATE
    }

    fn num_selectors(&self) -> usize {
        N_SELECTORS
    }

    fn public_vars_constraint_indices(&self) -> &[CsIndex] {
        &self.public_vars_constraint_indices
    }

    fn public_vars_witness_indices(&self) -> &[VarIndex] {
        &self.public_vars_witness_indices
    }

    fn selector(&self, index: usize) -> Result<&[F]> {
        self.selectors
            .get(index)
            .map(|q| q.as_slice())
            .ok_or(PlonkError::Algebra(AlgebraError::IndexError))
    }

    fn eval_gate_func(wire_vals: &[&F], sel_vals: &[&F], pub_input: &F) -> Result<F> {
        if wire_vals.len() != N_WIRES_PER_GATE || sel_vals.len() != N_SELECTORS {
            return Err(PlonkError::Algebra(AlgebraError::ParameterError));
        }
        let wires = [*wire_vals[0], *wire_vals[1], *wire_vals[2]];
        let sels = [
            *sel_vals[Q_L],
            *sel_vals[Q_R],
            *sel_vals[Q_M],
            *sel_vals[Q_O],
            *sel_vals[Q_C],
        ];
        Ok(SparseSystem::eval_gate_func(&wires, &sels, pub_input))
    }

    fn eval_selector_multipliers(wire_vals: &[&F]) -> Result<Vec<F>> {
        if wire_vals.len() != N_WIRES_PER_GATE {
            return Err(PlonkError::Algebra(AlgebraError::ParameterError));
        }
        let mut w = vec![F::zero(); N_SELECTORS];
        w[Q_L] = *wire_vals[0];
        w[Q_R] = *wire_vals[1];
        w[Q_M] = wire_vals[0].mul(wire_vals[1]);
        w[Q_O] = wire_vals[2].neg();
        w[Q_C] = F::one();
        Ok(w)
    }

    fn first_unsatisfied(&self, witness: &[F]) -> Option<CsIndex> {
        if witness.len() != self.num_vars {
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
            !SparseSystem::eval_gate_func(&wires, &sels, &pi[i]).is_zero()
        })
    }
}

#[cfg(test)]
mod test {
    use super::{padded_size, ConstraintSystem, PlonkCircuit};
    use zksok_algebra::{bn254::BN254Scalar, prelude::*};
    use zksok_frontend::{circuits::CubicCircuit, compile, ConstraintForm, ConstraintSystem as Compiled};

    type F = BN254Scalar;

    fn cubic() -> PlonkCircuit<F> {
        match compile::<F, _>(&CubicCircuit, ConstraintForm::Sparse).unwrap() {
            Compiled::Sparse(sparse) => PlonkCircuit::new(&sparse).unwrap(),
            Compiled::R1cs(_) => unreachable!(),
        }
    }

    #[test]
    fn padding() {
        assert_eq!(padded_size(1), 8);
        assert_eq!(padded_size(8), 8);
        assert_eq!(padded_size(9), 16);

        let cs = cubic();
        assert!(cs.size().is_power_of_two());
        assert_eq!(cs.quot_eval_dom_size(), 4 * cs.size());
        for w in cs.wiring() {
            assert_eq!(w.len(), cs.size());
        }
    }

    #[test]
    fn permutation_cycles() {
        let cs = cubic();
        let perm = cs.compute_permutation();
        let wires: Vec<usize> = cs.wiring().iter().flatten().copied().collect();
        assert_eq!(perm.len(), wires.len());

        // a permutation that maps every position to one with the same variable
        let mut seen = vec![false; perm.len()];
        for (i, p) in perm.iter().enumerate() {
            assert_eq!(wires[i], wires[*p]);
            assert!(!seen[*p]);
            seen[*p] = true;
        }

        // walking a cycle visits every occurrence of its variable
        let occurrences = wires.iter().filter(|v| **v == wires[0]).count();
        let mut len = 1;
        let mut cur = perm[0];
        while cur != 0 {
            cur = perm[cur];
            len += 1;
        }
        assert_eq!(len, occurrences);
    }

    #[test]
    fn gate_evaluation() {
        let cs = cubic();
        let compiled = compile::<F, _>(&CubicCircuit, ConstraintForm::Sparse).unwrap();
        let witness = compiled.expand(&CubicCircuit::assignment(3, 31)).unwrap();
        assert_eq!(cs.first_unsatisfied(&witness.full.0), None);

        let mut bad = witness.full.0.clone();
        let y = cs.public_vars_witness_indices()[0];
        bad[y] = F::from(32u32);
        assert!(cs.first_unsatisfied(&bad).is_some());

        let (a, b, c) = (F::from(2u32), F::from(3u32), F::from(6u32));
        let w = PlonkCircuit::<F>::eval_selector_multipliers(&[&a, &b, &c]).unwrap();
        assert_eq!(w, vec![a, b, c, c.neg(), F::one()]);
        let q: Vec<F> = vec![F::zero(), F::zero(), F::one(), F::one(), F::zero()];
        let q_ref: Vec<&F> = q.iter().collect();
        assert_eq!(
            PlonkCircuit::<F>::eval_gate_func(&[&a, &b, &c], &q_ref, &F::zero()).unwrap(),
            F::zero()
        );
        assert!(PlonkCircuit::<F>::eval_gate_func(&[&a, &b], &q_ref, &F::zero()).is_err());
    }
}

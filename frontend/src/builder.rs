use crate::{
    constraint::{
        LinearCombination, R1csConstraint, R1csSystem, SparseSystem, N_SELECTORS,
        N_WIRES_PER_GATE,
    },
    errors::{CircuitError, Result},
    solver::Hint,
    variable::{VarIndex, Variable, VariableTable, Visibility},
};
use ark_std::{end_timer, start_timer};
use zksok_algebra::prelude::*;

pub use crate::constraint::{ConstraintForm, ConstraintSystem};

/// A circuit declares its inputs and relations against a [`CircuitApi`].
pub trait Circuit<F: Scalar> {
    /// Declare the inputs and emit the constraints.
    fn define<A: CircuitApi<F>>(&self, api: &mut A) -> Result<()>;
}

/// The operations available while declaring a circuit.
///
/// Every arithmetic operation returns a fresh internal variable constrained to the
/// result; the `assert_*` operations only add constraints.
pub trait CircuitApi<F: Scalar> {
    /// Declare a public input.
    fn declare_public(&mut self, name: &str) -> Result<Variable>;

    /// Declare a secret input.
    fn declare_secret(&mut self, name: &str) -> Result<Variable>;

    /// `Σ coeff·var + constant`
    fn linear_combination(&mut self, terms: &[(Variable, F)], constant: F) -> Result<Variable>;

    /// `q_l·left + q_r·right + q_m·left·right + q_c`, with `coeffs = [q_l, q_r, q_m, q_c]`
    fn quadratic(&mut self, left: Variable, right: Variable, coeffs: [F; 4]) -> Result<Variable>;

    /// `a^-1`, constrained by `a·out = 1`. An assignment making `a` zero cannot be expanded.
    fn inverse(&mut self, a: Variable) -> Result<Variable>;

    /// Force two variables to hold the same value.
    fn assert_equal(&mut self, left: Variable, right: Variable) -> Result<()>;

    /// Force a variable to hold `value`.
    fn assert_equal_constant(&mut self, var: Variable, value: F) -> Result<()>;

    /// Force a variable to be 0 or 1.
    fn assert_boolean(&mut self, var: Variable) -> Result<()>;

    /// Decompose `var` into `n_bits` boolean variables, least significant first.
    /// The decomposition only exists when `var < 2^n_bits`.
    fn to_binary(&mut self, var: Variable, n_bits: usize) -> Result<Vec<Variable>>;

    /// A shared variable fixed to zero.
    fn zero(&mut self) -> Result<Variable>;

    /// The constant one wire.
    fn one(&self) -> Variable {
        Variable::ONE
    }

    /// A fresh variable fixed to `value`.
    fn constant(&mut self, value: F) -> Result<Variable> {
        self.linear_combination(&[], value)
    }

    /// `a + b`
    fn add(&mut self, a: Variable, b: Variable) -> Result<Variable> {
        self.linear_combination(&[(a, F::one()), (b, F::one())], F::zero())
    }

    /// `a - b`
    fn sub(&mut self, a: Variable, b: Variable) -> Result<Variable> {
        self.linear_combination(&[(a, F::one()), (b, F::one().neg())], F::zero())
    }

    /// `-a`
    fn neg(&mut self, a: Variable) -> Result<Variable> {
        self.linear_combination(&[(a, F::one().neg())], F::zero())
    }

    /// `a + value`
    fn add_constant(&mut self, a: Variable, value: F) -> Result<Variable> {
        self.linear_combination(&[(a, F::one())], value)
    }

    /// `value·a`
    fn mul_by_constant(&mut self, a: Variable, value: F) -> Result<Variable> {
        self.linear_combination(&[(a, value)], F::zero())
    }

    /// `a·b`
    fn mul(&mut self, a: Variable, b: Variable) -> Result<Variable> {
        self.quadratic(a, b, [F::zero(), F::zero(), F::one(), F::zero()])
    }

    /// `a / b`, which fails to expand when `b` is zero.
    fn div(&mut self, a: Variable, b: Variable) -> Result<Variable> {
        let inv = self.inverse(b)?;
        self.mul(a, inv)
    }

    /// `Σ 2^i·bits[i]`
    fn from_binary(&mut self, bits: &[Variable]) -> Result<Variable> {
        let terms: Vec<(Variable, F)> = bits.iter().copied().zip(powers_of_two::<F>(bits.len())).collect();
        self.linear_combination(&terms, F::zero())
    }

    /// Check that `var < 2^n_bits`.
    fn range_check(&mut self, var: Variable, n_bits: usize) -> Result<()> {
        self.to_binary(var, n_bits).map(|_| ())
    }

    /// `a xor b` for boolean inputs.
    fn xor(&mut self, a: Variable, b: Variable) -> Result<Variable> {
        let two = F::from(2u32);
        self.quadratic(a, b, [F::one(), F::one(), two.neg(), F::zero()])
    }

    /// `a and b` for boolean inputs.
    fn and(&mut self, a: Variable, b: Variable) -> Result<Variable> {
        self.mul(a, b)
    }

    /// `not a` for a boolean input.
    fn not(&mut self, a: Variable) -> Result<Variable> {
        self.linear_combination(&[(a, F::one().neg())], F::one())
    }

    /// `if bit { if_true } else { if_false }` for a boolean `bit`.
    fn select(&mut self, bit: Variable, if_true: Variable, if_false: Variable) -> Result<Variable> {
        let diff = self.sub(if_true, if_false)?;
        let picked = self.mul(bit, diff)?;
        self.add(picked, if_false)
    }
}

/// `[1, 2, 4, ..., 2^(n-1)]`
pub fn powers_of_two<F: Scalar>(n: usize) -> Vec<F> {
    let mut res = Vec::with_capacity(n);
    let mut p = F::one();
    let two = F::from(2u32);
    for _ in 0..n {
        res.push(p);
        p = p.mul(&two);
    }
    res
}

/// Records a circuit declaration into a [`ConstraintSystem`] of the chosen form.
pub struct Builder<F> {
    system: ConstraintSystem<F>,
    zero: Option<Variable>,
}

impl<F: Scalar> Builder<F> {
    /// Start an empty circuit.
    pub fn new(form: ConstraintForm) -> Self {
        let system = match form {
            ConstraintForm::R1cs => ConstraintSystem::R1cs(R1csSystem::new()),
            ConstraintForm::Sparse => {
                let mut cs = SparseSystem::new();
                // pin the wire shared with the rank-1 form's constant to one
                cs.push_gate(
                    [0, 0, 0],
                    [F::one(), F::zero(), F::zero(), F::zero(), F::one().neg()],
                );
                ConstraintSystem::Sparse(cs)
            }
        };
        Builder { system, zero: None }
    }

    /// The form being emitted.
    pub fn form(&self) -> ConstraintForm {
        self.system.form()
    }

    /// Freeze the declaration.
    pub fn finish(self) -> ConstraintSystem<F> {
        self.system
    }

    fn variables(&self) -> &VariableTable {
        self.system.variables()
    }

    fn check_terms(&self, terms: &[(Variable, F)]) -> Result<Vec<(VarIndex, F)>> {
        terms
            .iter()
            .map(|(v, c)| self.variables().check(*v).map(|i| (i, *c)))
            .collect()
    }
}

fn new_internal(variables: &mut VariableTable) -> Result<VarIndex> {
    Ok(variables.declare(None, Visibility::Internal)?.index())
}

fn one_lc<F: Scalar>() -> LinearCombination<F> {
    LinearCombination::term(0, F::one())
}

/// Emit `Σ coeff·w[var] + constant` as a chain of gates. The last gate writes into
/// `target` when given, which then constrains an existing variable instead of
/// allocating a new one.
fn sparse_linear<F: Scalar>(
    cs: &mut SparseSystem<F>,
    terms: &[(VarIndex, F)],
    constant: F,
    target: Option<VarIndex>,
) -> Result<VarIndex> {
    let zero = F::zero();
    let one = F::one();

    let emit = |cs: &mut SparseSystem<F>,
                    wires: [VarIndex; 2],
                    coeffs: [F; 2],
                    k: F,
                    last: bool|
     -> Result<VarIndex> {
        let out = match (last, target) {
            (true, Some(t)) => t,
            _ => {
                let out = new_internal(&mut cs.variables)?;
                let mut hint_terms = vec![(wires[0], coeffs[0])];
                if !coeffs[1].is_zero() {
                    hint_terms.push((wires[1], coeffs[1]));
                }
                cs.solver.push(Hint::Linear {
                    terms: hint_terms,
                    constant: k,
                    out,
                });
                out
            }
        };
        let sels: [F; N_SELECTORS] = [coeffs[0], coeffs[1], zero, one, k];
        let gate: [VarIndex; N_WIRES_PER_GATE] = [wires[0], wires[1], out];
        cs.push_gate(gate, sels);
        Ok(out)
    };

    match terms.len() {
        0 => emit(cs, [0, 0], [zero, zero], constant, true),
        1 => emit(cs, [terms[0].0, 0], [terms[0].1, zero], constant, true),
        n => {
            let mut acc = terms[0];
            let mut out = 0;
            for (i, term) in terms.iter().enumerate().skip(1) {
                let last = i == n - 1;
                let k = if last { constant } else { zero };
                out = emit(cs, [acc.0, term.0], [acc.1, term.1], k, last)?;
                acc = (out, one);
            }
            Ok(out)
        }
    }
}

impl<F: Scalar> CircuitApi<F> for Builder<F> {
    fn declare_public(&mut self, name: &str) -> Result<Variable> {
        match &mut self.system {
            ConstraintSystem::R1cs(cs) => cs.variables.declare(Some(name), Visibility::Public),
            ConstraintSystem::Sparse(cs) => {
                let var = cs.variables.declare(Some(name), Visibility::Public)?;
                let v = var.index();
                let row = cs.size();
                cs.push_gate(
                    [v, v, v],
                    [F::zero(), F::zero(), F::zero(), F::one(), F::zero()],
                );
                cs.public_vars_constraint_indices.push(row);
                cs.public_vars_witness_indices.push(v);
                Ok(var)
            }
        }
    }

    fn declare_secret(&mut self, name: &str) -> Result<Variable> {
        match &mut self.system {
            ConstraintSystem::R1cs(cs) => cs.variables.declare(Some(name), Visibility::Secret),
            ConstraintSystem::Sparse(cs) => cs.variables.declare(Some(name), Visibility::Secret),
        }
    }

    fn linear_combination(&mut self, terms: &[(Variable, F)], constant: F) -> Result<Variable> {
        let terms = self.check_terms(terms)?;
        match &mut self.system {
            ConstraintSystem::R1cs(cs) => {
                let out = new_internal(&mut cs.variables)?;
                cs.solver.push(Hint::Linear {
                    terms: terms.clone(),
                    constant,
                    out,
                });
                let mut a = LinearCombination(terms);
                if !constant.is_zero() {
                    a.push(0, constant);
                }
                cs.constraints.push(R1csConstraint {
                    a,
                    b: one_lc(),
                    c: LinearCombination::term(out, F::one()),
                });
                Ok(Variable(out))
            }
            ConstraintSystem::Sparse(cs) => Ok(Variable(sparse_linear(cs, &terms, constant, None)?)),
        }
    }

    fn quadratic(&mut self, left: Variable, right: Variable, coeffs: [F; 4]) -> Result<Variable> {
        let l = self.variables().check(left)?;
        let r = self.variables().check(right)?;
        let [q_l, q_r, q_m, q_c] = coeffs;
        match &mut self.system {
            ConstraintSystem::R1cs(cs) => {
                let out = new_internal(&mut cs.variables)?;
                cs.solver.push(Hint::Product {
                    left: l,
                    right: r,
                    coeffs,
                    out,
                });
                let constraint = if q_m.is_zero() {
                    R1csConstraint {
                        a: LinearCombination(vec![(l, q_l), (r, q_r), (0, q_c)]),
                        b: one_lc(),
                        c: LinearCombination::term(out, F::one()),
                    }
                } else {
                    R1csConstraint {
                        a: LinearCombination::term(l, q_m),
                        b: LinearCombination::term(r, F::one()),
                        c: LinearCombination(vec![
                            (out, F::one()),
                            (l, q_l.neg()),
                            (r, q_r.neg()),
                            (0, q_c.neg()),
                        ]),
                    }
                };
                cs.constraints.push(constraint);
                Ok(Variable(out))
            }
            ConstraintSystem::Sparse(cs) => {
                let out = new_internal(&mut cs.variables)?;
                cs.solver.push(Hint::Product {
                    left: l,
                    right: r,
                    coeffs,
                    out,
                });
                cs.push_gate([l, r, out], [q_l, q_r, q_m, F::one(), q_c]);
                Ok(Variable(out))
            }
        }
    }

    fn inverse(&mut self, a: Variable) -> Result<Variable> {
        let v = self.variables().check(a)?;
        if self.zero == Some(a) {
            return Err(CircuitError::MalformedCircuit(
                "inverse of the constant zero".into(),
            ));
        }
        let (variables, solver) = match &mut self.system {
            ConstraintSystem::R1cs(cs) => (&mut cs.variables, &mut cs.solver),
            ConstraintSystem::Sparse(cs) => (&mut cs.variables, &mut cs.solver),
        };
        let out = new_internal(variables)?;
        solver.push(Hint::Inverse { input: v, out });
        match &mut self.system {
            ConstraintSystem::R1cs(cs) => cs.constraints.push(R1csConstraint {
                a: LinearCombination::term(v, F::one()),
                b: LinearCombination::term(out, F::one()),
                c: one_lc(),
            }),
            // a·out - 1 = 0
            ConstraintSystem::Sparse(cs) => cs.push_gate(
                [v, out, 0],
                [F::zero(), F::zero(), F::one(), F::zero(), F::one().neg()],
            ),
        }
        Ok(Variable(out))
    }

    fn assert_equal(&mut self, left: Variable, right: Variable) -> Result<()> {
        let l = self.variables().check(left)?;
        let r = self.variables().check(right)?;
        match &mut self.system {
            ConstraintSystem::R1cs(cs) => cs.constraints.push(R1csConstraint {
                a: LinearCombination(vec![(l, F::one()), (r, F::one().neg())]),
                b: one_lc(),
                c: LinearCombination::zero(),
            }),
            ConstraintSystem::Sparse(cs) => cs.push_gate(
                [l, r, 0],
                [F::one(), F::one().neg(), F::zero(), F::zero(), F::zero()],
            ),
        }
        Ok(())
    }

    fn assert_equal_constant(&mut self, var: Variable, value: F) -> Result<()> {
        let v = self.variables().check(var)?;
        match &mut self.system {
            ConstraintSystem::R1cs(cs) => cs.constraints.push(R1csConstraint {
                a: LinearCombination(vec![(v, F::one()), (0, value.neg())]),
                b: one_lc(),
                c: LinearCombination::zero(),
            }),
            ConstraintSystem::Sparse(cs) => cs.push_gate(
                [v, 0, 0],
                [F::one(), F::zero(), F::zero(), F::zero(), value.neg()],
            ),
        }
        Ok(())
    }

    fn assert_boolean(&mut self, var: Variable) -> Result<()> {
        let v = self.variables().check(var)?;
        match &mut self.system {
            ConstraintSystem::R1cs(cs) => cs.constraints.push(R1csConstraint {
                a: LinearCombination::term(v, F::one()),
                b: LinearCombination::term(v, F::one()),
                c: LinearCombination::term(v, F::one()),
            }),
            // v^2 - v = 0
            ConstraintSystem::Sparse(cs) => cs.push_gate(
                [v, v, 0],
                [F::one().neg(), F::zero(), F::one(), F::zero(), F::zero()],
            ),
        }
        Ok(())
    }

    fn to_binary(&mut self, var: Variable, n_bits: usize) -> Result<Vec<Variable>> {
        let v = self.variables().check(var)?;
        if n_bits == 0 || n_bits > F::capacity() {
            return Err(CircuitError::MalformedCircuit(format!(
                "cannot decompose into {} bits",
                n_bits
            )));
        }

        let system = &mut self.system;
        let (variables, solver) = match system {
            ConstraintSystem::R1cs(cs) => (&mut cs.variables, &mut cs.solver),
            ConstraintSystem::Sparse(cs) => (&mut cs.variables, &mut cs.solver),
        };
        let mut outputs = Vec::with_capacity(n_bits);
        for _ in 0..n_bits {
            outputs.push(new_internal(variables)?);
        }
        solver.push(Hint::Bits {
            input: v,
            outputs: outputs.clone(),
        });

        let bits: Vec<Variable> = outputs.iter().map(|i| Variable(*i)).collect();
        for bit in bits.iter() {
            self.assert_boolean(*bit)?;
        }

        let terms: Vec<(VarIndex, F)> = outputs
            .iter()
            .copied()
            .zip(powers_of_two::<F>(n_bits))
            .collect();
        match &mut self.system {
            ConstraintSystem::R1cs(cs) => {
                let mut a = LinearCombination(terms);
                a.push(v, F::one().neg());
                cs.constraints.push(R1csConstraint {
                    a,
                    b: one_lc(),
                    c: LinearCombination::zero(),
                });
            }
            ConstraintSystem::Sparse(cs) => {
                sparse_linear(cs, &terms, F::zero(), Some(v))?;
            }
        }
        Ok(bits)
    }

    fn zero(&mut self) -> Result<Variable> {
        if let Some(z) = self.zero {
            return Ok(z);
        }
        let z = self.constant(F::zero())?;
        self.zero = Some(z);
        Ok(z)
    }
}

/// Run `circuit.define` against a fresh builder and freeze the result.
pub fn compile<F: Scalar, C: Circuit<F>>(
    circuit: &C,
    form: ConstraintForm,
) -> Result<ConstraintSystem<F>> {
    let time = start_timer!(|| format!("compile to {:?}", form));
    let mut builder = Builder::new(form);
    let res = circuit.define(&mut builder);
    end_timer!(time);
    res?;
    Ok(builder.finish())
}

#[cfg(test)]
mod test {
    use super::{compile, Builder, Circuit, CircuitApi, ConstraintForm};
    use crate::{
        errors::{CircuitError, Result},
        variable::Variable,
        witness::Assignment,
    };
    use zksok_algebra::{bn254::BN254Scalar, prelude::*};

    type F = BN254Scalar;

    struct Cubic;

    impl Circuit<F> for Cubic {
        fn define<A: CircuitApi<F>>(&self, api: &mut A) -> Result<()> {
            let x = api.declare_secret("x")?;
            let y = api.declare_public("y")?;
            let x2 = api.mul(x, x)?;
            let x3 = api.mul(x2, x)?;
            let sum = api.add(x3, x)?;
            let rhs = api.add_constant(sum, F::one())?;
            api.assert_equal(y, rhs)
        }
    }

    fn cubic_assignment(x: u64, y: u64) -> Assignment<F> {
        let mut a = Assignment::new();
        a.assign_u64("x", x).assign_u64("y", y);
        a
    }

    #[test]
    fn cubic_in_both_forms() {
        for form in [ConstraintForm::R1cs, ConstraintForm::Sparse] {
            let cs = compile::<F, _>(&Cubic, form).unwrap();
            assert_eq!(cs.form(), form);

            let witness = cs.expand(&cubic_assignment(3, 31)).unwrap();
            assert!(cs.is_satisfied_by(&witness.full.0));
            assert_eq!(witness.public.0, vec![F::from(31u32)]);

            assert!(matches!(
                cs.expand(&cubic_assignment(3, 32)),
                Err(CircuitError::UnsatisfiedConstraint(_))
            ));

            let mut missing = Assignment::new();
            missing.assign_u64("x", 3);
            assert_eq!(
                cs.expand(&missing),
                Err(CircuitError::IncompleteAssignment("y".into()))
            );
        }
    }

    #[test]
    fn compilation_is_deterministic() {
        for form in [ConstraintForm::R1cs, ConstraintForm::Sparse] {
            let a = compile::<F, _>(&Cubic, form).unwrap();
            let b = compile::<F, _>(&Cubic, form).unwrap();
            assert_eq!(a, b);
            assert_eq!(a.num_constraints(), b.num_constraints());
            assert_eq!(a.num_variables(), b.num_variables());
        }
    }

    #[test]
    fn sparse_public_rows_are_recorded() {
        let cs = compile::<F, _>(&Cubic, ConstraintForm::Sparse).unwrap();
        let sparse = cs.as_sparse().unwrap();
        assert_eq!(sparse.public_vars_constraint_indices, vec![1]);
        assert_eq!(sparse.public_vars_witness_indices, vec![2]);
        assert!(cs.as_r1cs().is_none());
    }

    #[test]
    fn range_check_rejects_wide_values() {
        for form in [ConstraintForm::R1cs, ConstraintForm::Sparse] {
            let mut builder = Builder::<F>::new(form);
            let v = builder.declare_secret("v").unwrap();
            let bits = builder.to_binary(v, 8).unwrap();
            assert_eq!(bits.len(), 8);
            let back = builder.from_binary(&bits).unwrap();
            builder.assert_equal(back, v).unwrap();
            let cs = builder.finish();

            let mut ok = Assignment::new();
            ok.assign_u64("v", 255);
            let witness = cs.expand(&ok).unwrap();
            assert!(witness.full.0[bits[7].index()].is_one());

            let mut wide = Assignment::new();
            wide.assign_u64("v", 256);
            assert!(matches!(
                cs.expand(&wide),
                Err(CircuitError::UnsatisfiedConstraint(_))
            ));
        }
    }

    #[test]
    fn bit_operations() {
        for form in [ConstraintForm::R1cs, ConstraintForm::Sparse] {
            let mut builder = Builder::<F>::new(form);
            let a = builder.declare_secret("a").unwrap();
            let b = builder.declare_secret("b").unwrap();
            let x = builder.xor(a, b).unwrap();
            let n = builder.not(a).unwrap();
            let s = builder.select(a, b, n).unwrap();
            let z = builder.zero().unwrap();
            assert_eq!(builder.zero().unwrap(), z);
            let cs = builder.finish();

            for (va, vb) in [(0u64, 0u64), (0, 1), (1, 0), (1, 1)] {
                let mut asg = Assignment::new();
                asg.assign_u64("a", va).assign_u64("b", vb);
                let w = cs.expand(&asg).unwrap().full.0;
                assert_eq!(w[x.index()], F::from(va ^ vb));
                assert_eq!(w[n.index()], F::from(1 - va));
                let expected = if va == 1 { vb } else { 1 - va };
                assert_eq!(w[s.index()], F::from(expected));
                assert!(w[z.index()].is_zero());
            }
        }
    }

    #[test]
    fn inverse_and_division() {
        for form in [ConstraintForm::R1cs, ConstraintForm::Sparse] {
            let mut builder = Builder::<F>::new(form);
            let a = builder.declare_secret("a").unwrap();
            let b = builder.declare_public("b").unwrap();
            let inv = builder.inverse(b).unwrap();
            let q = builder.div(a, b).unwrap();
            let cs = builder.finish();

            let mut asg = Assignment::new();
            asg.assign_u64("a", 21).assign_u64("b", 7);
            let w = cs.expand(&asg).unwrap().full.0;
            assert_eq!(w[inv.index()].mul(&F::from(7u32)), F::one());
            assert_eq!(w[q.index()], F::from(3u32));

            let mut by_zero = Assignment::new();
            by_zero.assign_u64("a", 21).assign_u64("b", 0);
            assert!(matches!(
                cs.expand(&by_zero),
                Err(CircuitError::UnsatisfiedConstraint(_))
            ));

            // a forged inverse does not satisfy a·out = 1
            let mut forged = cs.expand(&asg).unwrap().full.0;
            forged[inv.index()] = F::from(2u32);
            assert!(!cs.is_satisfied_by(&forged));
        }
    }

    #[test]
    fn inverse_of_constant_zero_is_refused() {
        for form in [ConstraintForm::R1cs, ConstraintForm::Sparse] {
            let mut builder = Builder::<F>::new(form);
            let z = builder.zero().unwrap();
            assert!(matches!(
                builder.inverse(z),
                Err(CircuitError::MalformedCircuit(_))
            ));
        }
    }

    #[test]
    fn long_linear_combinations() {
        let mut builder = Builder::<F>::new(ConstraintForm::Sparse);
        let vars: Vec<Variable> = (0..5)
            .map(|i| builder.declare_secret(&format!("v{}", i)).unwrap())
            .collect();
        let terms: Vec<(Variable, F)> = vars
            .iter()
            .enumerate()
            .map(|(i, v)| (*v, F::from(i as u32 + 1)))
            .collect();
        let out = builder.linear_combination(&terms, F::from(7u32)).unwrap();
        let cs = builder.finish();

        let mut asg = Assignment::new();
        for i in 0..5 {
            asg.assign_u64(&format!("v{}", i), 10);
        }
        let w = cs.expand(&asg).unwrap().full.0;
        // 10·(1+2+3+4+5) + 7
        assert_eq!(w[out.index()], F::from(157u32));
    }

    #[test]
    fn malformed_declarations() {
        let mut builder = Builder::<F>::new(ConstraintForm::R1cs);
        let foreign = Variable(42);
        assert!(matches!(
            builder.mul(foreign, Variable::ONE),
            Err(CircuitError::MalformedCircuit(_))
        ));
        let v = builder.declare_secret("v").unwrap();
        assert!(matches!(
            builder.to_binary(v, 0),
            Err(CircuitError::MalformedCircuit(_))
        ));
        assert!(matches!(
            builder.to_binary(v, 254),
            Err(CircuitError::MalformedCircuit(_))
        ));
        assert!(matches!(
            builder.declare_public("v"),
            Err(CircuitError::MalformedCircuit(_))
        ));
    }

    struct Failing;

    impl Circuit<F> for Failing {
        fn define<A: CircuitApi<F>>(&self, api: &mut A) -> Result<()> {
            api.declare_secret("x")?;
            Err(CircuitError::MalformedCircuit("refused".into()))
        }
    }

    #[test]
    fn define_errors_are_propagated() {
        assert_eq!(
            compile::<F, _>(&Failing, ConstraintForm::Sparse),
            Err(CircuitError::MalformedCircuit("refused".into()))
        );
    }
}

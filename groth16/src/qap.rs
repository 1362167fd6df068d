use crate::errors::{Groth16Error, Result};
use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};
use ark_std::{end_timer, start_timer};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use zksok_algebra::prelude::*;
use zksok_frontend::{constraint::R1csSystem, variable::VarIndex};
use zksok_plonk::poly_commit::field_polynomial::FpPolynomial;

/// The quadratic arithmetic program of a rank-1 system.
///
/// Row `i < m` holds constraint `i`. Row `m + j` constrains instance variable `j` with
/// `A = z_j, B = C = 0`, which keeps the instance polynomials linearly independent.
pub(crate) struct Qap<'a, F: Domain> {
    pub(crate) r1cs: &'a R1csSystem<F>,
    pub(crate) instance: Vec<VarIndex>,
    pub(crate) private: Vec<VarIndex>,
    pub(crate) domain: Radix2EvaluationDomain<F::Field>,
}

/// `u_k(tau)`, `v_k(tau)`, `w_k(tau)` for every variable and `Z(tau)`.
pub(crate) struct QapEvaluations<F> {
    pub(crate) u: Vec<F>,
    pub(crate) v: Vec<F>,
    pub(crate) w: Vec<F>,
    pub(crate) z_tau: F,
}

/// The number of rows of the program: constraints plus one row per instance variable.
pub fn domain_size<F: Scalar>(r1cs: &R1csSystem<F>) -> usize {
    let rows = r1cs.num_constraints() + 1 + r1cs.variables.public_indices().len();
    rows.max(2).next_power_of_two()
}

impl<'a, F: Domain> Qap<'a, F> {
    pub(crate) fn new(r1cs: &'a R1csSystem<F>) -> Result<Self> {
        let num_vars = r1cs.num_vars();
        if num_vars == 0 {
            return Err(Groth16Error::MalformedCircuit(
                "the constant variable is missing".into(),
            ));
        }
        for (i, c) in r1cs.constraints.iter().enumerate() {
            if c.a
                .terms()
                .chain(c.b.terms())
                .chain(c.c.terms())
                .any(|(index, _)| *index >= num_vars)
            {
                return Err(Groth16Error::MalformedCircuit(format!(
                    "constraint {} references an unknown variable",
                    i
                )));
            }
        }

        let instance = r1cs.instance_indices();
        let mut is_instance = vec![false; num_vars];
        for i in instance.iter() {
            is_instance[*i] = true;
        }
        let private = (0..num_vars).filter(|i| !is_instance[*i]).collect();

        let size = domain_size(r1cs);
        let domain = FpPolynomial::<F>::evaluation_domain(size)
            .ok_or(Groth16Error::GroupNotFound(size))?;

        Ok(Qap {
            r1cs,
            instance,
            private,
            domain,
        })
    }

    pub(crate) fn size(&self) -> usize {
        self.domain.size()
    }

    /// Evaluate every variable polynomial at `tau` through the Lagrange basis of the domain.
    pub(crate) fn evaluate_at(&self, tau: &F) -> Result<QapEvaluations<F>> {
        let z_tau = F::from_field(self.domain.evaluate_vanishing_polynomial(tau.get_field()));
        if z_tau.is_zero() {
            return Err(Groth16Error::DegenerateToxicWaste);
        }
        let lagrange: Vec<F> = self
            .domain
            .evaluate_all_lagrange_coefficients(tau.get_field())
            .into_iter()
            .map(F::from_field)
            .collect();

        let num_vars = self.r1cs.num_vars();
        let mut u = vec![F::zero(); num_vars];
        let mut v = vec![F::zero(); num_vars];
        let mut w = vec![F::zero(); num_vars];

        for (c, l) in self.r1cs.constraints.iter().zip(lagrange.iter()) {
            for (index, coeff) in c.a.terms() {
                u[*index].add_assign(&coeff.mul(l));
            }
            for (index, coeff) in c.b.terms() {
                v[*index].add_assign(&coeff.mul(l));
            }
            for (index, coeff) in c.c.terms() {
                w[*index].add_assign(&coeff.mul(l));
            }
        }
        let m = self.r1cs.num_constraints();
        for (j, index) in self.instance.iter().enumerate() {
            u[*index].add_assign(&lagrange[m + j]);
        }

        Ok(QapEvaluations { u, v, w, z_tau })
    }

    /// Compute the coefficients of `H = (A·B - C) / Z` for a satisfying witness.
    ///
    /// The division runs on the coset `g·<omega>`, where `Z` is the constant `g^d - 1`.
    pub(crate) fn quotient(&self, witness: &[F]) -> Result<Vec<F>> {
        let time = start_timer!(|| "Groth16::quotient");
        let d = self.size();
        let m = self.r1cs.num_constraints();

        let mut a = vec![F::zero(); d];
        let mut b = vec![F::zero(); d];
        let mut c = vec![F::zero(); d];
        for (i, row) in self.r1cs.constraints.iter().enumerate() {
            a[i] = row.a.eval(witness);
            b[i] = row.b.eval(witness);
            c[i] = row.c.eval(witness);
        }
        for (j, index) in self.instance.iter().enumerate() {
            a[m + j] = witness[*index];
        }

        let g = F::multiplicative_generator();
        let domain = &self.domain;
        let columns = vec![a, b, c];

        #[cfg(feature = "parallel")]
        let coset_evals: Vec<Vec<F>> = columns
            .par_iter()
            .map(|evals| FpPolynomial::ifft_with_domain(domain, evals).coset_fft_with_domain(domain, &g))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let coset_evals: Vec<Vec<F>> = columns
            .iter()
            .map(|evals| FpPolynomial::ifft_with_domain(domain, evals).coset_fft_with_domain(domain, &g))
            .collect();

        let z_coset_inv = g.pow(&[d as u64]).sub(&F::one()).inv()?;
        let h_coset: Vec<F> = (0..d)
            .map(|i| {
                coset_evals[0][i]
                    .mul(&coset_evals[1][i])
                    .sub(&coset_evals[2][i])
                    .mul(&z_coset_inv)
            })
            .collect();
        let h = FpPolynomial::coset_ifft_with_domain(domain, &h_coset, &g.inv()?);
        end_timer!(time);

        let mut coefs = h.get_coefs_ref().to_vec();
        coefs.resize(d - 1, F::zero());
        Ok(coefs)
    }
}

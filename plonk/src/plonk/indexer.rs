use crate::errors::{PlonkError, Result};
use crate::plonk::{
    constraint_system::{ConstraintSystem, CsIndex, QUOTIENT_FACTOR},
    helpers::{compute_lagrange_constant, encode_perm_to_group},
};
use crate::poly_commit::{field_polynomial::FpPolynomial, pcs::PolyComScheme};
use ark_poly::Radix2EvaluationDomain;
use ark_std::{end_timer, start_timer};
use rand_chacha::ChaChaRng;
use zksok_algebra::prelude::*;

/// The number of quotient chunks, one per wire.
pub const N_T_POLYS: usize = 3;

/// The data structure of a Plonk proof.
#[derive(Debug, Deserialize, Eq, PartialEq, Serialize, Clone)]
pub struct PlonkProof<C, F> {
    /// The witness polynomial commitments.
    pub cm_w_vec: Vec<C>,
    /// The split quotient polynomial commitments
    pub cm_t_vec: Vec<C>,
    /// The sigma polynomial commitment.
    pub cm_z: C,
    /// The openings of witness polynomials at \zeta.
    pub w_polys_eval_zeta: Vec<F>,
    /// The openings of the first two permutation polynomials at \zeta.
    pub s_polys_eval_zeta: Vec<F>,
    /// The opening of z(X) at point \zeta * \omega.
    pub z_eval_zeta_omega: F,
    /// The commitment for the first witness polynomial, for \zeta.
    pub opening_witness_zeta: C,
    /// The commitment for the second witness polynomial, for \zeta\omega.
    pub opening_witness_zeta_omega: C,
}

impl<C, F> PlonkProof<C, F> {
    /// Check the number of elements of every field for a system with `n_wires_per_gate` wires.
    pub fn check_shape(&self, n_wires_per_gate: usize) -> Result<()> {
        if self.cm_w_vec.len() != n_wires_per_gate
            || self.cm_t_vec.len() != N_T_POLYS
            || self.w_polys_eval_zeta.len() != n_wires_per_gate
            || self.s_polys_eval_zeta.len() + 1 != n_wires_per_gate
        {
            return Err(PlonkError::MalformedProof);
        }
        Ok(())
    }
}

/// The type of the Plonk proof with a specific polynomial commitment scheme.
pub type PlonkPf<PCS> =
    PlonkProof<<PCS as PolyComScheme>::Commitment, <PCS as PolyComScheme>::Field>;

/// Plonk prover parameters.
///
/// Only `q_polys`, `s_polys` and `verifier_params` carry information; the rest is
/// precomputed from them by [`PlonkProverParams::precompute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlonkProverParams<O, C, F> {
    /// The polynomials of the selectors.
    pub q_polys: Vec<O>,
    /// The polynomials of perm1, perm2, ..., perm_{n_wires_per_gate}.
    pub s_polys: Vec<O>,
    /// The Plonk verifier parameters.
    pub verifier_params: PlonkVerifierParams<C, F>,
    /// The elements of the group.
    pub group: Vec<F>,
    /// The evaluation domain for computing the quotient polynomial.
    pub coset_quotient: Vec<F>,
    /// The first lagrange basis, scaled by n, on the quotient coset.
    pub l1_coset_evals: Vec<F>,
    /// The inverses of the vanishing polynomial on the quotient coset.
    pub z_h_inv_coset_evals: Vec<F>,
    /// The selector polynomials' evaluations on the quotient coset.
    pub q_coset_evals: Vec<Vec<F>>,
    /// The permutation polynomials' evaluations on the quotient coset.
    pub s_coset_evals: Vec<Vec<F>>,
}

/// Prover parameters over a particular polynomial commitment scheme.
pub type PlonkPK<PCS> = PlonkProverParams<
    FpPolynomial<<PCS as PolyComScheme>::Field>,
    <PCS as PolyComScheme>::Commitment,
    <PCS as PolyComScheme>::Field,
>;

impl<O, C, F> PlonkProverParams<O, C, F> {
    /// Return the verifier parameters.
    pub fn get_verifier_params(self) -> PlonkVerifierParams<C, F> {
        self.verifier_params
    }

    /// Return a reference of verifier parameters.
    pub fn get_verifier_params_ref(&self) -> &PlonkVerifierParams<C, F> {
        &self.verifier_params
    }
}

impl<C, F: Domain> PlonkProverParams<FpPolynomial<F>, C, F> {
    /// Rebuild the prover parameters from the selector and permutation polynomials.
    pub fn precompute(
        q_polys: Vec<FpPolynomial<F>>,
        s_polys: Vec<FpPolynomial<F>>,
        verifier_params: PlonkVerifierParams<C, F>,
    ) -> Result<Self> {
        let n = verifier_params.cs_size;
        let m = n * QUOTIENT_FACTOR;
        if verifier_params.k.len() < 2 {
            return Err(PlonkError::ProvingKeyMismatch);
        }
        let domain = FpPolynomial::<F>::evaluation_domain(n).ok_or(PlonkError::GroupNotFound(n))?;
        let domain_m =
            FpPolynomial::<F>::evaluation_domain(m).ok_or(PlonkError::GroupNotFound(m))?;
        let k_1 = verifier_params.k[1];

        let group = FpPolynomial::<F>::domain_elements(&domain);
        let coset_quotient = FpPolynomial::<F>::domain_elements(&domain_m)
            .into_iter()
            .map(|x| k_1.mul(&x))
            .collect();

        let q_coset_evals = q_polys
            .iter()
            .map(|q| q.coset_fft_with_domain(&domain_m, &k_1))
            .collect();
        let s_coset_evals = s_polys
            .iter()
            .map(|s| s.coset_fft_with_domain(&domain_m, &k_1))
            .collect();

        // X^n - 1 = (X - 1) (X^{n-1} + X^{n-2} + ... + 1)
        let mut l1_evals = vec![F::zero(); n];
        l1_evals[0] = F::from(n as u64);
        let l1_coefs = FpPolynomial::ifft_with_domain(&domain, &l1_evals);
        let l1_coset_evals = l1_coefs.coset_fft_with_domain(&domain_m, &k_1);

        let z_h_coefs = {
            let mut v = vec![F::zero(); n + 1];
            v[0] = F::one().neg();
            v[n] = F::one();
            FpPolynomial::from_coefs(v)
        };
        let z_h_inv_coset_evals = z_h_coefs
            .coset_fft_with_domain(&domain_m, &k_1)
            .into_iter()
            .map(|x| x.inv().map_err(|_| PlonkError::DivisionByZero))
            .collect::<Result<Vec<F>>>()?;

        Ok(PlonkProverParams {
            q_polys,
            s_polys,
            verifier_params,
            group,
            coset_quotient,
            l1_coset_evals,
            z_h_inv_coset_evals,
            q_coset_evals,
            s_coset_evals,
        })
    }
}

/// Plonk verifier parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PlonkVerifierParams<C, F> {
    /// The commitments of the selectors.
    pub cm_q_vec: Vec<C>,
    /// The commitments of perm1, perm2, ..., perm_{n_wires_per_gate}.
    pub cm_s_vec: Vec<C>,
    /// `n_wires_per_gate` different quadratic non-residue in F_q-{0}.
    pub k: Vec<F>,
    /// The size of constraint system.
    pub cs_size: usize,
    /// The public constrain variables indices.
    pub public_vars_constraint_indices: Vec<CsIndex>,
    /// The constrain lagrange base by public constrain variables.
    pub lagrange_constants: Vec<F>,
}

/// Define the PLONK verifier params by given `PolyComScheme`.
pub type PlonkVK<PCS> =
    PlonkVerifierParams<<PCS as PolyComScheme>::Commitment, <PCS as PolyComScheme>::Field>;

impl<C, F: Domain> PlonkVerifierParams<C, F> {
    /// Return the evaluation domain and its generator.
    pub fn domain_and_root(&self) -> Result<(Radix2EvaluationDomain<F::Field>, F)> {
        let domain = FpPolynomial::<F>::evaluation_domain(self.cs_size)
            .ok_or(PlonkError::VerificationKeyMismatch)?;
        let root = F::from_field(domain.group_gen);
        Ok((domain, root))
    }

    /// Check the key against a system with `n_wires_per_gate` wires and `n_selectors` selectors.
    pub fn check_shape(&self, n_wires_per_gate: usize, n_selectors: usize) -> Result<()> {
        if self.cm_q_vec.len() != n_selectors
            || self.cm_s_vec.len() != n_wires_per_gate
            || self.k.len() != n_wires_per_gate
            || !self.cs_size.is_power_of_two()
            || self.lagrange_constants.len() != self.public_vars_constraint_indices.len()
            || self
                .public_vars_constraint_indices
                .iter()
                .any(|i| *i >= self.cs_size)
        {
            return Err(PlonkError::VerificationKeyMismatch);
        }
        Ok(())
    }
}

/// Find `n_wires_per_gate - 1` different quadratic non-residue in F_q-{0}.
pub fn choose_ks<R: CryptoRng + RngCore, F: Scalar>(
    prng: &mut R,
    n_wires_per_gate: usize,
) -> Vec<F> {
    let mut k = vec![F::one()];

    for _ in 1..n_wires_per_gate {
        loop {
            let ki = F::random(prng);
            if ki.is_zero() {
                continue;
            }
            if k.iter().all(|x| x != &ki) && ki.legendre().is_qnr() {
                k.push(ki);
                break;
            }
        }
    }
    k
}

/// Run the Plonk indexer.
/// The constraint system `cs` must have a power-of-two number of constraints.
pub fn indexer<PCS: PolyComScheme, CS: ConstraintSystem<Field = PCS::Field>>(
    cs: &CS,
    pcs: &PCS,
) -> Result<PlonkPK<PCS>> {
    indexer_with_lagrange(cs, pcs, None)
}

/// The Plonk indexer that leverages Lagrange bases
pub fn indexer_with_lagrange<PCS: PolyComScheme, CS: ConstraintSystem<Field = PCS::Field>>(
    cs: &CS,
    pcs: &PCS,
    lagrange_pcs: Option<&PCS>,
) -> Result<PlonkPK<PCS>> {
    let indexer_timer = start_timer!(|| "Plonk::Indexer");

    // It's okay to choose a fixed seed to generate quadratic non-residue.
    let mut prng = ChaChaRng::from_seed([0u8; 32]);
    let n_wires_per_gate = CS::n_wires_per_gate();
    let n = cs.size();
    let m = cs.quot_eval_dom_size();
    if m % n != 0 {
        return Err(PlonkError::MalformedCircuit(
            "the quotient domain is not a multiple of the domain".into(),
        ));
    }
    // blinded wires and z reach degree n + 2
    if pcs.max_degree() < n + 2 {
        return Err(PlonkError::SetupSizeExceeded {
            needed: n + 3,
            available: pcs.max_degree() + 1,
        });
    }
    let lagrange_pcs = lagrange_pcs.filter(|l| l.max_degree() + 1 == n);

    let domain =
        FpPolynomial::<PCS::Field>::evaluation_domain(n).ok_or(PlonkError::GroupNotFound(n))?;
    let group = FpPolynomial::<PCS::Field>::domain_elements(&domain);
    let root = PCS::Field::from_field(domain.group_gen);
    let k = choose_ks::<_, PCS::Field>(&mut prng, n_wires_per_gate);

    let commit = |evals: &[PCS::Field], polynomial: &FpPolynomial<PCS::Field>| {
        if let Some(lagrange_pcs) = lagrange_pcs {
            lagrange_pcs.commit(&FpPolynomial::from_coefs(evals.to_vec()))
        } else {
            pcs.commit(polynomial)
        }
    };

    // Step 1: compute permutation polynomials and commit them.
    let perm_timer = start_timer!(|| "Permutation polynomials");
    let encoded_perm = encode_perm_to_group(&group, &cs.compute_permutation(), &k);
    let mut s_polys = vec![];
    let mut cm_s_vec = vec![];
    for i in 0..n_wires_per_gate {
        let s_evals = &encoded_perm[i * n..(i + 1) * n];
        let s_coefs = FpPolynomial::ifft_with_domain(&domain, s_evals);
        cm_s_vec.push(commit(s_evals, &s_coefs)?);
        s_polys.push(s_coefs);
    }
    end_timer!(perm_timer);

    // Step 2: compute selector polynomials and commit them.
    let selector_timer = start_timer!(|| "Selector polynomials");
    let mut q_polys = vec![];
    let mut cm_q_vec = vec![];
    for i in 0..cs.num_selectors() {
        let q_evals = cs.selector(i)?;
        let q_coefs = FpPolynomial::ifft_with_domain(&domain, q_evals);
        cm_q_vec.push(commit(q_evals, &q_coefs)?);
        q_polys.push(q_coefs);
    }
    end_timer!(selector_timer);

    // Step 3: compute the Lagrange interpolation constants.
    let lagrange_constants = cs
        .public_vars_constraint_indices()
        .iter()
        .map(|constraint_index| compute_lagrange_constant(&root, n, *constraint_index))
        .collect::<Result<Vec<_>>>()?;

    let verifier_params = PlonkVerifierParams {
        cm_q_vec,
        cm_s_vec,
        k,
        cs_size: n,
        public_vars_constraint_indices: cs.public_vars_constraint_indices().to_vec(),
        lagrange_constants,
    };

    let precompute_timer = start_timer!(|| "Quotient coset evaluations");
    let prover_params = PlonkProverParams::precompute(q_polys, s_polys, verifier_params)?;
    end_timer!(precompute_timer);

    end_timer!(indexer_timer);
    Ok(prover_params)
}

#[cfg(test)]
mod test {
    use crate::errors::PlonkError;
    use crate::plonk::{
        constraint_system::{ConstraintSystem, PlonkCircuit},
        indexer::{choose_ks, indexer, indexer_with_lagrange, PlonkProverParams},
    };
    use crate::poly_commit::kzg_poly_com::KZGCommitmentSchemeBN254;
    use zksok_algebra::{bn254::BN254Scalar, prelude::*, traits::LegendreSymbol};
    use zksok_frontend::{circuits::RangeCircuit, compile, ConstraintForm};

    type F = BN254Scalar;

    #[test]
    fn test_choose_ks() {
        let mut prng = test_rng();
        let m = 8;
        let k = choose_ks::<_, F>(&mut prng, m);
        assert_eq!(k[0], F::one());
        assert!(k.iter().skip(1).all(|x| *x != F::zero()));
        assert!(k
            .iter()
            .skip(1)
            .all(|x| x.legendre() == LegendreSymbol::QuadraticNonResidue));
        for i in 1..m {
            for j in 0..i {
                assert_ne!(k[i], k[j]);
            }
        }
    }

    fn range_circuit() -> PlonkCircuit<F> {
        let compiled = compile::<F, _>(&RangeCircuit { bits: 8 }, ConstraintForm::Sparse).unwrap();
        PlonkCircuit::new(compiled.as_sparse().unwrap()).unwrap()
    }

    #[test]
    fn lagrange_and_monomial_keys_agree() {
        let cs = range_circuit();
        let n = cs.size();
        let tau = F::random(&mut test_rng());
        let pcs = KZGCommitmentSchemeBN254::from_tau(n + 2, &tau);
        let lagrange_pcs = KZGCommitmentSchemeBN254::lagrange_from_tau(n, &tau).unwrap();

        let plain = indexer(&cs, &pcs).unwrap();
        let fast = indexer_with_lagrange(&cs, &pcs, Some(&lagrange_pcs)).unwrap();
        assert_eq!(plain, fast);

        let rebuilt = PlonkProverParams::precompute(
            plain.q_polys.clone(),
            plain.s_polys.clone(),
            plain.verifier_params.clone(),
        )
        .unwrap();
        assert_eq!(rebuilt, plain);
        assert!(plain.verifier_params.check_shape(3, 5).is_ok());
    }

    #[test]
    fn small_srs() {
        let cs = range_circuit();
        let n = cs.size();
        let pcs = KZGCommitmentSchemeBN254::new(n + 1, &mut test_rng());
        assert_eq!(
            indexer(&cs, &pcs),
            Err(PlonkError::SetupSizeExceeded {
                needed: n + 3,
                available: n + 2,
            })
        );
    }
}

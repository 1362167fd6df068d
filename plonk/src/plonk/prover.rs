use crate::errors::{PlonkError, Result};
use crate::plonk::{
    constraint_system::ConstraintSystem,
    helpers::{
        first_lagrange_poly, hide_polynomial, pi_poly, r_poly, split_t_and_commit, t_poly, z_poly,
        PlonkChallenges,
    },
    indexer::{PlonkPK, PlonkPf, PlonkProof, N_T_POLYS},
    transcript::{
        transcript_get_plonk_challenge_alpha, transcript_get_plonk_challenge_beta,
        transcript_get_plonk_challenge_gamma, transcript_get_plonk_challenge_zeta,
        transcript_init_plonk,
    },
};
use crate::poly_commit::{
    field_polynomial::FpPolynomial, pcs::PolyComScheme, transcript::PolyComTranscript,
};
use ark_std::{end_timer, start_timer};
use merlin::Transcript;
use zksok_algebra::prelude::*;

/// PLONK Prover: it produces a proof that `witness` satisfies the constraint system `cs`,
/// Proof verifier must use a transcript with same state as prover and match the public parameters,
/// It returns [PlonkError] if the witness violates a gate, if the prover parameters were not
/// derived from `cs`, or if the parameters of the polynomial commitment scheme `pcs` are too small.
/// # Example
/// ```
/// use zksok_plonk::plonk::{
///     constraint_system::{ConstraintSystem, PlonkCircuit},
///     verifier::verifier,
///     prover::prover,
///     indexer::indexer
/// };
/// use zksok_plonk::poly_commit::kzg_poly_com::KZGCommitmentSchemeBN254;
/// use zksok_frontend::{circuits::CubicCircuit, compile, ConstraintForm};
/// use merlin::Transcript;
/// use rand_chacha::ChaChaRng;
/// use zksok_algebra::{prelude::*, bn254::BN254Scalar};
///
/// let mut prng = ChaChaRng::from_seed([0u8; 32]);
/// let compiled = compile::<BN254Scalar, _>(&CubicCircuit, ConstraintForm::Sparse).unwrap();
/// let cs = PlonkCircuit::new(compiled.as_sparse().unwrap()).unwrap();
/// let witness = compiled.expand(&CubicCircuit::assignment(3, 31)).unwrap();
///
/// let pcs = KZGCommitmentSchemeBN254::new(cs.size() + 2, &mut prng);
/// let prover_params = indexer(&cs, &pcs).unwrap();
///
/// let proof = {
///     let mut transcript = Transcript::new(b"Test");
///     prover(
///         &mut prng,
///         &mut transcript,
///         &pcs,
///         &cs,
///         &prover_params,
///         &witness.full.0,
///     )
///         .unwrap()
/// };
///
/// let mut transcript = Transcript::new(b"Test");
/// assert!(
///     verifier::<_, PlonkCircuit<BN254Scalar>>(
///         &mut transcript,
///         &pcs,
///         &prover_params.get_verifier_params(),
///         &witness.public.0,
///         &proof,
///     ).is_ok()
/// );
/// ```
pub fn prover<
    R: CryptoRng + RngCore,
    PCS: PolyComScheme,
    CS: ConstraintSystem<Field = PCS::Field>,
>(
    prng: &mut R,
    transcript: &mut Transcript,
    pcs: &PCS,
    cs: &CS,
    params: &PlonkPK<PCS>,
    witness: &[PCS::Field],
) -> Result<PlonkPf<PCS>> {
    prover_with_lagrange(prng, transcript, pcs, None, cs, params, witness)
}

fn check_prover_params<PCS: PolyComScheme, CS: ConstraintSystem<Field = PCS::Field>>(
    cs: &CS,
    prover_params: &PlonkPK<PCS>,
) -> Result<()> {
    let vk = &prover_params.verifier_params;
    let n = cs.size();
    let m = cs.quot_eval_dom_size();
    if vk.cs_size != n
        || prover_params.q_polys.len() != cs.num_selectors()
        || prover_params.s_polys.len() != CS::n_wires_per_gate()
        || prover_params.group.len() != n
        || prover_params.coset_quotient.len() != m
        || prover_params.l1_coset_evals.len() != m
        || prover_params.z_h_inv_coset_evals.len() != m
        || prover_params.q_coset_evals.iter().any(|e| e.len() != m)
        || prover_params.s_coset_evals.iter().any(|e| e.len() != m)
        || vk.public_vars_constraint_indices != cs.public_vars_constraint_indices()
    {
        return Err(PlonkError::ProvingKeyMismatch);
    }
    vk.check_shape(CS::n_wires_per_gate(), cs.num_selectors())
        .map_err(|_| PlonkError::ProvingKeyMismatch)
}

/// Prover that uses Lagrange bases
pub fn prover_with_lagrange<
    R: CryptoRng + RngCore,
    PCS: PolyComScheme,
    CS: ConstraintSystem<Field = PCS::Field>,
>(
    prng: &mut R,
    transcript: &mut Transcript,
    pcs: &PCS,
    lagrange_pcs: Option<&PCS>,
    cs: &CS,
    prover_params: &PlonkPK<PCS>,
    w: &[PCS::Field],
) -> Result<PlonkPf<PCS>> {
    check_prover_params::<PCS, CS>(cs, prover_params)?;
    if let Some(index) = cs.first_unsatisfied(w) {
        return Err(PlonkError::InvalidWitness(index));
    }

    let n_constraints = cs.size();
    if pcs.max_degree() < n_constraints + 2 {
        return Err(PlonkError::SetupSizeExceeded {
            needed: n_constraints + 3,
            available: pcs.max_degree() + 1,
        });
    }

    let prover_timer = start_timer!(|| "Plonk::Prover");

    let (domain, root) = prover_params.verifier_params.domain_and_root()?;

    let online_values: Vec<PCS::Field> = cs
        .public_vars_witness_indices()
        .iter()
        .map(|index| w[*index])
        .collect();

    // Init transcript
    transcript_init_plonk(
        transcript,
        &prover_params.verifier_params,
        &online_values,
        &root,
    );
    let mut challenges = PlonkChallenges::new();

    let lagrange_pcs = lagrange_pcs.filter(|l| l.max_degree() + 1 == n_constraints);

    let extended_witness_and_pi_timer =
        start_timer!(|| "Prepare the extended witness and the input");
    let extended_witness = cs.extend_witness(w);
    let pi = pi_poly::<PCS>(prover_params, &online_values, &domain);
    end_timer!(extended_witness_and_pi_timer);

    // commit to `evals` through the Lagrange bases when they fit the domain, then add the
    // blinding terms that `hide_polynomial` put into `coefs`.
    let commit_hidden = |evals: &[PCS::Field],
                         coefs: &FpPolynomial<PCS::Field>,
                         blinds: &[PCS::Field]|
     -> Result<PCS::Commitment> {
        if let Some(lagrange_pcs) = lagrange_pcs {
            let cm = lagrange_pcs.commit(&FpPolynomial::from_coefs(evals.to_vec()))?;
            pcs.apply_blind_factors(&cm, blinds, n_constraints)
        } else {
            pcs.commit(coefs)
        }
    };

    // 1. build witness polynomials, hide them and commit
    let n_wires_per_gate = CS::n_wires_per_gate();
    let mut w_polys = vec![];
    let mut cm_w_vec = vec![];

    let w_timer = start_timer!(|| "Round 1: witness polynomials");
    for i in 0..n_wires_per_gate {
        let f_evals = &extended_witness[i * n_constraints..(i + 1) * n_constraints];
        let mut f_coefs = FpPolynomial::ifft_with_domain(&domain, f_evals);
        let blinds = hide_polynomial(prng, &mut f_coefs, 1, n_constraints);

        let cm_w = commit_hidden(f_evals, &f_coefs, &blinds)?;
        transcript.append_commitment::<PCS::Commitment>(&cm_w);

        w_polys.push(f_coefs);
        cm_w_vec.push(cm_w);
    }
    end_timer!(w_timer);

    // 2. get challenges beta and gamma
    let beta = transcript_get_plonk_challenge_beta(transcript, n_constraints);
    let gamma = transcript_get_plonk_challenge_gamma(transcript, n_constraints);
    challenges.insert_beta_gamma(beta, gamma)?;

    // 3. build the z polynomial, hide it and commit
    let z_timer = start_timer!(|| "Round 2: z polynomial");
    let z_evals = z_poly::<PCS, CS>(cs, prover_params, &extended_witness, &challenges)?;
    let mut z_coefs = FpPolynomial::ifft_with_domain(&domain, &z_evals.coefs);
    let blinds = hide_polynomial(prng, &mut z_coefs, 2, n_constraints);
    let cm_z = commit_hidden(&z_evals.coefs, &z_coefs, &blinds)?;
    transcript.append_commitment::<PCS::Commitment>(&cm_z);
    end_timer!(z_timer);

    // 4. get challenge alpha
    let alpha = transcript_get_plonk_challenge_alpha(transcript, n_constraints);
    challenges.insert_alpha(alpha)?;

    // 5. build t, split into `N_T_POLYS` degree-(N+2) polynomials and commit
    let t_timer = start_timer!(|| "Round 3: t polynomial");
    let t_poly = t_poly::<PCS, CS>(cs, prover_params, &w_polys, &z_coefs, &challenges, &pi)?;
    let (cm_t_vec, t_polys) =
        split_t_and_commit(prng, pcs, &t_poly, N_T_POLYS, n_constraints + 2)?;
    end_timer!(t_timer);

    for cm_t in cm_t_vec.iter() {
        transcript.append_commitment::<PCS::Commitment>(cm_t);
    }

    // 6. get challenge zeta
    let zeta = transcript_get_plonk_challenge_zeta(transcript, n_constraints);
    challenges.insert_zeta(zeta)?;

    // 7. a) Evaluate the openings of witness/permutation polynomials at \zeta, and
    // evaluate the opening of z(X) at point \omega * \zeta.
    let r_timer = start_timer!(|| "Round 4: r polynomial and the openings");
    let w_polys_eval_zeta: Vec<PCS::Field> =
        w_polys.iter().map(|poly| pcs.eval(poly, &zeta)).collect();
    let s_polys_eval_zeta: Vec<PCS::Field> = prover_params
        .s_polys
        .iter()
        .take(n_wires_per_gate - 1)
        .map(|poly| pcs.eval(poly, &zeta))
        .collect();

    let zeta_omega = root.mul(&zeta);
    let z_eval_zeta_omega = pcs.eval(&z_coefs, &zeta_omega);

    for eval_zeta in w_polys_eval_zeta.iter().chain(s_polys_eval_zeta.iter()) {
        transcript.append_field_elem(eval_zeta);
    }
    transcript.append_field_elem(&z_eval_zeta_omega);

    //  b). build the r polynomial
    let w_polys_eval_zeta_as_ref: Vec<&PCS::Field> = w_polys_eval_zeta.iter().collect();
    let s_poly_eval_zeta_as_ref: Vec<&PCS::Field> = s_polys_eval_zeta.iter().collect();

    let (z_h_eval_zeta, first_lagrange_eval_zeta) =
        first_lagrange_poly::<PCS>(&challenges, n_constraints as u64)?;
    let r_poly = r_poly::<PCS, CS>(
        prover_params,
        &z_coefs,
        &w_polys_eval_zeta_as_ref[..],
        &s_poly_eval_zeta_as_ref[..],
        &z_eval_zeta_omega,
        &challenges,
        &t_polys,
        &first_lagrange_eval_zeta,
        &z_h_eval_zeta,
        n_constraints + 2,
    )?;

    // 8. open at \zeta and \zeta\omega
    let polys_to_open: Vec<&FpPolynomial<PCS::Field>> = w_polys
        .iter()
        .chain(prover_params.s_polys.iter().take(n_wires_per_gate - 1))
        .chain(Some(&r_poly))
        .collect();

    let opening_witness_zeta =
        pcs.batch_prove(transcript, &polys_to_open[..], &zeta, n_constraints + 2)?;
    let opening_witness_zeta_omega =
        pcs.batch_prove(transcript, &[&z_coefs], &zeta_omega, n_constraints + 2)?;
    end_timer!(r_timer);

    end_timer!(prover_timer);

    Ok(PlonkProof {
        cm_w_vec,
        cm_t_vec,
        cm_z,
        w_polys_eval_zeta,
        s_polys_eval_zeta,
        z_eval_zeta_omega,
        opening_witness_zeta,
        opening_witness_zeta_omega,
    })
}

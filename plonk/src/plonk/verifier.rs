use crate::errors::{PlonkError, Result};
use crate::plonk::{
    constraint_system::ConstraintSystem,
    helpers::{eval_pi_poly, first_lagrange_poly, r_commitment, r_eval_zeta, PlonkChallenges},
    indexer::{PlonkPf, PlonkVK},
    transcript::{
        transcript_get_plonk_challenge_alpha, transcript_get_plonk_challenge_beta,
        transcript_get_plonk_challenge_gamma, transcript_get_plonk_challenge_u,
        transcript_get_plonk_challenge_zeta, transcript_init_plonk,
    },
};
use crate::poly_commit::{pcs::PolyComScheme, transcript::PolyComTranscript};
use ark_std::{end_timer, start_timer};
use merlin::Transcript;
use zksok_algebra::prelude::*;

/// Verify a proof.
///
/// `CS` only fixes the gate shape; the verifier never sees the circuit itself.
/// Returns [`PlonkError::VerificationKeyMismatch`] if `pi` or the parameters do not fit,
/// [`PlonkError::MalformedProof`] if the proof has the wrong number of elements, and
/// [`PlonkError::VerificationError`] if the proof is rejected.
pub fn verifier<PCS: PolyComScheme, CS: ConstraintSystem<Field = PCS::Field>>(
    transcript: &mut Transcript,
    pcs: &PCS,
    verifier_params: &PlonkVK<PCS>,
    pi: &[PCS::Field],
    proof: &PlonkPf<PCS>,
) -> Result<()> {
    let n_wires_per_gate = CS::n_wires_per_gate();
    verifier_params.check_shape(n_wires_per_gate, verifier_params.cm_q_vec.len())?;
    if pi.len() != verifier_params.public_vars_constraint_indices.len() {
        return Err(PlonkError::VerificationKeyMismatch);
    }
    proof.check_shape(n_wires_per_gate)?;

    let verifier_timer = start_timer!(|| "Plonk::Verifier");

    let (_, root) = verifier_params.domain_and_root()?;
    transcript_init_plonk(transcript, verifier_params, pi, &root);
    let mut challenges = PlonkChallenges::new();

    // 1. compute the challenges gamma, beta, alpha and zeta.
    compute_challenges::<PCS>(&mut challenges, transcript, proof, verifier_params.cs_size)?;

    // 2. compute Z_h(\zeta) and L_1(\zeta).
    let (z_h_eval_zeta, first_lagrange_eval_zeta) =
        first_lagrange_poly::<PCS>(&challenges, verifier_params.cs_size as u64)?;

    // 3. compute PI(\zeta).
    let zeta = *challenges.get_zeta()?;
    let pi_eval_zeta = eval_pi_poly::<PCS>(verifier_params, pi, &z_h_eval_zeta, &zeta, &root)?;

    // 4. derive the linearization polynomial commitment.
    let r_eval_zeta =
        r_eval_zeta::<PCS>(proof, &challenges, &pi_eval_zeta, &first_lagrange_eval_zeta)?;

    let w_polys_eval_zeta_as_ref: Vec<&PCS::Field> = proof.w_polys_eval_zeta.iter().collect();
    let s_eval_zeta_as_ref: Vec<&PCS::Field> = proof.s_polys_eval_zeta.iter().collect();
    let cm_r = r_commitment::<PCS, CS>(
        verifier_params,
        &proof.cm_z,
        &w_polys_eval_zeta_as_ref[..],
        &s_eval_zeta_as_ref[..],
        &proof.z_eval_zeta_omega,
        &challenges,
        &proof.cm_t_vec[..],
        &first_lagrange_eval_zeta,
        &z_h_eval_zeta,
        verifier_params.cs_size + 2,
    )?;

    // 5. verify opening proofs.
    let commitments: Vec<&PCS::Commitment> = proof
        .cm_w_vec
        .iter()
        .chain(verifier_params.cm_s_vec.iter().take(n_wires_per_gate - 1))
        .chain(Some(&cm_r))
        .collect();

    let values: Vec<PCS::Field> = proof
        .w_polys_eval_zeta
        .iter()
        .chain(proof.s_polys_eval_zeta.iter())
        .cloned()
        .chain(Some(r_eval_zeta))
        .collect();

    let zeta_omega = zeta.mul(&root);

    let (comm, val) = pcs.batch(transcript, &commitments[..], &values[..])?;
    let (comm_omega, val_omega) =
        pcs.batch(transcript, &[&proof.cm_z], &[proof.z_eval_zeta_omega])?;

    transcript.append_commitment::<PCS::Commitment>(&proof.opening_witness_zeta);
    transcript.append_commitment::<PCS::Commitment>(&proof.opening_witness_zeta_omega);
    let u: PCS::Field = transcript_get_plonk_challenge_u(transcript, verifier_params.cs_size);
    challenges.insert_u(u)?;

    let res = pcs.batch_verify_diff_points(
        &[comm, comm_omega],
        &[zeta, zeta_omega],
        &[val, val_omega],
        &[
            proof.opening_witness_zeta.clone(),
            proof.opening_witness_zeta_omega.clone(),
        ],
        challenges.get_u()?,
    );
    end_timer!(verifier_timer);
    res
}

fn compute_challenges<PCS: PolyComScheme>(
    challenges: &mut PlonkChallenges<PCS::Field>,
    transcript: &mut Transcript,
    proof: &PlonkPf<PCS>,
    group_order: usize,
) -> Result<()> {
    // 1. compute gamma and beta challenges.
    for cm_w in proof.cm_w_vec.iter() {
        transcript.append_commitment::<PCS::Commitment>(cm_w);
    }
    let beta = transcript_get_plonk_challenge_beta(transcript, group_order);
    let gamma = transcript_get_plonk_challenge_gamma(transcript, group_order);
    challenges.insert_beta_gamma(beta, gamma)?;

    // 2. compute alpha challenge.
    transcript.append_commitment::<PCS::Commitment>(&proof.cm_z);
    let alpha = transcript_get_plonk_challenge_alpha(transcript, group_order);
    challenges.insert_alpha(alpha)?;
    for cm_t in &proof.cm_t_vec {
        transcript.append_commitment::<PCS::Commitment>(cm_t);
    }

    // 3. compute zeta challenge.
    let zeta = transcript_get_plonk_challenge_zeta(transcript, group_order);
    challenges.insert_zeta(zeta)?;
    for eval_zeta in proof
        .w_polys_eval_zeta
        .iter()
        .chain(proof.s_polys_eval_zeta.iter())
    {
        transcript.append_field_elem(eval_zeta);
    }
    transcript.append_field_elem(&proof.z_eval_zeta_omega);
    Ok(())
}

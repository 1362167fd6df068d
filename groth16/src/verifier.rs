use crate::{
    errors::{Groth16Error, Result},
    prover::Groth16Proof,
    setup::Groth16VerifyingKey,
};
use ark_std::{end_timer, start_timer};
use zksok_algebra::prelude::*;

/// Check `e(A, B) = e(alpha, beta) · e(IC, gamma) · e(C, delta)` with one multi-pairing,
/// where `IC` folds the public inputs into the instance commitments.
///
/// Returns [`Groth16Error::VerificationKeyMismatch`] if `public_inputs` has the wrong length
/// and [`Groth16Error::VerificationError`] if the proof is rejected.
pub fn verify<P: Pairing>(
    vk: &Groth16VerifyingKey<P>,
    public_inputs: &[P::ScalarField],
    proof: &Groth16Proof<P>,
) -> Result<()> {
    if vk.gamma_abc_g1.is_empty() || public_inputs.len() != vk.num_public_inputs() {
        return Err(Groth16Error::VerificationKeyMismatch);
    }
    let verifier_time = start_timer!(|| "Groth16::verifier");

    let scalars: Vec<&P::ScalarField> = public_inputs.iter().collect();
    let points: Vec<&P::G1> = vk.gamma_abc_g1[1..].iter().collect();
    let ic = vk.gamma_abc_g1[0].add(&P::G1::multi_exp(&scalars, &points));

    let res = P::product_of_pairings(
        &[proof.a, vk.alpha_g1.neg(), ic.neg(), proof.c.neg()],
        &[proof.b, vk.beta_g2, vk.gamma_g2, vk.delta_g2],
    );
    end_timer!(verifier_time);

    if res == P::Gt::get_identity() {
        Ok(())
    } else {
        Err(Groth16Error::VerificationError)
    }
}

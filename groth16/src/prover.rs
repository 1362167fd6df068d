use crate::{
    encoding::{write_point, PointReader},
    errors::{Groth16Error, Result},
    qap::Qap,
    setup::Groth16ProvingKey,
};
use ark_std::{end_timer, start_timer};
use zksok_algebra::prelude::*;
use zksok_frontend::constraint::R1csSystem;

/// A Groth16 proof: two points of G1 and one of G2.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Groth16Proof<P: Pairing> {
    #[allow(missing_docs)]
    pub a: P::G1,
    #[allow(missing_docs)]
    pub b: P::G2,
    #[allow(missing_docs)]
    pub c: P::G1,
}

impl<P: Pairing> Groth16Proof<P> {
    /// The encoded size: `a`, `b` and `c` compressed, in that order.
    pub fn encoded_len() -> usize {
        2 * P::G1::COMPRESSED_LEN + P::G2::COMPRESSED_LEN
    }

    /// Serialize the three points compressed.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::encoded_len());
        write_point(&mut out, &self.a);
        write_point(&mut out, &self.b);
        write_point(&mut out, &self.c);
        out
    }

    /// Inverse of [`Groth16Proof::to_bytes`]. Any decoding failure is a
    /// [`Groth16Error::MalformedProof`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = PointReader::new(bytes);
        let read = |reader: &mut PointReader<'_>| -> Result<Self> {
            Ok(Groth16Proof {
                a: reader.point()?,
                b: reader.point()?,
                c: reader.point()?,
            })
        };
        let proof = read(&mut reader).map_err(|_| Groth16Error::MalformedProof)?;
        reader.finish().map_err(|_| Groth16Error::MalformedProof)?;
        Ok(proof)
    }
}

/// Prove that `witness` satisfies `r1cs`, drawing the blinding scalars `r`, `s` from `prng`.
pub fn prove<P: Pairing, R: CryptoRng + RngCore>(
    prng: &mut R,
    pk: &Groth16ProvingKey<P>,
    r1cs: &R1csSystem<P::ScalarField>,
    witness: &[P::ScalarField],
) -> Result<Groth16Proof<P>>
where
    P::ScalarField: Domain,
{
    let r = P::ScalarField::random(prng);
    let s = P::ScalarField::random(prng);
    create_proof_with_randomness(pk, r1cs, witness, &r, &s)
}

/// Prove with explicit blinding scalars. Zero `r` and `s` give the unblinded proof.
pub fn create_proof_with_randomness<P: Pairing>(
    pk: &Groth16ProvingKey<P>,
    r1cs: &R1csSystem<P::ScalarField>,
    witness: &[P::ScalarField],
    r: &P::ScalarField,
    s: &P::ScalarField,
) -> Result<Groth16Proof<P>>
where
    P::ScalarField: Domain,
{
    pk.check_shape(r1cs)?;
    if let Some(index) = r1cs.first_unsatisfied(witness) {
        return Err(Groth16Error::InvalidWitness(index));
    }

    let prover_time = start_timer!(|| "Groth16::prover");
    let qap = Qap::new(r1cs)?;
    let h = qap.quotient(witness)?;

    let z: Vec<&P::ScalarField> = witness.iter().collect();
    let z_private: Vec<&P::ScalarField> = qap.private.iter().map(|i| &witness[*i]).collect();
    let h: Vec<&P::ScalarField> = h.iter().collect();

    let msm_time = start_timer!(|| "Groth16::msm");
    let a_query: Vec<&P::G1> = pk.a_query.iter().collect();
    let b_g1_query: Vec<&P::G1> = pk.b_g1_query.iter().collect();
    let b_g2_query: Vec<&P::G2> = pk.b_g2_query.iter().collect();
    let h_query: Vec<&P::G1> = pk.h_query.iter().collect();
    let l_query: Vec<&P::G1> = pk.l_query.iter().collect();

    let a = pk
        .vk
        .alpha_g1
        .add(&P::G1::multi_exp(&z, &a_query))
        .add(&pk.delta_g1.mul(r));
    let b = pk
        .vk
        .beta_g2
        .add(&P::G2::multi_exp(&z, &b_g2_query))
        .add(&pk.vk.delta_g2.mul(s));
    let b_g1 = pk
        .beta_g1
        .add(&P::G1::multi_exp(&z, &b_g1_query))
        .add(&pk.delta_g1.mul(s));
    let c = P::G1::multi_exp(&z_private, &l_query)
        .add(&P::G1::multi_exp(&h, &h_query))
        .add(&a.mul(s))
        .add(&b_g1.mul(r))
        .sub(&pk.delta_g1.mul(&r.mul(s)));
    end_timer!(msm_time);
    end_timer!(prover_time);

    Ok(Groth16Proof { a, b, c })
}

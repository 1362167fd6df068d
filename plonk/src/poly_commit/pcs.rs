use crate::errors::{PlonkError, Result};
use crate::poly_commit::{field_polynomial::FpPolynomial, transcript::PolyComTranscript};
use merlin::Transcript;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use zksok_algebra::prelude::*;

/// The trait for help serialize to bytes,
/// implement by polynomial commitment.
pub trait ToBytes {
    /// Convert to bytes.
    fn to_bytes(&self) -> Vec<u8>;
}

/// The trait for homomorphic polynomial commitment or polynomial.
pub trait HomomorphicPolyComElem: ToBytes + Sized {
    /// This is the scalar field of the polynomial.
    type Scalar;

    /// Add the underlying polynomials.
    fn add(&self, other: &Self) -> Self;

    /// Add assign the underlying polynomials.
    fn add_assign(&mut self, other: &Self);

    /// Subtract the underlying polynomials.
    fn sub(&self, other: &Self) -> Self;

    /// Subtract assign the underlying polynomials.
    fn sub_assign(&mut self, other: &Self);

    /// Multiply underlying polynomial by scalar `exp`.
    fn mul(&self, exp: &Self::Scalar) -> Self;

    /// Multiply assign underlying polynomial by scalar `exp`.
    fn mul_assign(&mut self, exp: &Self::Scalar);
}

/// Trait for polynomial commitment scheme.
pub trait PolyComScheme: Sized {
    /// Type of prime field.
    type Field: Domain;

    /// Type of commitment produces, need to implement `HomomorphicPolyComElem`.
    type Commitment: HomomorphicPolyComElem<Scalar = Self::Field>
        + Debug
        + PartialEq
        + Eq
        + Clone
        + Serialize
        + for<'de> Deserialize<'de>;

    /// Return maximum supported degree.
    fn max_degree(&self) -> usize;

    /// Commit to the polynomial, commitment is binding.
    fn commit(&self, polynomial: &FpPolynomial<Self::Field>) -> Result<Self::Commitment>;

    /// Evaluate the polynomial.
    fn eval(&self, poly: &FpPolynomial<Self::Field>, point: &Self::Field) -> Self::Field;

    /// Add `blinds[i] * (X^{zeroing_degree + i} - X^i)` into a commitment, matching
    /// the blinding of the polynomial behind it.
    fn apply_blind_factors(
        &self,
        commitment: &Self::Commitment,
        blinds: &[Self::Field],
        zeroing_degree: usize,
    ) -> Result<Self::Commitment>;

    /// Compute the witness that `poly(x) = eval`.
    fn prove(
        &self,
        poly: &FpPolynomial<Self::Field>,
        x: &Self::Field,
        max_degree: usize,
    ) -> Result<Self::Commitment>;

    /// Check an opening.
    fn verify(
        &self,
        cm: &Self::Commitment,
        point: &Self::Field,
        eval: &Self::Field,
        proof: &Self::Commitment,
    ) -> Result<()>;

    /// Check several openings at different points with a single pairing product,
    /// weighting the `i`-th opening by `challenge^i`.
    fn batch_verify_diff_points(
        &self,
        cm_vec: &[Self::Commitment],
        point_vec: &[Self::Field],
        eval_vec: &[Self::Field],
        proofs: &[Self::Commitment],
        challenge: &Self::Field,
    ) -> Result<()>;

    /// Keep only what verification needs.
    fn shrink_to_verifier_only(&self) -> Self;

    /// Open several polynomials at the same point with one witness.
    fn batch_prove(
        &self,
        transcript: &mut Transcript,
        polys: &[&FpPolynomial<Self::Field>],
        point: &Self::Field,
        max_degree: usize,
    ) -> Result<Self::Commitment> {
        let challenge: Self::Field = transcript.get_challenge_field_elem(b"PCS Batch Prove");
        let mut combined = FpPolynomial::<Self::Field>::zero();
        let mut factor = Self::Field::one();
        for poly in polys.iter() {
            combined.add_assign(&poly.mul_scalar(&factor));
            factor.mul_assign(&challenge);
        }
        self.prove(&combined, point, max_degree)
    }

    /// The verifier side of [`PolyComScheme::batch_prove`]: combine the commitments and
    /// values with the same challenge.
    fn batch(
        &self,
        transcript: &mut Transcript,
        cm_vec: &[&Self::Commitment],
        eval_vec: &[Self::Field],
    ) -> Result<(Self::Commitment, Self::Field)> {
        if cm_vec.is_empty() || cm_vec.len() != eval_vec.len() {
            return Err(PlonkError::MalformedProof);
        }
        let challenge: Self::Field = transcript.get_challenge_field_elem(b"PCS Batch Prove");

        let mut cm = cm_vec[0].clone();
        let mut eval = eval_vec[0];
        let mut factor = challenge;
        for (cm_i, eval_i) in cm_vec.iter().zip(eval_vec.iter()).skip(1) {
            cm.add_assign(&cm_i.mul(&factor));
            eval.add_assign(&eval_i.mul(&factor));
            factor.mul_assign(&challenge);
        }
        Ok((cm, eval))
    }
}

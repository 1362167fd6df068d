use crate::errors::{PlonkError, Result};
use crate::poly_commit::{
    field_polynomial::FpPolynomial,
    pcs::{HomomorphicPolyComElem, PolyComScheme, ToBytes},
};
use ark_poly::EvaluationDomain;
use zksok_algebra::{
    bn254::{BN254PairingEngine, BN254Scalar, BN254G1},
    prelude::*,
};

/// KZG commitment scheme over the `Group`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq, Default)]
pub struct KZGCommitment<G>(pub G);

impl<G: Group> ToBytes for KZGCommitment<G> {
    fn to_bytes(&self) -> Vec<u8> {
        self.0.to_compressed_bytes()
    }
}

impl HomomorphicPolyComElem for KZGCommitment<BN254G1> {
    type Scalar = BN254Scalar;

    fn add(&self, other: &Self) -> Self {
        KZGCommitment(self.0.add(&other.0))
    }

    fn add_assign(&mut self, other: &Self) {
        self.0.add_assign(&other.0)
    }

    fn sub(&self, other: &Self) -> Self {
        KZGCommitment(self.0.sub(&other.0))
    }

    fn sub_assign(&mut self, other: &Self) {
        self.0.sub_assign(&other.0)
    }

    fn mul(&self, exp: &BN254Scalar) -> Self {
        KZGCommitment(self.0.mul(exp))
    }

    fn mul_assign(&mut self, exp: &BN254Scalar) {
        self.0 = self.0.mul(exp)
    }
}

impl<F: Scalar> ToBytes for FpPolynomial<F> {
    fn to_bytes(&self) -> Vec<u8> {
        self.coefs.iter().flat_map(|c| c.to_bytes()).collect()
    }
}

impl<F: Scalar> HomomorphicPolyComElem for FpPolynomial<F> {
    type Scalar = F;

    fn add(&self, other: &Self) -> Self {
        FpPolynomial::add(self, other)
    }

    fn add_assign(&mut self, other: &Self) {
        FpPolynomial::add_assign(self, other)
    }

    fn sub(&self, other: &Self) -> Self {
        FpPolynomial::sub(self, other)
    }

    fn sub_assign(&mut self, other: &Self) {
        FpPolynomial::sub_assign(self, other)
    }

    fn mul(&self, exp: &F) -> Self {
        self.mul_scalar(exp)
    }

    fn mul_assign(&mut self, exp: &F) {
        self.mul_scalar_assign(exp)
    }
}

/// KZG commitment scheme about `PairingEngine`.
///
/// `public_parameter_group_1` holds `[tau^i]_1` for the monomial basis, or
/// `[L_i(tau)]_1` when built with [`KZGCommitmentScheme::lagrange_from_tau`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KZGCommitmentScheme<P: Pairing> {
    /// public parameter about G1.
    pub public_parameter_group_1: Vec<P::G1>,
    /// public parameter about G2: `[1]_2` and `[tau]_2`.
    pub public_parameter_group_2: Vec<P::G2>,
}

impl<P: Pairing> KZGCommitmentScheme<P> {
    /// Create a new instance of a KZG polynomial commitment scheme with a fresh
    /// secret drawn from `prng`.
    /// `max_degree` - max degree of the polynomial,
    /// `prng` - pseudo-random generator.
    pub fn new<R: CryptoRng + RngCore>(max_degree: usize, prng: &mut R) -> KZGCommitmentScheme<P> {
        let tau = P::ScalarField::random(prng);
        Self::from_tau(max_degree, &tau)
    }

    /// The monomial-basis parameters for a known secret.
    pub fn from_tau(max_degree: usize, tau: &P::ScalarField) -> KZGCommitmentScheme<P> {
        let mut powers = Vec::with_capacity(max_degree + 1);
        let mut cur = P::ScalarField::one();
        for _ in 0..=max_degree {
            powers.push(cur);
            cur.mul_assign(tau);
        }
        let public_parameter_group_1 = P::G1::batch_mul(&P::G1::get_base(), &powers);

        let elem_g2 = P::G2::get_base();
        KZGCommitmentScheme {
            public_parameter_group_1,
            public_parameter_group_2: vec![elem_g2, elem_g2.mul(tau)],
        }
    }

    /// Serialize the parameters with compressed points, each group prefixed
    /// by its length as a little-endian u32.
    pub fn to_compressed_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = vec![];
        let len_1 = u32::try_from(self.public_parameter_group_1.len())
            .map_err(|_| AlgebraError::SerializationError)?;
        let len_2 = u32::try_from(self.public_parameter_group_2.len())
            .map_err(|_| AlgebraError::SerializationError)?;

        bytes.extend(len_1.to_le_bytes());
        for i in &self.public_parameter_group_1 {
            bytes.extend(i.to_compressed_bytes());
        }
        bytes.extend(len_2.to_le_bytes());
        for i in &self.public_parameter_group_2 {
            bytes.extend(i.to_compressed_bytes());
        }
        Ok(bytes)
    }

    /// Deserialize the parameters from [`KZGCommitmentScheme::to_compressed_bytes`],
    /// returning the unread tail.
    pub fn from_compressed_bytes(bytes: &[u8]) -> Result<(Self, &[u8])> {
        let (p1, rest) = read_points::<P::G1>(bytes)?;
        let (p2, rest) = read_points::<P::G2>(rest)?;
        if p1.is_empty() || p2.len() != 2 {
            return Err(AlgebraError::DeserializationError.into());
        }
        Ok((
            Self {
                public_parameter_group_1: p1,
                public_parameter_group_2: p2,
            },
            rest,
        ))
    }
}

fn read_points<G: Group>(bytes: &[u8]) -> Result<(Vec<G>, &[u8])> {
    if bytes.len() < 4 {
        return Err(AlgebraError::DeserializationError.into());
    }
    let len = u8_le_slice_to_u32(&bytes[0..4]) as usize;
    let body = &bytes[4..];
    let size = len
        .checked_mul(G::COMPRESSED_LEN)
        .filter(|size| *size <= body.len())
        .ok_or(AlgebraError::DeserializationError)?;

    let points = body[..size]
        .chunks(G::COMPRESSED_LEN)
        .map(G::from_compressed_bytes)
        .collect::<core::result::Result<Vec<G>, AlgebraError>>()?;
    Ok((points, &body[size..]))
}

impl<P: Pairing> KZGCommitmentScheme<P>
where
    P::ScalarField: Domain,
{
    /// The Lagrange-basis parameters `[L_i(tau)]_1` over the subgroup of size `n`,
    /// so that committing to evaluations equals committing to the interpolated polynomial.
    pub fn lagrange_from_tau(n: usize, tau: &P::ScalarField) -> Result<KZGCommitmentScheme<P>> {
        let domain = FpPolynomial::<P::ScalarField>::evaluation_domain(n)
            .ok_or(PlonkError::GroupNotFound(n))?;
        let lagrange: Vec<P::ScalarField> = domain
            .evaluate_all_lagrange_coefficients(tau.get_field())
            .into_iter()
            .map(P::ScalarField::from_field)
            .collect();
        let public_parameter_group_1 = P::G1::batch_mul(&P::G1::get_base(), &lagrange);

        let elem_g2 = P::G2::get_base();
        Ok(KZGCommitmentScheme {
            public_parameter_group_1,
            public_parameter_group_2: vec![elem_g2, elem_g2.mul(tau)],
        })
    }
}

/// KZG commitment scheme over the BN254 curve
pub type KZGCommitmentSchemeBN254 = KZGCommitmentScheme<BN254PairingEngine>;

impl PolyComScheme for KZGCommitmentSchemeBN254 {
    type Field = BN254Scalar;
    type Commitment = KZGCommitment<BN254G1>;

    fn max_degree(&self) -> usize {
        self.public_parameter_group_1.len().saturating_sub(1)
    }

    fn commit(&self, polynomial: &FpPolynomial<BN254Scalar>) -> Result<Self::Commitment> {
        let coefs = polynomial.get_coefs_ref();
        if coefs.len() > self.public_parameter_group_1.len() {
            return Err(PlonkError::DegreeError);
        }

        let coefs_ref: Vec<&BN254Scalar> = coefs.iter().collect();
        let pub_param_group_1_as_ref: Vec<&BN254G1> = self.public_parameter_group_1
            [0..coefs.len()]
            .iter()
            .collect();

        Ok(KZGCommitment(BN254G1::multi_exp(
            &coefs_ref[..],
            &pub_param_group_1_as_ref[..],
        )))
    }

    fn eval(&self, poly: &FpPolynomial<Self::Field>, point: &Self::Field) -> Self::Field {
        poly.eval(point)
    }

    fn apply_blind_factors(
        &self,
        commitment: &Self::Commitment,
        blinds: &[Self::Field],
        zeroing_degree: usize,
    ) -> Result<Self::Commitment> {
        if zeroing_degree + blinds.len() > self.public_parameter_group_1.len() {
            return Err(PlonkError::DegreeError);
        }
        let mut commitment = commitment.0;
        for (i, blind) in blinds.iter().enumerate() {
            commitment = commitment + &(self.public_parameter_group_1[i] * blind);
            commitment =
                commitment - &(self.public_parameter_group_1[zeroing_degree + i] * blind);
        }
        Ok(KZGCommitment(commitment))
    }

    fn prove(
        &self,
        poly: &FpPolynomial<Self::Field>,
        x: &Self::Field,
        max_degree: usize,
    ) -> Result<Self::Commitment> {
        if poly.degree() > max_degree {
            return Err(PlonkError::DegreeError);
        }

        // (P(X) - P(x)) / (X - x)
        let (q_poly, _) = poly.divide_by_linear(x);
        self.commit(&q_poly)
    }

    fn verify(
        &self,
        cm: &Self::Commitment,
        point: &Self::Field,
        eval: &Self::Field,
        proof: &Self::Commitment,
    ) -> Result<()> {
        self.batch_verify_diff_points(
            &[*cm],
            &[*point],
            &[*eval],
            &[*proof],
            &BN254Scalar::one(),
        )
    }

    fn batch_verify_diff_points(
        &self,
        cm_vec: &[Self::Commitment],
        point_vec: &[Self::Field],
        eval_vec: &[Self::Field],
        proofs: &[Self::Commitment],
        challenge: &Self::Field,
    ) -> Result<()> {
        if proofs.is_empty()
            || proofs.len() != point_vec.len()
            || proofs.len() != eval_vec.len()
            || proofs.len() != cm_vec.len()
        {
            return Err(PlonkError::MalformedProof);
        }
        if self.public_parameter_group_1.is_empty() || self.public_parameter_group_2.len() < 2 {
            return Err(PlonkError::VerificationKeyMismatch);
        }

        let g1_0 = self.public_parameter_group_1[0];
        let g2_0 = self.public_parameter_group_2[0];
        let g2_1 = self.public_parameter_group_2[1];

        // sum_i u^i W_i
        let mut left_first = BN254G1::get_identity();
        // sum_i u^i (x_i W_i + C_i - y_i G)
        let mut right_first = BN254G1::get_identity();
        let mut right_first_val = BN254Scalar::zero();

        let mut cur_challenge = BN254Scalar::one();
        for i in 0..proofs.len() {
            let new_comm = proofs[i].0.mul(&cur_challenge);

            left_first.add_assign(&new_comm);
            right_first.add_assign(&new_comm.mul(&point_vec[i]));
            right_first.add_assign(&cm_vec[i].0.mul(&cur_challenge));
            right_first_val.add_assign(&eval_vec[i].mul(&cur_challenge));

            cur_challenge.mul_assign(challenge);
        }
        right_first.sub_assign(&g1_0.mul(&right_first_val));

        let pairing_eval = BN254PairingEngine::product_of_pairings(
            &[left_first, right_first.neg()],
            &[g2_1, g2_0],
        );

        if pairing_eval == <BN254PairingEngine as Pairing>::Gt::get_identity() {
            Ok(())
        } else {
            Err(PlonkError::VerificationError)
        }
    }

    fn shrink_to_verifier_only(&self) -> Self {
        Self {
            public_parameter_group_1: self.public_parameter_group_1.iter().take(1).copied().collect(),
            public_parameter_group_2: self.public_parameter_group_2.iter().take(2).copied().collect(),
        }
    }
}

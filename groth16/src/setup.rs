use crate::{
    encoding::{write_point, write_points, PointReader},
    errors::{Groth16Error, Result},
    qap::Qap,
};
use ark_std::{end_timer, start_timer};
use zksok_algebra::prelude::*;
use zksok_frontend::constraint::R1csSystem;

/// The trapdoor of a circuit-specific setup. Whoever knows it can forge proofs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToxicWaste<F> {
    /// the evaluation point of the QAP polynomials
    pub tau: F,
    #[allow(missing_docs)]
    pub alpha: F,
    #[allow(missing_docs)]
    pub beta: F,
    /// hides the instance part of the key
    pub gamma: F,
    /// hides the witness part of the key
    pub delta: F,
}

impl<F: Scalar> ToxicWaste<F> {
    /// Sample a fresh trapdoor.
    pub fn sample<R: CryptoRng + RngCore>(prng: &mut R) -> Self {
        ToxicWaste {
            tau: F::random(prng),
            alpha: F::random(prng),
            beta: F::random(prng),
            gamma: F::random(prng),
            delta: F::random(prng),
        }
    }
}

/// The verifying key.
#[derive(Debug)]
pub struct Groth16VerifyingKey<P: Pairing> {
    /// `[alpha]_1`
    pub alpha_g1: P::G1,
    /// `[beta]_2`
    pub beta_g2: P::G2,
    /// `[gamma]_2`
    pub gamma_g2: P::G2,
    /// `[delta]_2`
    pub delta_g2: P::G2,
    /// `[(beta·u_i + alpha·v_i + w_i) / gamma]_1` for the constant one and each public input.
    pub gamma_abc_g1: Vec<P::G1>,
}

impl<P: Pairing> Clone for Groth16VerifyingKey<P> {
    fn clone(&self) -> Self {
        Groth16VerifyingKey {
            alpha_g1: self.alpha_g1.clone(),
            beta_g2: self.beta_g2.clone(),
            gamma_g2: self.gamma_g2.clone(),
            delta_g2: self.delta_g2.clone(),
            gamma_abc_g1: self.gamma_abc_g1.clone(),
        }
    }
}

impl<P: Pairing> PartialEq for Groth16VerifyingKey<P> {
    fn eq(&self, other: &Self) -> bool {
        self.alpha_g1 == other.alpha_g1
            && self.beta_g2 == other.beta_g2
            && self.gamma_g2 == other.gamma_g2
            && self.delta_g2 == other.delta_g2
            && self.gamma_abc_g1 == other.gamma_abc_g1
    }
}

impl<P: Pairing> Eq for Groth16VerifyingKey<P> {}

/// The proving key. It embeds the verifying key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Groth16ProvingKey<P: Pairing> {
    #[allow(missing_docs)]
    pub vk: Groth16VerifyingKey<P>,
    /// `[beta]_1`
    pub beta_g1: P::G1,
    /// `[delta]_1`
    pub delta_g1: P::G1,
    /// `[u_i]_1` for every variable
    pub a_query: Vec<P::G1>,
    /// `[v_i]_1` for every variable
    pub b_g1_query: Vec<P::G1>,
    /// `[v_i]_2` for every variable
    pub b_g2_query: Vec<P::G2>,
    /// `[tau^i · Z(tau) / delta]_1` for `i < d - 1`
    pub h_query: Vec<P::G1>,
    /// `[(beta·u_i + alpha·v_i + w_i) / delta]_1` for the private variables
    pub l_query: Vec<P::G1>,
}

/// Compute the keys of `r1cs` under the trapdoor `toxic`.
pub fn generate_parameters<P: Pairing>(
    r1cs: &R1csSystem<P::ScalarField>,
    toxic: &ToxicWaste<P::ScalarField>,
) -> Result<(Groth16ProvingKey<P>, Groth16VerifyingKey<P>)>
where
    P::ScalarField: Domain,
{
    let setup_time = start_timer!(|| "Groth16::setup");
    let qap = Qap::new(r1cs)?;
    let evals = qap.evaluate_at(&toxic.tau)?;

    let gamma_inv = toxic
        .gamma
        .inv()
        .map_err(|_| Groth16Error::DegenerateToxicWaste)?;
    let delta_inv = toxic
        .delta
        .inv()
        .map_err(|_| Groth16Error::DegenerateToxicWaste)?;

    let g1 = P::G1::get_base();
    let g2 = P::G2::get_base();

    let abc = |i: usize| {
        toxic
            .beta
            .mul(&evals.u[i])
            .add(&toxic.alpha.mul(&evals.v[i]))
            .add(&evals.w[i])
    };
    let gamma_abc: Vec<P::ScalarField> = qap
        .instance
        .iter()
        .map(|i| abc(*i).mul(&gamma_inv))
        .collect();
    let l: Vec<P::ScalarField> = qap
        .private
        .iter()
        .map(|i| abc(*i).mul(&delta_inv))
        .collect();

    let z_over_delta = evals.z_tau.mul(&delta_inv);
    let mut h = Vec::with_capacity(qap.size() - 1);
    let mut power = z_over_delta;
    for _ in 0..qap.size() - 1 {
        h.push(power);
        power.mul_assign(&toxic.tau);
    }

    let vk = Groth16VerifyingKey {
        alpha_g1: g1.mul(&toxic.alpha),
        beta_g2: g2.mul(&toxic.beta),
        gamma_g2: g2.mul(&toxic.gamma),
        delta_g2: g2.mul(&toxic.delta),
        gamma_abc_g1: P::G1::batch_mul(&g1, &gamma_abc),
    };
    let pk = Groth16ProvingKey {
        vk: vk.clone(),
        beta_g1: g1.mul(&toxic.beta),
        delta_g1: g1.mul(&toxic.delta),
        a_query: P::G1::batch_mul(&g1, &evals.u),
        b_g1_query: P::G1::batch_mul(&g1, &evals.v),
        b_g2_query: P::G2::batch_mul(&g2, &evals.v),
        h_query: P::G1::batch_mul(&g1, &h),
        l_query: P::G1::batch_mul(&g1, &l),
    };
    end_timer!(setup_time);
    Ok((pk, vk))
}

impl<P: Pairing> Groth16VerifyingKey<P> {
    /// The number of public inputs, without the constant one.
    pub fn num_public_inputs(&self) -> usize {
        self.gamma_abc_g1.len().saturating_sub(1)
    }

    /// Serialize with compressed points; the only sequence is length-prefixed.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = vec![];
        write_point(&mut out, &self.alpha_g1);
        write_point(&mut out, &self.beta_g2);
        write_point(&mut out, &self.gamma_g2);
        write_point(&mut out, &self.delta_g2);
        write_points(&mut out, &self.gamma_abc_g1)?;
        Ok(out)
    }

    /// Inverse of [`Groth16VerifyingKey::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = PointReader::new(bytes);
        let vk = Self::read(&mut reader)?;
        reader.finish()?;
        Ok(vk)
    }

    fn read(reader: &mut PointReader<'_>) -> Result<Self> {
        let vk = Groth16VerifyingKey {
            alpha_g1: reader.point()?,
            beta_g2: reader.point()?,
            gamma_g2: reader.point()?,
            delta_g2: reader.point()?,
            gamma_abc_g1: reader.points()?,
        };
        if vk.gamma_abc_g1.is_empty() {
            return Err(AlgebraError::DeserializationError.into());
        }
        Ok(vk)
    }
}

impl<P: Pairing> Groth16ProvingKey<P> {
    /// Serialize the embedded verifying key followed by the queries.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = self.vk.to_bytes()?;
        write_point(&mut out, &self.beta_g1);
        write_point(&mut out, &self.delta_g1);
        write_points(&mut out, &self.a_query)?;
        write_points(&mut out, &self.b_g1_query)?;
        write_points(&mut out, &self.b_g2_query)?;
        write_points(&mut out, &self.h_query)?;
        write_points(&mut out, &self.l_query)?;
        Ok(out)
    }

    /// Inverse of [`Groth16ProvingKey::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = PointReader::new(bytes);
        let pk = Groth16ProvingKey {
            vk: Groth16VerifyingKey::read(&mut reader)?,
            beta_g1: reader.point()?,
            delta_g1: reader.point()?,
            a_query: reader.points()?,
            b_g1_query: reader.points()?,
            b_g2_query: reader.points()?,
            h_query: reader.points()?,
            l_query: reader.points()?,
        };
        reader.finish()?;
        Ok(pk)
    }

    /// Check that the key was generated for `r1cs`.
    pub fn check_shape(&self, r1cs: &R1csSystem<P::ScalarField>) -> Result<()> {
        let num_vars = r1cs.num_vars();
        let num_instance = r1cs.instance_indices().len();
        let d = crate::qap::domain_size(r1cs);
        if self.a_query.len() != num_vars
            || self.b_g1_query.len() != num_vars
            || self.b_g2_query.len() != num_vars
            || self.vk.gamma_abc_g1.len() != num_instance
            || self.l_query.len() + num_instance != num_vars
            || self.h_query.len() + 1 != d
        {
            return Err(Groth16Error::ProvingKeyMismatch);
        }
        Ok(())
    }
}

/// Keys of one circuit, obtained either from a simulated trapdoor or from a ceremony.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Groth16Setup<P: Pairing> {
    #[allow(missing_docs)]
    pub pk: Groth16ProvingKey<P>,
    #[allow(missing_docs)]
    pub vk: Groth16VerifyingKey<P>,
}

impl<P: Pairing> Groth16Setup<P>
where
    P::ScalarField: Domain,
{
    /// Sample the trapdoor from `prng` and forget it. The result is only as secret as the rng,
    /// so this is for tests and local experiments.
    #[cfg(any(test, feature = "unsafe-setup"))]
    pub fn unsafe_setup<R: CryptoRng + RngCore>(
        r1cs: &R1csSystem<P::ScalarField>,
        prng: &mut R,
    ) -> Result<Self> {
        let toxic = ToxicWaste::sample(prng);
        let (pk, vk) = generate_parameters::<P>(r1cs, &toxic)?;
        Ok(Groth16Setup { pk, vk })
    }

    /// Load the output of a trusted ceremony.
    pub fn from_trusted_bytes(pk: &[u8], vk: &[u8]) -> Result<Self> {
        let pk = Groth16ProvingKey::<P>::from_bytes(pk)?;
        let vk = Groth16VerifyingKey::<P>::from_bytes(vk)?;
        if pk.vk != vk {
            return Err(Groth16Error::VerificationKeyMismatch);
        }
        Ok(Groth16Setup { pk, vk })
    }
}

#[cfg(test)]
mod tests {
    use super::{generate_parameters, Groth16Setup, ToxicWaste};
    use crate::errors::Groth16Error;
    use rand_chacha::ChaChaRng;
    use zksok_algebra::{
        bn254::{BN254PairingEngine, BN254Scalar},
        prelude::*,
    };
    use zksok_frontend::{circuits::CubicCircuit, compile, ConstraintForm};

    type P = BN254PairingEngine;
    type F = BN254Scalar;

    #[test]
    fn setup_is_deterministic() {
        let cs = compile::<F, _>(&CubicCircuit, ConstraintForm::R1cs).unwrap();
        let r1cs = cs.as_r1cs().unwrap();
        let a = Groth16Setup::<P>::unsafe_setup(r1cs, &mut ChaChaRng::from_seed([7u8; 32])).unwrap();
        let b = Groth16Setup::<P>::unsafe_setup(r1cs, &mut ChaChaRng::from_seed([7u8; 32])).unwrap();
        assert_eq!(a.pk.to_bytes().unwrap(), b.pk.to_bytes().unwrap());
        assert_eq!(a.vk.to_bytes().unwrap(), b.vk.to_bytes().unwrap());
        assert_eq!(a.vk.num_public_inputs(), 1);
        assert!(a.pk.check_shape(r1cs).is_ok());
    }

    #[test]
    fn trusted_bytes_round_trip() {
        let cs = compile::<F, _>(&CubicCircuit, ConstraintForm::R1cs).unwrap();
        let r1cs = cs.as_r1cs().unwrap();
        let setup =
            Groth16Setup::<P>::unsafe_setup(r1cs, &mut ChaChaRng::from_seed([1u8; 32])).unwrap();
        let pk = setup.pk.to_bytes().unwrap();
        let vk = setup.vk.to_bytes().unwrap();

        assert_eq!(Groth16Setup::<P>::from_trusted_bytes(&pk, &vk).unwrap(), setup);
        assert!(Groth16Setup::<P>::from_trusted_bytes(&pk[..pk.len() - 1], &vk).is_err());

        let other =
            Groth16Setup::<P>::unsafe_setup(r1cs, &mut ChaChaRng::from_seed([2u8; 32])).unwrap();
        assert_eq!(
            Groth16Setup::<P>::from_trusted_bytes(&pk, &other.vk.to_bytes().unwrap()),
            Err(Groth16Error::VerificationKeyMismatch)
        );
    }

    #[test]
    fn degenerate_trapdoor() {
        let cs = compile::<F, _>(&CubicCircuit, ConstraintForm::R1cs).unwrap();
        let r1cs = cs.as_r1cs().unwrap();
        let mut toxic = ToxicWaste::<F>::sample(&mut test_rng());
        toxic.delta = F::zero();
        assert_eq!(
            generate_parameters::<P>(r1cs, &toxic).unwrap_err(),
            Groth16Error::DegenerateToxicWaste
        );

        let mut toxic = ToxicWaste::<F>::sample(&mut test_rng());
        toxic.tau = F::one();
        assert_eq!(
            generate_parameters::<P>(r1cs, &toxic).unwrap_err(),
            Groth16Error::DegenerateToxicWaste
        );
    }
}

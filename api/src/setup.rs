//! Setup material for both backends.
//!
//! PLONK keys come from a universal [`Srs`] through [`plonk_setup`]; Groth16 keys are bound
//! to one circuit. Either kind is produced by a simulated trapdoor (only with the
//! `unsafe-setup` feature) or loaded from a ceremony's output, and both paths end in the
//! same [`SetupMaterial`].
use crate::{
    errors::{Result, ZkError},
    serialization::CanonicalDecode,
};
use zksok_algebra::{
    bn254::{BN254PairingEngine, BN254Scalar, BN254G1},
    prelude::*,
};
use zksok_frontend::ConstraintSystem;
use zksok_groth16::{Groth16ProvingKey, Groth16Setup, Groth16VerifyingKey};
use zksok_plonk::{
    plonk::{
        constraint_system::{padded_size, ConstraintSystem as _, PlonkCircuit},
        indexer::{indexer_with_lagrange, PlonkPK, PlonkVK},
    },
    poly_commit::{kzg_poly_com::KZGCommitmentSchemeBN254, pcs::PolyComScheme},
};

/// The commitment scheme behind the PLONK backend.
pub type Kzg = KZGCommitmentSchemeBN254;

/// The number of G1 powers beyond the domain size: the blinded quotient chunks have
/// degree `n + 2`.
pub const SRS_EXTRA_POWERS: usize = 3;

/// A universal structured reference string: the KZG powers of tau and the
/// commitments to the Lagrange basis of one power-of-two domain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Srs {
    pub(crate) kzg: Kzg,
    pub(crate) lagrange: Kzg,
}

impl Srs {
    /// The number of G1 powers and of Lagrange points needed by `cs`.
    ///
    /// The powers cover `next_pow2(max(constraints, variables))`, never less than the
    /// padded PLONK domain, plus [`SRS_EXTRA_POWERS`].
    pub fn size_for(cs: &ConstraintSystem<BN254Scalar>) -> (usize, usize) {
        let domain = padded_size(cs.num_constraints());
        (
            cs.bounding_size().max(domain) + SRS_EXTRA_POWERS,
            domain,
        )
    }

    /// Simulate a ceremony by sampling tau from `prng`. Whoever controls the rng can forge
    /// proofs, so this never leaves test tooling.
    #[cfg(any(test, feature = "unsafe-setup"))]
    pub fn unsafe_for<R: CryptoRng + RngCore>(
        cs: &ConstraintSystem<BN254Scalar>,
        prng: &mut R,
    ) -> Result<Srs> {
        let (powers, lagrange_size) = Self::size_for(cs);
        let tau = BN254Scalar::random(prng);
        Ok(Srs {
            kzg: Kzg::from_tau(powers - 1, &tau),
            lagrange: Kzg::lagrange_from_tau(lagrange_size, &tau)?,
        })
    }

    /// Load the output of a trusted ceremony, as written by
    /// [`crate::serialization::CanonicalEncode`].
    pub fn from_trusted_bytes(bytes: &[u8]) -> Result<Srs> {
        Srs::from_canonical_bytes(bytes)
    }

    /// Assemble an SRS from its two halves. The Lagrange points must sum to `[1]_1` and
    /// share the G2 part of the powers.
    pub fn from_parts(kzg: Kzg, lagrange: Kzg) -> Result<Srs> {
        let sum = lagrange
            .public_parameter_group_1
            .iter()
            .fold(BN254G1::get_identity(), |acc, p| acc.add(p));
        if kzg.public_parameter_group_1.first() != Some(&sum)
            || kzg.public_parameter_group_2 != lagrange.public_parameter_group_2
        {
            return Err(ZkError::DeserializationError);
        }
        Ok(Srs { kzg, lagrange })
    }

    /// The powers of tau in G1 and G2.
    pub fn kzg(&self) -> &Kzg {
        &self.kzg
    }

    /// The Lagrange-basis commitments.
    pub fn lagrange(&self) -> &Kzg {
        &self.lagrange
    }

    /// The largest polynomial degree the SRS can commit to.
    pub fn max_degree(&self) -> usize {
        self.kzg.max_degree()
    }
}

/// Everything the PLONK prover needs besides the circuit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlonkProverKey {
    /// the powers of tau, cut to the circuit size
    pub kzg: Kzg,
    /// the Lagrange commitments, when they match the circuit domain
    pub lagrange: Option<Kzg>,
    #[allow(missing_docs)]
    pub params: PlonkPK<Kzg>,
}

/// Everything the PLONK verifier needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlonkVerifierKey {
    /// `[1]_1`, `[1]_2` and `[tau]_2`
    pub kzg: Kzg,
    #[allow(missing_docs)]
    pub params: PlonkVK<Kzg>,
}

/// A proving key of either backend.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ProvingKey {
    Groth16(Groth16ProvingKey<BN254PairingEngine>),
    Plonk(PlonkProverKey),
}

/// A verifying key of either backend.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum VerifyingKey {
    Groth16(Groth16VerifyingKey<BN254PairingEngine>),
    Plonk(PlonkVerifierKey),
}

impl VerifyingKey {
    /// The number of public inputs the key expects.
    pub fn num_public_inputs(&self) -> usize {
        match self {
            VerifyingKey::Groth16(vk) => vk.num_public_inputs(),
            VerifyingKey::Plonk(vk) => vk.params.public_vars_constraint_indices.len(),
        }
    }
}

/// A key pair bound to one constraint system.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct SetupMaterial {
    pub pk: ProvingKey,
    pub vk: VerifyingKey,
}

/// Setup material produced outside this process.
#[derive(Copy, Clone, Debug)]
pub enum TrustedSetup<'a> {
    /// A universal SRS, for circuits compiled to the sparse form.
    Srs(&'a Srs),
    /// Encoded Groth16 keys, for circuits compiled to the rank-1 form.
    Groth16 {
        #[allow(missing_docs)]
        pk: &'a [u8],
        #[allow(missing_docs)]
        vk: &'a [u8],
    },
}

/// Derive the PLONK keys of `cs` from `srs`.
pub fn plonk_setup(
    cs: &ConstraintSystem<BN254Scalar>,
    srs: &Srs,
) -> Result<(PlonkProverKey, PlonkVerifierKey)> {
    let sparse = cs.as_sparse().ok_or_else(|| {
        ZkError::MalformedCircuit("the PLONK backend needs the sparse form".into())
    })?;
    let circuit = PlonkCircuit::new(sparse)?;
    let params = indexer_with_lagrange(&circuit, &srs.kzg, Some(&srs.lagrange))?;

    let needed = circuit.size() + SRS_EXTRA_POWERS;
    let kzg = Kzg {
        public_parameter_group_1: srs.kzg.public_parameter_group_1[..needed].to_vec(),
        public_parameter_group_2: srs.kzg.public_parameter_group_2.clone(),
    };
    let lagrange = if srs.lagrange.public_parameter_group_1.len() == circuit.size() {
        Some(srs.lagrange.clone())
    } else {
        None
    };

    let vk = PlonkVerifierKey {
        kzg: srs.kzg.shrink_to_verifier_only(),
        params: params.get_verifier_params_ref().clone(),
    };
    Ok((
        PlonkProverKey {
            kzg,
            lagrange,
            params,
        },
        vk,
    ))
}

/// Bind setup material from a ceremony to `cs`.
pub fn trusted_setup(
    cs: &ConstraintSystem<BN254Scalar>,
    source: TrustedSetup<'_>,
) -> Result<SetupMaterial> {
    match (cs, source) {
        (ConstraintSystem::Sparse(_), TrustedSetup::Srs(srs)) => {
            let (pk, vk) = plonk_setup(cs, srs)?;
            Ok(SetupMaterial {
                pk: ProvingKey::Plonk(pk),
                vk: VerifyingKey::Plonk(vk),
            })
        }
        (ConstraintSystem::R1cs(r1cs), TrustedSetup::Groth16 { pk, vk }) => {
            let setup = Groth16Setup::<BN254PairingEngine>::from_trusted_bytes(pk, vk)?;
            setup.pk.check_shape(r1cs)?;
            Ok(SetupMaterial {
                pk: ProvingKey::Groth16(setup.pk),
                vk: VerifyingKey::Groth16(setup.vk),
            })
        }
        (ConstraintSystem::Sparse(_), _) => Err(ZkError::MalformedCircuit(
            "a sparse system needs a universal SRS".into(),
        )),
        (ConstraintSystem::R1cs(_), _) => Err(ZkError::MalformedCircuit(
            "a rank-1 system needs Groth16 keys".into(),
        )),
    }
}

/// Sample setup material for `cs` from `prng`: an SRS for the sparse form, a Groth16
/// trapdoor for the rank-1 form.
#[cfg(any(test, feature = "unsafe-setup"))]
pub fn unsafe_setup<R: CryptoRng + RngCore>(
    cs: &ConstraintSystem<BN254Scalar>,
    prng: &mut R,
) -> Result<SetupMaterial> {
    match cs {
        ConstraintSystem::Sparse(_) => {
            let srs = Srs::unsafe_for(cs, prng)?;
            trusted_setup(cs, TrustedSetup::Srs(&srs))
        }
        ConstraintSystem::R1cs(r1cs) => {
            let setup = Groth16Setup::<BN254PairingEngine>::unsafe_setup(r1cs, prng)?;
            Ok(SetupMaterial {
                pk: ProvingKey::Groth16(setup.pk),
                vk: VerifyingKey::Groth16(setup.vk),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{plonk_setup, trusted_setup, unsafe_setup, Kzg, Srs, TrustedSetup};
    use crate::{errors::ZkError, serialization::CanonicalEncode, setup::VerifyingKey};
    use rand_chacha::ChaChaRng;
    use zksok_algebra::{
        bn254::{BN254PairingEngine, BN254Scalar},
        prelude::*,
    };
    use zksok_frontend::{
        circuits::{CubicCircuit, RangeCircuit},
        compile, ConstraintForm,
    };
    use zksok_groth16::Groth16Setup;
    use zksok_plonk::poly_commit::pcs::PolyComScheme;

    type F = BN254Scalar;

    #[test]
    fn srs_covers_the_circuit() {
        let cs = compile::<F, _>(&RangeCircuit { bits: 32 }, ConstraintForm::Sparse).unwrap();
        let srs = Srs::unsafe_for(&cs, &mut test_rng()).unwrap();
        let (powers, lagrange) = Srs::size_for(&cs);
        assert!(lagrange.is_power_of_two());
        assert_eq!(srs.max_degree() + 1, powers);
        assert_eq!(srs.lagrange().public_parameter_group_1.len(), lagrange);

        let (pk, vk) = plonk_setup(&cs, &srs).unwrap();
        assert!(pk.lagrange.is_some());
        assert_eq!(pk.kzg.max_degree(), pk.params.verifier_params.cs_size + 2);
        assert_eq!(vk.kzg.public_parameter_group_1.len(), 1);
        assert!(Srs::from_parts(srs.kzg.clone(), srs.lagrange.clone()).is_ok());
    }

    #[test]
    fn small_srs_is_refused() {
        let big = compile::<F, _>(&RangeCircuit { bits: 32 }, ConstraintForm::Sparse).unwrap();
        let small = compile::<F, _>(&CubicCircuit, ConstraintForm::Sparse).unwrap();
        let srs = Srs::unsafe_for(&small, &mut test_rng()).unwrap();
        assert!(matches!(
            plonk_setup(&big, &srs),
            Err(ZkError::SetupSizeExceeded { .. })
        ));
    }

    #[test]
    fn mismatched_halves_are_refused() {
        let cs = compile::<F, _>(&CubicCircuit, ConstraintForm::Sparse).unwrap();
        let a = Srs::unsafe_for(&cs, &mut ChaChaRng::from_seed([1u8; 32])).unwrap();
        let b = Srs::unsafe_for(&cs, &mut ChaChaRng::from_seed([2u8; 32])).unwrap();
        assert_eq!(
            Srs::from_parts(a.kzg.clone(), b.lagrange.clone()),
            Err(ZkError::DeserializationError)
        );
        let trimmed = Kzg {
            public_parameter_group_1: vec![],
            public_parameter_group_2: a.kzg.public_parameter_group_2.clone(),
        };
        assert!(Srs::from_parts(trimmed, a.lagrange).is_err());
    }

    #[test]
    fn forms_and_sources_must_agree() {
        let sparse = compile::<F, _>(&CubicCircuit, ConstraintForm::Sparse).unwrap();
        let r1cs = compile::<F, _>(&CubicCircuit, ConstraintForm::R1cs).unwrap();
        let srs = Srs::unsafe_for(&sparse, &mut test_rng()).unwrap();
        assert!(matches!(
            trusted_setup(&r1cs, TrustedSetup::Srs(&srs)),
            Err(ZkError::MalformedCircuit(_))
        ));
        assert!(matches!(
            plonk_setup(&r1cs, &srs),
            Err(ZkError::MalformedCircuit(_))
        ));

        let groth16 =
            Groth16Setup::<BN254PairingEngine>::unsafe_setup(r1cs.as_r1cs().unwrap(), &mut test_rng())
                .unwrap();
        let pk = groth16.pk.to_bytes().unwrap();
        let vk = groth16.vk.to_bytes().unwrap();
        assert!(matches!(
            trusted_setup(&sparse, TrustedSetup::Groth16 { pk: &pk, vk: &vk }),
            Err(ZkError::MalformedCircuit(_))
        ));

        let loaded = trusted_setup(&r1cs, TrustedSetup::Groth16 { pk: &pk, vk: &vk }).unwrap();
        assert_eq!(loaded.vk, VerifyingKey::Groth16(groth16.vk));
        assert!(matches!(
            trusted_setup(&r1cs, TrustedSetup::Groth16 { pk: &vk, vk: &vk }),
            Err(ZkError::DeserializationError)
        ));
    }

    #[test]
    fn setup_is_reproducible() {
        for form in [ConstraintForm::R1cs, ConstraintForm::Sparse] {
            let cs = compile::<F, _>(&CubicCircuit, form).unwrap();
            let a = unsafe_setup(&cs, &mut ChaChaRng::from_seed([9u8; 32])).unwrap();
            let b = unsafe_setup(&cs, &mut ChaChaRng::from_seed([9u8; 32])).unwrap();
            assert_eq!(
                a.pk.to_canonical_bytes().unwrap(),
                b.pk.to_canonical_bytes().unwrap()
            );
            assert_eq!(
                a.vk.to_canonical_bytes().unwrap(),
                b.vk.to_canonical_bytes().unwrap()
            );
        }
    }
}

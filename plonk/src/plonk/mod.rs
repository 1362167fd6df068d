//! The PLONK implementation over three-wire sparse gates.

/// Module for help functions.
pub(crate) mod helpers;

/// Module for the constraint system.
pub mod constraint_system;

/// Module for prover.
pub mod prover;

/// Module for indexer.
pub mod indexer;

/// Module for transcript.
pub(crate) mod transcript;

/// Module for verifier.
pub mod verifier;

#[cfg(test)]
mod test {
    use crate::errors::PlonkError;
    use crate::plonk::{
        constraint_system::{ConstraintSystem, PlonkCircuit},
        indexer::{indexer, indexer_with_lagrange, PlonkPK},
        prover::{prover, prover_with_lagrange},
        verifier::verifier,
    };
    use crate::poly_commit::kzg_poly_com::{KZGCommitment, KZGCommitmentSchemeBN254};
    use merlin::Transcript;
    use rand_chacha::ChaChaRng;
    use zksok_algebra::{
        bn254::{BN254Scalar, BN254G1},
        prelude::*,
    };
    use zksok_frontend::{
        circuits::{CubicCircuit, RangeCircuit},
        compile, Assignment, Circuit, ConstraintForm, Witness,
    };

    type F = BN254Scalar;
    type PCS = KZGCommitmentSchemeBN254;

    struct Fixture {
        cs: PlonkCircuit<F>,
        pcs: PCS,
        lagrange_pcs: PCS,
        pk: PlonkPK<PCS>,
    }

    fn fixture<C: Circuit<F>>(circuit: &C) -> Fixture {
        let compiled = compile::<F, _>(circuit, ConstraintForm::Sparse).unwrap();
        let cs = PlonkCircuit::new(compiled.as_sparse().unwrap()).unwrap();
        let tau = F::random(&mut test_rng());
        let pcs = PCS::from_tau(cs.size() + 2, &tau);
        let lagrange_pcs = PCS::lagrange_from_tau(cs.size(), &tau).unwrap();
        let pk = indexer_with_lagrange(&cs, &pcs, Some(&lagrange_pcs)).unwrap();
        Fixture {
            cs,
            pcs,
            lagrange_pcs,
            pk,
        }
    }

    fn expand<C: Circuit<F>>(circuit: &C, asg: &Assignment<F>) -> Witness<F> {
        compile::<F, _>(circuit, ConstraintForm::Sparse)
            .unwrap()
            .expand(asg)
            .unwrap()
    }

    fn verify(f: &Fixture, pi: &[F], proof: &crate::plonk::indexer::PlonkPf<PCS>) -> core::result::Result<(), PlonkError> {
        let mut transcript = Transcript::new(b"TestPlonk");
        verifier::<PCS, PlonkCircuit<F>>(&mut transcript, &f.pcs, &f.pk.verifier_params, pi, proof)
    }

    #[test]
    fn cubic_proof() {
        let f = fixture(&CubicCircuit);
        let witness = expand(&CubicCircuit, &CubicCircuit::assignment(3, 31));
        let mut prng = ChaChaRng::from_seed([1u8; 32]);

        let proof = prover_with_lagrange(
            &mut prng,
            &mut Transcript::new(b"TestPlonk"),
            &f.pcs,
            Some(&f.lagrange_pcs),
            &f.cs,
            &f.pk,
            &witness.full.0,
        )
        .unwrap();
        assert!(verify(&f, &witness.public.0, &proof).is_ok());

        let bytes = bincode::serialize(&proof).unwrap();
        let decoded: crate::plonk::indexer::PlonkPf<PCS> = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, proof);

        // wrong public input
        assert_eq!(
            verify(&f, &[F::from(32u32)], &proof),
            Err(PlonkError::VerificationError)
        );
        // wrong number of public inputs
        assert_eq!(
            verify(&f, &[], &proof),
            Err(PlonkError::VerificationKeyMismatch)
        );
    }

    #[test]
    fn lagrange_and_monomial_commitments_verify_alike() {
        let f = fixture(&RangeCircuit { bits: 32 });
        let witness = expand(&RangeCircuit { bits: 32 }, &RangeCircuit::assignment(665115184));

        let plain_pk = indexer(&f.cs, &f.pcs).unwrap();
        assert_eq!(plain_pk, f.pk);

        let mut prng = test_rng();
        let proof = prover(
            &mut prng,
            &mut Transcript::new(b"TestPlonk"),
            &f.pcs,
            &f.cs,
            &plain_pk,
            &witness.full.0,
        )
        .unwrap();
        assert!(verify(&f, &witness.public.0, &proof).is_ok());
    }

    #[test]
    fn tampered_proofs_are_rejected() {
        let f = fixture(&CubicCircuit);
        let witness = expand(&CubicCircuit, &CubicCircuit::assignment(3, 31));
        let mut prng = test_rng();
        let proof = prover(
            &mut prng,
            &mut Transcript::new(b"TestPlonk"),
            &f.pcs,
            &f.cs,
            &f.pk,
            &witness.full.0,
        )
        .unwrap();

        let mut bad = proof.clone();
        bad.w_polys_eval_zeta[0].add_assign(&F::one());
        assert_eq!(
            verify(&f, &witness.public.0, &bad),
            Err(PlonkError::VerificationError)
        );

        let mut bad = proof.clone();
        bad.cm_t_vec[1] = KZGCommitment(bad.cm_t_vec[1].0.add(&BN254G1::get_base()));
        assert_eq!(
            verify(&f, &witness.public.0, &bad),
            Err(PlonkError::VerificationError)
        );

        let mut bad = proof;
        bad.cm_t_vec.pop();
        assert_eq!(
            verify(&f, &witness.public.0, &bad),
            Err(PlonkError::MalformedProof)
        );
    }

    #[test]
    fn prover_checks_its_inputs() {
        let f = fixture(&CubicCircuit);
        let witness = expand(&CubicCircuit, &CubicCircuit::assignment(3, 31));
        let mut prng = test_rng();

        let mut bad_witness = witness.full.0.clone();
        let y = f.cs.public_vars_witness_indices()[0];
        bad_witness[y] = F::from(32u32);
        assert!(matches!(
            prover(
                &mut prng,
                &mut Transcript::new(b"TestPlonk"),
                &f.pcs,
                &f.cs,
                &f.pk,
                &bad_witness,
            ),
            Err(PlonkError::InvalidWitness(_))
        ));

        let other = fixture(&RangeCircuit { bits: 32 });
        assert_eq!(
            prover(
                &mut prng,
                &mut Transcript::new(b"TestPlonk"),
                &f.pcs,
                &f.cs,
                &other.pk,
                &witness.full.0,
            ),
            Err(PlonkError::ProvingKeyMismatch)
        );
    }
}

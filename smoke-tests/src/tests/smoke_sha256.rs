#[cfg(test)]
mod smoke_sha256 {
    use rand_chacha::ChaChaRng;
    use sha2::{Digest, Sha256};
    use zksok::{circuits::Sha256Circuit, Backend, Pipeline, PipelineConfig, Verdict, ZkError};
    use zksok_algebra::{bn254::BN254Scalar, prelude::*};
    use zksok_frontend::PublicWitness;

    const PREIMAGE: &[u8] = b"hudaqi";

    fn sha256(backend: Backend) {
        let pipeline = Pipeline::new(PipelineConfig::for_backend(backend)).unwrap();
        let mut prng = ChaChaRng::from_seed([4u8; 32]);
        let circuit = Sha256Circuit {
            input_len: PREIMAGE.len(),
        };
        let digest = Sha256::digest(PREIMAGE);

        let cs = pipeline.compile(&circuit).unwrap();
        assert_eq!(cs.public_variables().len(), 32);
        let setup = pipeline.unsafe_setup(&cs, &mut prng).unwrap();
        let witness = pipeline
            .expand(&cs, &Sha256Circuit::assignment(PREIMAGE, &digest))
            .unwrap();
        let expected: Vec<BN254Scalar> = digest
            .iter()
            .map(|b| BN254Scalar::from(u32::from(*b)))
            .collect();
        assert_eq!(witness.public, PublicWitness(expected));

        let proof = pipeline
            .prove(&cs, &setup.pk, &witness.full, &mut prng)
            .unwrap();
        assert_eq!(
            pipeline.verify(&setup.vk, &witness.public, &proof).unwrap(),
            Verdict::Accepted
        );

        let mut flipped = digest.to_vec();
        flipped[0] ^= 1;
        assert!(matches!(
            pipeline.expand(&cs, &Sha256Circuit::assignment(PREIMAGE, &flipped)),
            Err(ZkError::UnsatisfiedConstraint(_))
        ));

        // the honest proof does not carry over to the flipped digest
        let wrong = PublicWitness(
            flipped
                .iter()
                .map(|b| BN254Scalar::from(u32::from(*b)))
                .collect(),
        );
        assert_eq!(
            pipeline.verify(&setup.vk, &wrong, &proof).unwrap(),
            Verdict::Rejected
        );
    }

    #[test]
    fn sha256_plonk() {
        sha256(Backend::Plonk);
    }

    #[test]
    fn sha256_groth16() {
        sha256(Backend::Groth16);
    }
}

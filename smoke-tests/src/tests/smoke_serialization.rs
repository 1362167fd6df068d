#[cfg(test)]
mod smoke_serialization {
    use rand_chacha::ChaChaRng;
    use zksok::{
        circuits::{CubicCircuit, RangeCircuit},
        Backend, CanonicalDecode, CanonicalEncode, Pipeline, PipelineConfig, Proof, ProvingKey,
        SizeReport, Srs, TrustedSetup, Verdict, VerifyingKey,
    };
    use zksok_algebra::{bn254::BN254Scalar, prelude::*};
    use zksok_frontend::{FullWitness, PublicWitness};

    #[test]
    fn artifacts_survive_the_wire() {
        for backend in [Backend::Groth16, Backend::Plonk] {
            let pipeline = Pipeline::new(PipelineConfig::for_backend(backend)).unwrap();
            let mut prng = ChaChaRng::from_seed([21u8; 32]);
            let cs = pipeline.compile(&RangeCircuit { bits: 32 }).unwrap();
            let setup = pipeline.unsafe_setup(&cs, &mut prng).unwrap();
            let witness = pipeline
                .expand(&cs, &RangeCircuit::assignment(665115184))
                .unwrap();

            // a prover and a verifier that only share bytes
            let pk = ProvingKey::from_canonical_bytes(&setup.pk.to_canonical_bytes().unwrap())
                .unwrap();
            let full =
                FullWitness::from_canonical_bytes(&witness.full.to_canonical_bytes().unwrap())
                    .unwrap();
            let proof_bytes = pipeline
                .prove(&cs, &pk, &full, &mut prng)
                .unwrap()
                .to_canonical_bytes()
                .unwrap();

            let vk = VerifyingKey::from_canonical_bytes(&setup.vk.to_canonical_bytes().unwrap())
                .unwrap();
            let public = PublicWitness::<BN254Scalar>::from_canonical_bytes(
                &witness.public.to_canonical_bytes().unwrap(),
            )
            .unwrap();
            let proof = Proof::from_canonical_bytes(&proof_bytes).unwrap();
            assert_eq!(
                pipeline.verify(&vk, &public, &proof).unwrap(),
                Verdict::Accepted
            );

            let report = SizeReport::measure(None, &setup, &proof).unwrap();
            assert_eq!(report.proof, proof_bytes.len());
            assert_eq!(
                report.verifying_key,
                setup.vk.to_canonical_bytes().unwrap().len()
            );
        }
    }

    #[test]
    fn serde_formats() {
        for backend in [Backend::Groth16, Backend::Plonk] {
            let pipeline = Pipeline::new(PipelineConfig::for_backend(backend)).unwrap();
            let mut prng = ChaChaRng::from_seed([22u8; 32]);
            let cs = pipeline.compile(&CubicCircuit).unwrap();
            let setup = pipeline.unsafe_setup(&cs, &mut prng).unwrap();
            let witness = pipeline
                .expand(&cs, &CubicCircuit::assignment(3, 31))
                .unwrap();
            let proof = pipeline
                .prove(&cs, &setup.pk, &witness.full, &mut prng)
                .unwrap();

            let json = serde_json::to_string(&setup.vk).unwrap();
            let vk: VerifyingKey = serde_json::from_str(&json).unwrap();
            assert_eq!(vk, setup.vk);

            let bin = bincode::serialize(&proof).unwrap();
            let decoded: Proof = bincode::deserialize(&bin).unwrap();
            assert_eq!(decoded, proof);

            let bin = bincode::serialize(&setup.pk).unwrap();
            let pk: ProvingKey = bincode::deserialize(&bin).unwrap();
            assert_eq!(pk, setup.pk);

            let json = serde_json::to_string(&witness.public).unwrap();
            let public: PublicWitness<BN254Scalar> = serde_json::from_str(&json).unwrap();
            assert_eq!(public, witness.public);
        }
    }

    #[test]
    fn srs_from_a_ceremony() {
        let pipeline = Pipeline::new(PipelineConfig::for_backend(Backend::Plonk)).unwrap();
        let mut prng = ChaChaRng::from_seed([23u8; 32]);
        let cs = pipeline.compile(&CubicCircuit).unwrap();
        let srs = Srs::unsafe_for(&cs, &mut prng).unwrap();
        let bytes = srs.to_canonical_bytes().unwrap();
        let loaded = Srs::from_trusted_bytes(&bytes).unwrap();
        assert_eq!(loaded, srs);

        let a = pipeline.setup(&cs, TrustedSetup::Srs(&srs)).unwrap();
        let b = pipeline.setup(&cs, TrustedSetup::Srs(&loaded)).unwrap();
        assert_eq!(a, b);

        let json = serde_json::to_string(&srs).unwrap();
        assert_eq!(serde_json::from_str::<Srs>(&json).unwrap(), srs);

        // flip a byte inside the first G1 power
        let mut corrupted = bytes.clone();
        corrupted[5] ^= 0x10;
        assert!(Srs::from_trusted_bytes(&corrupted).is_err());
    }
}

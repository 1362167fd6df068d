#[cfg(test)]
mod smoke_cubic {
    use rand_chacha::ChaChaRng;
    use zksok::{
        circuits::CubicCircuit, Backend, Counter, Pipeline, PipelineConfig, RecordingMetrics,
        Verdict, ZkError,
    };
    use zksok_algebra::{bn254::BN254Scalar, prelude::*};
    use zksok_frontend::PublicWitness;

    fn cubic(backend: Backend) {
        let metrics = RecordingMetrics::new();
        let pipeline =
            Pipeline::with_metrics(PipelineConfig::for_backend(backend), &metrics).unwrap();
        let mut prng = ChaChaRng::from_seed([0u8; 32]);

        let cs = pipeline.compile(&CubicCircuit).unwrap();
        assert_eq!(cs.public_variables().len(), 1);
        let setup = pipeline.unsafe_setup(&cs, &mut prng).unwrap();
        let witness = pipeline
            .expand(&cs, &CubicCircuit::assignment(3, 31))
            .unwrap();
        assert_eq!(witness.public, PublicWitness(vec![BN254Scalar::from(31u32)]));

        let proof = pipeline
            .prove(&cs, &setup.pk, &witness.full, &mut prng)
            .unwrap();
        assert_eq!(
            pipeline.verify(&setup.vk, &witness.public, &proof).unwrap(),
            Verdict::Accepted
        );

        // the same proof against y = 32
        let wrong = PublicWitness(vec![BN254Scalar::from(32u32)]);
        assert_eq!(
            pipeline.verify(&setup.vk, &wrong, &proof).unwrap(),
            Verdict::Rejected
        );

        // no witness exists for y = 32
        assert!(matches!(
            pipeline.expand(&cs, &CubicCircuit::assignment(3, 32)),
            Err(ZkError::UnsatisfiedConstraint(_))
        ));

        assert_eq!(metrics.counter(Counter::VerificationsAccepted), 1);
        assert_eq!(metrics.counter(Counter::VerificationsRejected), 1);
    }

    #[test]
    fn cubic_groth16() {
        cubic(Backend::Groth16);
    }

    #[test]
    fn cubic_plonk() {
        cubic(Backend::Plonk);
    }

    #[test]
    fn missing_inputs() {
        for backend in [Backend::Groth16, Backend::Plonk] {
            let pipeline = Pipeline::new(PipelineConfig::for_backend(backend)).unwrap();
            let cs = pipeline.compile(&CubicCircuit).unwrap();
            let mut asg = zksok::Assignment::<BN254Scalar>::new();
            asg.assign_u64("x", 3);
            assert_eq!(
                pipeline.expand(&cs, &asg).map(|_| ()),
                Err(ZkError::IncompleteAssignment("y".into()))
            );

            // names the circuit never declared are ignored
            let mut asg = CubicCircuit::assignment(3, 31);
            asg.assign_u64("z", 5);
            assert!(pipeline.expand(&cs, &asg).is_ok());
        }
    }
}

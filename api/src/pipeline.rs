//! The circuit-to-proof pipeline.
//!
//! A [`Pipeline`] fixes the constraint form and the backend, then runs the five phases
//! (compile, setup, expand, prove, verify) while reporting to a [`MetricsSink`].
use crate::{
    errors::{Result, ZkError},
    metrics::{Counter, MetricsSink, NoopMetrics, Phase},
    setup::{self, Kzg, ProvingKey, SetupMaterial, TrustedSetup, VerifyingKey},
};
use ark_std::{end_timer, start_timer};
use merlin::Transcript;
use std::time::Instant;
use zksok_algebra::{
    bn254::{BN254PairingEngine, BN254Scalar},
    prelude::*,
};
use zksok_frontend::{
    compile, Assignment, Circuit, ConstraintForm, ConstraintSystem, FullWitness, PublicWitness,
    Witness,
};
use zksok_groth16::{Groth16Error, Groth16Proof};
use zksok_plonk::{
    plonk::{
        constraint_system::PlonkCircuit, indexer::PlonkPf, prover::prover_with_lagrange,
        verifier::verifier,
    },
    PlonkError,
};

/// The label every PLONK transcript starts with.
pub const PLONK_TRANSCRIPT_LABEL: &[u8] = b"zksok plonk";

/// The proof system.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Backend {
    /// circuit-specific setup over the rank-1 form
    Groth16,
    /// universal setup over the sparse form
    Plonk,
}

impl Backend {
    /// The constraint form the backend proves.
    pub fn form(&self) -> ConstraintForm {
        match self {
            Backend::Groth16 => ConstraintForm::R1cs,
            Backend::Plonk => ConstraintForm::Sparse,
        }
    }
}

/// How a pipeline compiles and proves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[allow(missing_docs)]
    pub form: ConstraintForm,
    #[allow(missing_docs)]
    pub backend: Backend,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::for_backend(Backend::Plonk)
    }
}

impl PipelineConfig {
    /// The configuration of `backend` with the form it requires.
    pub fn for_backend(backend: Backend) -> Self {
        PipelineConfig {
            form: backend.form(),
            backend,
        }
    }

    /// Fail unless the backend proves the chosen form.
    pub fn check(&self) -> Result<()> {
        if self.backend.form() != self.form {
            return Err(ZkError::MalformedCircuit(format!(
                "{:?} cannot prove a {:?} system",
                self.backend, self.form
            )));
        }
        Ok(())
    }
}

/// The outcome of a verification.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Verdict {
    Accepted,
    Rejected,
}

impl Verdict {
    #[allow(missing_docs)]
    pub fn is_accepted(&self) -> bool {
        *self == Verdict::Accepted
    }
}

/// A proof of either backend.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Proof {
    Groth16(Groth16Proof<BN254PairingEngine>),
    Plonk(PlonkPf<Kzg>),
}

impl Proof {
    /// The backend that produced the proof.
    pub fn backend(&self) -> Backend {
        match self {
            Proof::Groth16(_) => Backend::Groth16,
            Proof::Plonk(_) => Backend::Plonk,
        }
    }
}

/// Runs circuits through compile, setup, expand, prove and verify.
#[derive(Debug)]
pub struct Pipeline<M: MetricsSink = NoopMetrics> {
    config: PipelineConfig,
    metrics: M,
}

impl Pipeline<NoopMetrics> {
    /// A pipeline that reports nowhere.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        Self::with_metrics(config, NoopMetrics)
    }
}

impl<M: MetricsSink> Pipeline<M> {
    /// A pipeline that reports to `metrics`.
    pub fn with_metrics(config: PipelineConfig, metrics: M) -> Result<Self> {
        config.check()?;
        Ok(Pipeline { config, metrics })
    }

    #[allow(missing_docs)]
    pub fn config(&self) -> PipelineConfig {
        self.config
    }

    #[allow(missing_docs)]
    pub fn metrics(&self) -> &M {
        &self.metrics
    }

    fn timed<T>(&self, phase: Phase, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let timer = start_timer!(|| format!("{:?}", phase));
        let start = Instant::now();
        let res = f();
        self.metrics.observe(phase, start.elapsed());
        end_timer!(timer);
        res
    }

    fn check_form(&self, cs: &ConstraintSystem<BN254Scalar>) -> Result<()> {
        if cs.form() != self.config.form {
            return Err(ZkError::MalformedCircuit(format!(
                "expected a {:?} system, got {:?}",
                self.config.form,
                cs.form()
            )));
        }
        Ok(())
    }

    /// Compile `circuit` to the configured form.
    pub fn compile<C: Circuit<BN254Scalar>>(
        &self,
        circuit: &C,
    ) -> Result<ConstraintSystem<BN254Scalar>> {
        let cs = self.timed(Phase::Compile, || {
            Ok(compile::<BN254Scalar, C>(circuit, self.config.form)?)
        })?;
        self.metrics
            .incr(Counter::ConstraintsCompiled, cs.num_constraints() as u64);
        self.metrics
            .incr(Counter::VariablesAllocated, cs.num_variables() as u64);
        Ok(cs)
    }

    /// Simulate the setup of `cs` with randomness from `prng`. The keys are only as secret as
    /// the rng.
    #[cfg(any(test, feature = "unsafe-setup"))]
    pub fn unsafe_setup<R: CryptoRng + RngCore>(
        &self,
        cs: &ConstraintSystem<BN254Scalar>,
        prng: &mut R,
    ) -> Result<SetupMaterial> {
        self.check_form(cs)?;
        self.timed(Phase::Setup, || setup::unsafe_setup(cs, prng))
    }

    /// Bind the output of a trusted ceremony to `cs`.
    pub fn setup(
        &self,
        cs: &ConstraintSystem<BN254Scalar>,
        source: TrustedSetup<'_>,
    ) -> Result<SetupMaterial> {
        self.check_form(cs)?;
        self.timed(Phase::Setup, || setup::trusted_setup(cs, source))
    }

    /// Expand an assignment of the named inputs into the full witness.
    pub fn expand(
        &self,
        cs: &ConstraintSystem<BN254Scalar>,
        assignment: &Assignment<BN254Scalar>,
    ) -> Result<Witness<BN254Scalar>> {
        self.timed(Phase::Expand, || Ok(cs.expand(assignment)?))
    }

    /// Prove that `witness` satisfies `cs`. All blinding comes from `prng`.
    pub fn prove<R: CryptoRng + RngCore>(
        &self,
        cs: &ConstraintSystem<BN254Scalar>,
        pk: &ProvingKey,
        witness: &FullWitness<BN254Scalar>,
        prng: &mut R,
    ) -> Result<Proof> {
        self.check_form(cs)?;
        let proof = self.timed(Phase::Prove, || match (cs, pk) {
            (ConstraintSystem::R1cs(r1cs), ProvingKey::Groth16(pk)) => Ok(Proof::Groth16(
                zksok_groth16::prove(prng, pk, r1cs, &witness.0)?,
            )),
            (ConstraintSystem::Sparse(sparse), ProvingKey::Plonk(pk)) => {
                let circuit = PlonkCircuit::new(sparse)?;
                let mut transcript = Transcript::new(PLONK_TRANSCRIPT_LABEL);
                Ok(Proof::Plonk(prover_with_lagrange(
                    prng,
                    &mut transcript,
                    &pk.kzg,
                    pk.lagrange.as_ref(),
                    &circuit,
                    &pk.params,
                    &witness.0,
                )?))
            }
            _ => Err(ZkError::ProvingKeyMismatch),
        })?;
        self.metrics.incr(Counter::ProofsProduced, 1);
        Ok(proof)
    }

    /// Check `proof` against the public witness.
    ///
    /// A proof that fails the pairing check is [`Verdict::Rejected`]. Errors are kept for a
    /// public witness of the wrong length and for proofs of the wrong shape or backend.
    pub fn verify(
        &self,
        vk: &VerifyingKey,
        public: &PublicWitness<BN254Scalar>,
        proof: &Proof,
    ) -> Result<Verdict> {
        let verdict = self.timed(Phase::Verify, || match (vk, proof) {
            (VerifyingKey::Groth16(vk), Proof::Groth16(proof)) => {
                match zksok_groth16::verify(vk, &public.0, proof) {
                    Ok(()) => Ok(Verdict::Accepted),
                    Err(Groth16Error::VerificationError) => Ok(Verdict::Rejected),
                    Err(e) => Err(e.into()),
                }
            }
            (VerifyingKey::Plonk(vk), Proof::Plonk(proof)) => {
                let mut transcript = Transcript::new(PLONK_TRANSCRIPT_LABEL);
                match verifier::<Kzg, PlonkCircuit<BN254Scalar>>(
                    &mut transcript,
                    &vk.kzg,
                    &vk.params,
                    &public.0,
                    proof,
                ) {
                    Ok(()) => Ok(Verdict::Accepted),
                    Err(PlonkError::VerificationError) => Ok(Verdict::Rejected),
                    Err(e) => Err(e.into()),
                }
            }
            _ => Err(ZkError::MalformedProof),
        })?;
        match verdict {
            Verdict::Accepted => self.metrics.incr(Counter::VerificationsAccepted, 1),
            Verdict::Rejected => self.metrics.incr(Counter::VerificationsRejected, 1),
        }
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::{Backend, Pipeline, PipelineConfig, Proof, Verdict};
    use crate::{
        errors::ZkError,
        metrics::{Counter, Phase, RecordingMetrics},
    };
    use zksok_algebra::{bn254::BN254Scalar, prelude::*};
    use zksok_frontend::{
        circuits::{CubicCircuit, RangeCircuit},
        ConstraintForm, PublicWitness,
    };

    const BACKENDS: [Backend; 2] = [Backend::Groth16, Backend::Plonk];

    #[test]
    fn config_must_be_consistent() {
        assert_eq!(PipelineConfig::default().backend, Backend::Plonk);
        assert_eq!(PipelineConfig::default().form, ConstraintForm::Sparse);
        let bad = PipelineConfig {
            form: ConstraintForm::Sparse,
            backend: Backend::Groth16,
        };
        assert!(matches!(
            Pipeline::new(bad),
            Err(ZkError::MalformedCircuit(_))
        ));
    }

    #[test]
    fn cubic_end_to_end() {
        for backend in BACKENDS {
            let metrics = RecordingMetrics::new();
            let pipeline =
                Pipeline::with_metrics(PipelineConfig::for_backend(backend), &metrics).unwrap();
            let mut prng = test_rng();
            let cs = pipeline.compile(&CubicCircuit).unwrap();
            let setup = pipeline.unsafe_setup(&cs, &mut prng).unwrap();
            let witness = pipeline
                .expand(&cs, &CubicCircuit::assignment(3, 31))
                .unwrap();
            let proof = pipeline
                .prove(&cs, &setup.pk, &witness.full, &mut prng)
                .unwrap();
            assert_eq!(proof.backend(), backend);

            let verdict = pipeline.verify(&setup.vk, &witness.public, &proof).unwrap();
            assert_eq!(verdict, Verdict::Accepted);
            let wrong = PublicWitness(vec![BN254Scalar::from(32u32)]);
            assert_eq!(
                pipeline.verify(&setup.vk, &wrong, &proof).unwrap(),
                Verdict::Rejected
            );
            assert_eq!(
                pipeline.verify(&setup.vk, &PublicWitness(vec![]), &proof),
                Err(ZkError::VerificationKeyMismatch)
            );

            assert_eq!(
                metrics.counter(Counter::ConstraintsCompiled),
                cs.num_constraints() as u64
            );
            assert_eq!(metrics.counter(Counter::ProofsProduced), 1);
            assert_eq!(metrics.counter(Counter::VerificationsAccepted), 1);
            assert_eq!(metrics.counter(Counter::VerificationsRejected), 1);
            assert_eq!(metrics.timings(Phase::Verify).len(), 3);
            assert_eq!(metrics.timings(Phase::Setup).len(), 1);
        }
    }

    #[test]
    fn keys_and_proofs_stay_with_their_backend() {
        let groth16 = Pipeline::new(PipelineConfig::for_backend(Backend::Groth16)).unwrap();
        let plonk = Pipeline::new(PipelineConfig::for_backend(Backend::Plonk)).unwrap();
        let mut prng = test_rng();

        let r1cs = groth16.compile(&CubicCircuit).unwrap();
        let sparse = plonk.compile(&CubicCircuit).unwrap();
        assert!(matches!(
            groth16.unsafe_setup(&sparse, &mut prng),
            Err(ZkError::MalformedCircuit(_))
        ));

        let g_setup = groth16.unsafe_setup(&r1cs, &mut prng).unwrap();
        let p_setup = plonk.unsafe_setup(&sparse, &mut prng).unwrap();
        let asg = CubicCircuit::assignment(3, 31);
        let g_witness = groth16.expand(&r1cs, &asg).unwrap();
        let p_witness = plonk.expand(&sparse, &asg).unwrap();
        assert_eq!(g_witness.public, p_witness.public);

        assert_eq!(
            plonk.prove(&sparse, &g_setup.pk, &p_witness.full, &mut prng),
            Err(ZkError::ProvingKeyMismatch)
        );
        let g_proof = groth16
            .prove(&r1cs, &g_setup.pk, &g_witness.full, &mut prng)
            .unwrap();
        assert_eq!(
            plonk.verify(&p_setup.vk, &p_witness.public, &g_proof),
            Err(ZkError::MalformedProof)
        );
    }

    #[test]
    fn prover_rechecks_the_witness() {
        for backend in BACKENDS {
            let pipeline = Pipeline::new(PipelineConfig::for_backend(backend)).unwrap();
            let mut prng = test_rng();
            let cs = pipeline.compile(&RangeCircuit { bits: 8 }).unwrap();
            let setup = pipeline.unsafe_setup(&cs, &mut prng).unwrap();
            let mut witness = pipeline.expand(&cs, &RangeCircuit::assignment(200)).unwrap();
            witness.full.0[1] = BN254Scalar::from(201u32);
            assert!(matches!(
                pipeline.prove(&cs, &setup.pk, &witness.full, &mut prng),
                Err(ZkError::InvalidWitness(_))
            ));
            assert!(matches!(
                pipeline.expand(&cs, &RangeCircuit::assignment(256)),
                Err(ZkError::UnsatisfiedConstraint(_))
            ));
        }
    }

    #[test]
    fn proofs_have_the_right_shape() {
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        let cs = pipeline.compile(&CubicCircuit).unwrap();
        let setup = pipeline.unsafe_setup(&cs, &mut test_rng()).unwrap();
        let witness = pipeline
            .expand(&cs, &CubicCircuit::assignment(3, 31))
            .unwrap();
        let proof = pipeline
            .prove(&cs, &setup.pk, &witness.full, &mut test_rng())
            .unwrap();
        let mut truncated = match proof {
            Proof::Plonk(p) => p,
            Proof::Groth16(_) => unreachable!(),
        };
        truncated.cm_t_vec.pop();
        assert_eq!(
            pipeline.verify(&setup.vk, &witness.public, &Proof::Plonk(truncated)),
            Err(ZkError::MalformedProof)
        );
    }
}

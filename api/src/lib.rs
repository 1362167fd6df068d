//! Compile circuits, set them up, and prove and verify statements about them over BN254,
//! with Groth16 for the rank-1 form and PLONK for the sparse form.
//!
//! ```ignore
//! let pipeline = Pipeline::new(PipelineConfig::for_backend(Backend::Plonk))?;
//! let cs = pipeline.compile(&CubicCircuit)?;
//! let setup = pipeline.unsafe_setup(&cs, &mut prng)?;
//! let witness = pipeline.expand(&cs, &CubicCircuit::assignment(3, 31))?;
//! let proof = pipeline.prove(&cs, &setup.pk, &witness.full, &mut prng)?;
//! assert!(pipeline.verify(&setup.vk, &witness.public, &proof)?.is_accepted());
//! ```
#![deny(unused_import_braces, unused_qualifications, trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(stable_features, unreachable_pub, non_shorthand_field_patterns)]
#![deny(unused_attributes, unused_imports, unused_mut)]
#![deny(missing_docs)]
#![deny(renamed_and_removed_lints, stable_features, unused_allocation)]
#![deny(unused_comparisons, bare_trait_objects, unused_must_use)]
#![forbid(unsafe_code)]
#![warn(
    unused,
    future_incompatible,
    nonstandard_style,
    rust_2018_idioms,
    rust_2021_compatibility
)]
#![allow(clippy::upper_case_acronyms)]

#[macro_use]
extern crate serde_derive;

/// Module for error handling.
pub mod errors;
/// Module for counters and phase timings.
pub mod metrics;
/// Module for the pipeline.
pub mod pipeline;
/// Module for the canonical encoding.
pub mod serialization;
/// Module for setup material.
pub mod setup;
/// Module for size reports.
pub mod size;

pub use errors::{Result, ZkError};
pub use metrics::{Counter, MetricsSink, NoopMetrics, Phase, RecordingMetrics};
pub use pipeline::{Backend, Pipeline, PipelineConfig, Proof, Verdict};
pub use serialization::{CanonicalDecode, CanonicalEncode};
pub use setup::{
    plonk_setup, trusted_setup, PlonkProverKey, PlonkVerifierKey, ProvingKey, SetupMaterial, Srs,
    TrustedSetup, VerifyingKey,
};
pub use size::SizeReport;

#[cfg(any(test, feature = "unsafe-setup"))]
pub use setup::unsafe_setup;

pub use zksok_algebra as algebra;
pub use zksok_frontend as frontend;
pub use zksok_frontend::{
    circuits, Assignment, Circuit, CircuitApi, ConstraintForm, ConstraintSystem, FullWitness,
    PublicWitness, Witness,
};

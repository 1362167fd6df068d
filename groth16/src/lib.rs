//! Groth16 over the rank-1 form of a compiled circuit.
//!
//! [`setup::generate_parameters`] turns a trapdoor into keys, [`prover::prove`] builds the
//! three-point proof and [`verifier::verify`] checks it with a single multi-pairing.
#![deny(unused_import_braces, unused_qualifications, trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(stable_features, non_shorthand_field_patterns)]
#![deny(unused_attributes, unused_imports, unused_mut, missing_docs)]
#![deny(renamed_and_removed_lints, stable_features, unused_allocation)]
#![deny(unused_comparisons, bare_trait_objects, unused_must_use)]
#![forbid(unsafe_code)]

mod encoding;

/// Module for error handling.
pub mod errors;

/// Module for the quadratic arithmetic program.
pub mod qap;

/// Module for the prover.
pub mod prover;

/// Module for keys and their generation.
pub mod setup;

/// Module for the verifier.
pub mod verifier;

pub use errors::Groth16Error;
pub use prover::{create_proof_with_randomness, prove, Groth16Proof};
pub use setup::{generate_parameters, Groth16ProvingKey, Groth16Setup, Groth16VerifyingKey, ToxicWaste};
pub use verifier::verify;

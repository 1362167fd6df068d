//! PLONK over sparse three-wire gates, committed with KZG over BN254.
//!
//! The [`poly_commit`] module carries the polynomial arithmetic and the commitment scheme.
//! The [`plonk`] module turns a padded [`plonk::constraint_system::PlonkCircuit`] into prover
//! and verifier parameters, and proves and verifies against them.
#![deny(unused_import_braces, unused_qualifications, trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(stable_features, non_shorthand_field_patterns)]
#![deny(unused_attributes, unused_imports, unused_mut, missing_docs)]
#![deny(renamed_and_removed_lints, stable_features, unused_allocation)]
#![deny(unused_comparisons, bare_trait_objects, unused_must_use)]
#![allow(clippy::upper_case_acronyms, clippy::too_many_arguments)]
#![forbid(unsafe_code)]

#[macro_use]
extern crate serde_derive;

/// Module for error handling.
pub mod errors;

/// Module for the PLONK protocol.
pub mod plonk;

/// Module for polynomials and the polynomial commitment scheme.
pub mod poly_commit;

pub use errors::PlonkError;

//! The BN254 backend used by the zksok proving pipeline.
//!
//! Everything above this crate talks to the curve through the [`traits::Scalar`],
//! [`traits::Group`] and [`traits::Pairing`] traits, so the constraint and proof
//! code never touches arkworks types directly.
#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unused_import_braces, unused_qualifications, trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(stable_features, non_shorthand_field_patterns)]
#![deny(unused_attributes, unused_imports, unused_mut, missing_docs)]
#![deny(renamed_and_removed_lints, stable_features, unused_allocation)]
#![deny(unused_comparisons, bare_trait_objects, unused_must_use)]
#![forbid(unsafe_code)]

extern crate serde_derive;

/// Module for the BN254 curve.
pub mod bn254;

/// Module for error handling.
pub mod errors;

/// Module for the prelude.
pub mod prelude;

/// Module for test rngs.
pub mod rand_helper;

/// Module for serialization of scalars and group elements.
pub mod serialization;

/// Module for traits.
pub mod traits;

/// Module for utils.
pub mod utils;

#[doc(hidden)]
pub use ark_std::{
    borrow, cmp, collections, fmt, hash, io, iter, marker, ops, rand, One, UniformRand, Zero,
};

#[doc(hidden)]
pub use serde;

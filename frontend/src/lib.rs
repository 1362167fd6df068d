//! Circuit front end: declare variables, emit constraints, expand witnesses.
//!
//! A [`builder::Circuit`] describes its relation through the [`builder::CircuitApi`]
//! operations. [`builder::compile`] lowers the description either to rank-1 constraints
//! (`(A·z)·(B·z) = C·z`) or to sparse three-wire gates, and the resulting
//! [`constraint::ConstraintSystem`] expands an [`witness::Assignment`] into a full witness.
#![deny(unused_import_braces, unused_qualifications, trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(stable_features, non_shorthand_field_patterns)]
#![deny(unused_attributes, unused_imports, unused_mut, missing_docs)]
#![deny(renamed_and_removed_lints, stable_features, unused_allocation)]
#![deny(unused_comparisons, bare_trait_objects, unused_must_use)]
#![forbid(unsafe_code)]

#[macro_use]
extern crate serde_derive;

/// Module for the circuit builder and the declaration traits.
pub mod builder;

/// Ready-made circuits.
pub mod circuits;

/// Module for the compiled constraint systems.
pub mod constraint;

/// Module for error handling.
pub mod errors;

/// Gadgets built on top of the primitive operations.
pub mod gadgets;

/// Module for the witness solver program.
pub mod solver;

/// Module for variables and their visibility.
pub mod variable;

/// Module for assignments and witnesses.
pub mod witness;

pub use builder::{compile, Circuit, CircuitApi, ConstraintForm};
pub use constraint::ConstraintSystem;
pub use errors::CircuitError;
pub use variable::{Variable, Visibility};
pub use witness::{Assignment, FullWitness, PublicWitness, Witness};

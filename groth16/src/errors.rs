use std::{error, fmt};
use zksok_algebra::prelude::AlgebraError;

/// The result type of the Groth16 crate.
pub type Result<T> = core::result::Result<T, Groth16Error>;

/// Errors of the Groth16 setup, prover and verifier.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Groth16Error {
    /// Algebra error
    Algebra(AlgebraError),
    /// The constraint system is not a rank-1 system, or references unknown variables.
    MalformedCircuit(String),
    /// No multiplicative subgroup of this size exists.
    GroupNotFound(usize),
    /// The sampled trapdoor is unusable (zero `gamma` or `delta`, or `tau` in the domain).
    DegenerateToxicWaste,
    /// The witness violates this constraint.
    InvalidWitness(usize),
    /// The proving key was generated for another circuit.
    ProvingKeyMismatch,
    /// The public input length differs from the verifying key.
    VerificationKeyMismatch,
    /// The proof could not be decoded.
    MalformedProof,
    /// The pairing check failed.
    VerificationError,
}

impl fmt::Display for Groth16Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Groth16Error::*;
        match self {
            Algebra(e) => write!(f, "Algebra: {}", e),
            MalformedCircuit(reason) => write!(f, "Malformed circuit: {}", reason),
            GroupNotFound(n) => write!(f, "No subgroup of size {}.", n),
            DegenerateToxicWaste => f.write_str("The setup trapdoor is degenerate."),
            InvalidWitness(index) => write!(f, "The witness violates constraint {}.", index),
            ProvingKeyMismatch => f.write_str("The proving key does not match the circuit."),
            VerificationKeyMismatch => {
                f.write_str("The public inputs do not match the verifying key.")
            }
            MalformedProof => f.write_str("Malformed proof."),
            VerificationError => f.write_str("Verification error."),
        }
    }
}

impl error::Error for Groth16Error {}

impl From<AlgebraError> for Groth16Error {
    fn from(e: AlgebraError) -> Groth16Error {
        Groth16Error::Algebra(e)
    }
}

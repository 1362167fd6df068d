use std::{error, fmt};
use zksok_algebra::prelude::AlgebraError;

/// The result type of the PLONK crate.
pub type Result<T> = core::result::Result<T, PlonkError>;

/// Errors of the commitment scheme and of the PLONK protocol.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum PlonkError {
    /// Algebra error
    Algebra(AlgebraError),
    /// No multiplicative subgroup of this size exists.
    GroupNotFound(usize),
    /// The circuit is not a sparse system, or has a shape the indexer refuses.
    MalformedCircuit(String),
    /// The commitment key holds fewer powers than the circuit needs.
    SetupSizeExceeded {
        /// powers of tau required
        needed: usize,
        /// powers of tau available
        available: usize,
    },
    /// The witness violates this gate.
    InvalidWitness(usize),
    /// The prover parameters do not match the circuit or the witness.
    ProvingKeyMismatch,
    /// The public input length differs from the verifier parameters.
    VerificationKeyMismatch,
    /// The proof does not have the expected shape.
    MalformedProof,
    /// The polynomial degree is higher than the commitment key supports.
    DegreeError,
    /// `f(x) != y` while producing an opening.
    PCSProveEvalError,
    /// Division by zero.
    DivisionByZero,
    /// A challenge was requested before the previous ones were set.
    ChallengeError,
    /// The pairing check failed.
    VerificationError,
}

impl fmt::Display for PlonkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PlonkError::*;
        match self {
            Algebra(e) => write!(f, "Algebra: {}", e),
            GroupNotFound(n) => write!(f, "No subgroup of size {}.", n),
            MalformedCircuit(reason) => write!(f, "Malformed circuit: {}", reason),
            SetupSizeExceeded { needed, available } => write!(
                f,
                "The commitment key has {} powers, {} are needed.",
                available, needed
            ),
            InvalidWitness(index) => write!(f, "The witness violates gate {}.", index),
            ProvingKeyMismatch => f.write_str("The prover parameters do not match the circuit."),
            VerificationKeyMismatch => {
                f.write_str("The public inputs do not match the verifier parameters.")
            }
            MalformedProof => f.write_str("Malformed proof."),
            DegreeError => f.write_str(
                "The degree of the polynomial is higher than the maximum degree supported.",
            ),
            PCSProveEvalError => f.write_str("Cannot compute the opening as F(x) != y."),
            DivisionByZero => f.write_str("Division by zero."),
            ChallengeError => f.write_str("Challenge error."),
            VerificationError => f.write_str("Verification error."),
        }
    }
}

impl error::Error for PlonkError {}

impl From<AlgebraError> for PlonkError {
    fn from(e: AlgebraError) -> PlonkError {
        PlonkError::Algebra(e)
    }
}

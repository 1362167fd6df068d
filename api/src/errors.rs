use std::{error, fmt};
use zksok_algebra::prelude::AlgebraError;
use zksok_frontend::CircuitError;
use zksok_groth16::Groth16Error;
use zksok_plonk::PlonkError;

/// The result type of the pipeline.
pub type Result<T> = core::result::Result<T, ZkError>;

/// Errors of the pipeline. A rejected proof is not an error, see [`crate::Verdict`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ZkError {
    /// The circuit declaration is invalid, or does not fit the chosen backend.
    MalformedCircuit(String),
    /// The assignment violates the constraint with this index.
    UnsatisfiedConstraint(usize),
    /// The named input has no value.
    IncompleteAssignment(String),
    /// The structured reference string is too small for the circuit.
    SetupSizeExceeded {
        /// powers of tau required
        needed: usize,
        /// powers of tau available
        available: usize,
    },
    /// The proving key was derived for another circuit or backend.
    ProvingKeyMismatch,
    /// The public witness or the proof does not fit the verifying key.
    VerificationKeyMismatch,
    /// The proof could not be decoded or has the wrong number of elements.
    MalformedProof,
    /// The full witness violates the constraint with this index.
    InvalidWitness(usize),
    /// Could not decode a key, an SRS or a witness.
    DeserializationError,
    #[allow(missing_docs)]
    Algebra(AlgebraError),
    #[allow(missing_docs)]
    Plonk(PlonkError),
    #[allow(missing_docs)]
    Groth16(Groth16Error),
}

impl fmt::Display for ZkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ZkError::*;
        match self {
            MalformedCircuit(reason) => write!(f, "Malformed circuit: {}", reason),
            UnsatisfiedConstraint(index) => write!(f, "Constraint {} is not satisfied", index),
            IncompleteAssignment(name) => write!(f, "No value assigned to input {}", name),
            SetupSizeExceeded { needed, available } => write!(
                f,
                "The setup supports {} powers, the circuit needs {}",
                available, needed
            ),
            ProvingKeyMismatch => f.write_str("The proving key does not match the circuit"),
            VerificationKeyMismatch => {
                f.write_str("The public witness does not match the verifying key")
            }
            MalformedProof => f.write_str("Malformed proof"),
            InvalidWitness(index) => write!(f, "The witness violates constraint {}", index),
            DeserializationError => f.write_str("Could not deserialize object"),
            Algebra(e) => write!(f, "Algebra: {}", e),
            Plonk(e) => write!(f, "Plonk: {}", e),
            Groth16(e) => write!(f, "Groth16: {}", e),
        }
    }
}

impl error::Error for ZkError {}

impl From<AlgebraError> for ZkError {
    fn from(e: AlgebraError) -> ZkError {
        match e {
            AlgebraError::DeserializationError => ZkError::DeserializationError,
            e => ZkError::Algebra(e),
        }
    }
}

impl From<CircuitError> for ZkError {
    fn from(e: CircuitError) -> ZkError {
        match e {
            CircuitError::MalformedCircuit(reason) => ZkError::MalformedCircuit(reason),
            CircuitError::UnsatisfiedConstraint(index) => ZkError::UnsatisfiedConstraint(index),
            CircuitError::IncompleteAssignment(name) => ZkError::IncompleteAssignment(name),
            CircuitError::Algebra(e) => e.into(),
        }
    }
}

impl From<PlonkError> for ZkError {
    fn from(e: PlonkError) -> ZkError {
        match e {
            PlonkError::Algebra(e) => e.into(),
            PlonkError::MalformedCircuit(reason) => ZkError::MalformedCircuit(reason),
            PlonkError::SetupSizeExceeded { needed, available } => {
                ZkError::SetupSizeExceeded { needed, available }
            }
            PlonkError::InvalidWitness(index) => ZkError::InvalidWitness(index),
            PlonkError::ProvingKeyMismatch => ZkError::ProvingKeyMismatch,
            PlonkError::VerificationKeyMismatch => ZkError::VerificationKeyMismatch,
            PlonkError::MalformedProof => ZkError::MalformedProof,
            e => ZkError::Plonk(e),
        }
    }
}

impl From<Groth16Error> for ZkError {
    fn from(e: Groth16Error) -> ZkError {
        match e {
            Groth16Error::Algebra(e) => e.into(),
            Groth16Error::MalformedCircuit(reason) => ZkError::MalformedCircuit(reason),
            Groth16Error::InvalidWitness(index) => ZkError::InvalidWitness(index),
            Groth16Error::ProvingKeyMismatch => ZkError::ProvingKeyMismatch,
            Groth16Error::VerificationKeyMismatch => ZkError::VerificationKeyMismatch,
            Groth16Error::MalformedProof => ZkError::MalformedProof,
            e => ZkError::Groth16(e),
        }
    }
}

use std::{error, fmt};
use zksok_algebra::errors::AlgebraError;

/// The result type of this crate.
pub type Result<T> = core::result::Result<T, CircuitError>;

/// Errors raised while declaring a circuit or expanding its witness.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum CircuitError {
    /// The declaration references an unknown variable or uses an invalid parameter.
    MalformedCircuit(String),
    /// The constraint with this index does not hold for the expanded values.
    UnsatisfiedConstraint(usize),
    /// The named public or secret input has no value in the assignment.
    IncompleteAssignment(String),
    /// An error from the field backend.
    Algebra(AlgebraError),
}

impl fmt::Display for CircuitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CircuitError::*;
        match self {
            MalformedCircuit(reason) => write!(f, "Malformed circuit: {}", reason),
            UnsatisfiedConstraint(index) => write!(f, "Constraint {} is not satisfied", index),
            IncompleteAssignment(name) => write!(f, "No value assigned to input {}", name),
            Algebra(e) => write!(f, "Algebra error: {}", e),
        }
    }
}

impl error::Error for CircuitError {}

impl From<AlgebraError> for CircuitError {
    fn from(e: AlgebraError) -> CircuitError {
        CircuitError::Algebra(e)
    }
}

use crate::{
    errors::{CircuitError, Result},
    solver::Solver,
    variable::{CsIndex, VariableTable},
};
use std::collections::BTreeMap;
use zksok_algebra::prelude::*;

/// Values for the named public and secret inputs of a circuit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assignment<F> {
    values: BTreeMap<String, F>,
}

impl<F: Scalar> Assignment<F> {
    /// Create an empty assignment.
    pub fn new() -> Self {
        Assignment {
            values: BTreeMap::new(),
        }
    }

    /// Set the value of the input `name`.
    pub fn assign(&mut self, name: &str, value: F) -> &mut Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Set the value of the input `name` from an integer.
    pub fn assign_u64(&mut self, name: &str, value: u64) -> &mut Self {
        self.assign(name, F::from(value))
    }

    /// Set `name[0]`, `name[1]`, ... from a byte string.
    pub fn assign_bytes(&mut self, name: &str, bytes: &[u8]) -> &mut Self {
        for (i, b) in bytes.iter().enumerate() {
            self.assign(&format!("{}[{}]", name, i), F::from(u32::from(*b)));
        }
        self
    }

    /// Return the value of the input `name`.
    pub fn get(&self, name: &str) -> Option<&F> {
        self.values.get(name)
    }
}

/// The value of every variable, indexed like the variable table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: Scalar")]
pub struct FullWitness<F>(pub Vec<F>);

/// The values of the public variables, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: Scalar")]
pub struct PublicWitness<F>(pub Vec<F>);

impl<F: Scalar> PublicWitness<F> {
    /// Pick the public inputs out of an assignment without expanding the circuit.
    pub fn from_assignment(variables: &VariableTable, assignment: &Assignment<F>) -> Result<Self> {
        let mut values = Vec::with_capacity(variables.public_indices().len());
        for index in variables.public_indices() {
            values.push(input_value(variables, *index, assignment)?);
        }
        Ok(PublicWitness(values))
    }
}

/// A satisfying witness together with its public slice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Witness<F> {
    /// every variable
    pub full: FullWitness<F>,
    /// the public variables
    pub public: PublicWitness<F>,
}

fn input_value<F: Scalar>(
    variables: &VariableTable,
    index: usize,
    assignment: &Assignment<F>,
) -> Result<F> {
    let name = variables
        .name(index)
        .ok_or_else(|| CircuitError::MalformedCircuit(format!("input {} has no name", index)))?;
    assignment
        .get(name)
        .copied()
        .ok_or_else(|| CircuitError::IncompleteAssignment(name.into()))
}

/// Fill the inputs, run the solver, then check every constraint with `first_unsatisfied`.
pub(crate) fn expand_with<F, C>(
    variables: &VariableTable,
    solver: &Solver<F>,
    assignment: &Assignment<F>,
    first_unsatisfied: C,
) -> Result<Witness<F>>
where
    F: Scalar,
    C: Fn(&[F]) -> Option<CsIndex>,
{
    let mut values = vec![F::zero(); variables.len()];
    values[0] = F::one();
    for index in variables
        .public_indices()
        .iter()
        .chain(variables.secret_indices().iter())
    {
        values[*index] = input_value(variables, *index, assignment)?;
    }

    solver.solve(&mut values);

    if let Some(index) = first_unsatisfied(&values) {
        return Err(CircuitError::UnsatisfiedConstraint(index));
    }

    let public = variables
        .public_indices()
        .iter()
        .map(|i| values[*i])
        .collect();
    Ok(Witness {
        full: FullWitness(values),
        public: PublicWitness(public),
    })
}

use crate::errors::{CircuitError, Result};
use std::collections::BTreeMap;

/// The index of a variable in the witness vector.
pub type VarIndex = usize;

/// The index of a constraint (a rank-1 row or a sparse gate).
pub type CsIndex = usize;

/// A handle to a wire of the circuit being built.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Variable(pub(crate) VarIndex);

impl Variable {
    /// The reserved wire carrying the constant one.
    pub const ONE: Variable = Variable(0);

    /// Return the dense index of the variable.
    #[inline]
    pub fn index(&self) -> VarIndex {
        self.0
    }
}

/// Who gets to see the value of a variable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    /// Known to the verifier.
    Public,
    /// Supplied by the prover only.
    Secret,
    /// Computed during witness expansion.
    Internal,
}

/// The variable table of a circuit: visibility and optional name per index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableTable {
    visibility: Vec<Visibility>,
    names: Vec<Option<String>>,
    by_name: BTreeMap<String, VarIndex>,
    public: Vec<VarIndex>,
    secret: Vec<VarIndex>,
}

impl Default for VariableTable {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableTable {
    /// Create a table holding only the constant one wire.
    pub fn new() -> Self {
        VariableTable {
            visibility: vec![Visibility::Internal],
            names: vec![None],
            by_name: BTreeMap::new(),
            public: vec![],
            secret: vec![],
        }
    }

    pub(crate) fn declare(&mut self, name: Option<&str>, visibility: Visibility) -> Result<Variable> {
        let index = self.visibility.len();
        if let Some(name) = name {
            if self.by_name.contains_key(name) {
                return Err(CircuitError::MalformedCircuit(format!(
                    "variable {} declared twice",
                    name
                )));
            }
            self.by_name.insert(name.into(), index);
        }
        match visibility {
            Visibility::Public => self.public.push(index),
            Visibility::Secret => self.secret.push(index),
            Visibility::Internal => {}
        }
        self.visibility.push(visibility);
        self.names.push(name.map(String::from));
        Ok(Variable(index))
    }

    /// Return the index of `var` if it belongs to this table.
    pub fn check(&self, var: Variable) -> Result<VarIndex> {
        if var.0 < self.visibility.len() {
            Ok(var.0)
        } else {
            Err(CircuitError::MalformedCircuit(format!(
                "variable {} was never declared",
                var.0
            )))
        }
    }

    /// The number of variables, the constant one wire included.
    pub fn len(&self) -> usize {
        self.visibility.len()
    }

    /// Always false, the constant one wire is always present.
    pub fn is_empty(&self) -> bool {
        self.visibility.is_empty()
    }

    /// Return the visibility of the variable at `index`.
    pub fn visibility(&self, index: VarIndex) -> Option<Visibility> {
        self.visibility.get(index).copied()
    }

    /// Return the declared name of the variable at `index`.
    pub fn name(&self, index: VarIndex) -> Option<&str> {
        self.names.get(index).and_then(|n| n.as_deref())
    }

    /// Find a public or secret variable by name.
    pub fn lookup(&self, name: &str) -> Option<Variable> {
        self.by_name.get(name).map(|i| Variable(*i))
    }

    /// Public variables in declaration order.
    pub fn public_indices(&self) -> &[VarIndex] {
        &self.public
    }

    /// Secret variables in declaration order.
    pub fn secret_indices(&self) -> &[VarIndex] {
        &self.secret
    }

    /// Iterate over every variable with its visibility and name.
    pub fn iter(&self) -> impl Iterator<Item = (Variable, Visibility, Option<&str>)> + '_ {
        self.visibility
            .iter()
            .zip(self.names.iter())
            .enumerate()
            .map(|(i, (v, n))| (Variable(i), *v, n.as_deref()))
    }
}

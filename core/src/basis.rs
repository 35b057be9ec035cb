/// Opaque basis-set descriptor produced by the engine's basis stage.
///
/// The driver only routes it onward to the SCF stage; the actual contraction
/// data stays inside the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct Basis {
    name: String,
    functions_per_atom: Vec<usize>,
}

impl Basis {
    pub fn new(name: impl Into<String>, functions_per_atom: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            functions_per_atom,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The number of basis functions per atom, in input order.
    pub fn functions_per_atom(&self) -> &[usize] {
        &self.functions_per_atom
    }

    /// Total number of basis functions in the set.
    pub fn n_basis(&self) -> usize {
        self.functions_per_atom.iter().sum()
    }
}

use itertools::Itertools;
use nalgebra::Vector3;

use crate::periodic_table::Element;

/// Represents an atom in a molecule. Positions are in Bohr, the engine's
/// input convention.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Atom {
    pub element: Element,
    pub position: Vector3<f64>,
}

impl Atom {
    /// Returns the charge of this nucleus
    pub fn nuclear_charge(&self) -> i32 {
        self.element.atomic_number() as i32
    }
}

/// Represents a molecule, as handed back by the engine's input stage.
#[derive(Clone, Debug, PartialEq)]
pub struct Molecule {
    atoms: Vec<Atom>,
    charge: i32,
}

impl Molecule {
    pub fn new(atoms: Vec<Atom>, charge: i32) -> Self {
        Self { atoms, charge }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn charge(&self) -> i32 {
        self.charge
    }

    /// Returns the number of electrons in the system
    pub fn n_electrons(&self) -> usize {
        let nuclear = self
            .atoms
            .iter()
            .map(|atom| atom.element.atomic_number() as usize)
            .sum::<usize>();

        nuclear.saturating_add_signed(-self.charge as isize)
    }

    /// Classical Coulomb repulsion between the nuclei, in Hartree.
    pub fn nuclear_repulsion(&self) -> f64 {
        self.atoms
            .iter()
            .tuple_combinations()
            .map(|(a, b)| {
                (a.nuclear_charge() * b.nuclear_charge()) as f64 / (b.position - a.position).norm()
            })
            .sum()
    }
}

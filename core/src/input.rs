use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    keywords::Keywords,
    molecule::{Atom, Molecule},
    periodic_table::Element,
};

/// What kind of calculation the input file asks for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    Energy,
    Gradient,
    Hessian,
    Properties,
}

/// Method and basis-set selection from the input file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub method: String,
    pub basis: String,
}

/// Everything the engine's input stage hands back: the molecule plus the
/// driver, model and keyword configuration it was parsed alongside.
#[derive(Clone, Debug, PartialEq)]
pub struct Input {
    pub molecule: Molecule,
    pub driver: Driver,
    pub model: Model,
    pub keywords: Keywords,
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("input document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown element symbol `{symbol}`")]
    UnknownElement { symbol: String },
    #[error("geometry has {found} coordinates, expected {expected} for {atoms} atoms")]
    GeometryLength {
        atoms: usize,
        expected: usize,
        found: usize,
    },
}

/// Wire format of the input document.
#[derive(Deserialize)]
struct InputDocument {
    molecule: MoleculeDocument,
    driver: Driver,
    model: Model,
    #[serde(default)]
    keywords: Keywords,
}

/// A molecule in an input document: element symbols plus a flat list of
/// coordinate triples, in Bohr.
#[derive(Deserialize)]
struct MoleculeDocument {
    symbols: Vec<String>,
    geometry: Vec<f64>,
    #[serde(default)]
    molecular_charge: i32,
}

impl Input {
    /// Parses an input document from its JSON source.
    pub fn from_json(source: &str) -> Result<Self, InputError> {
        let document: InputDocument = serde_json::from_str(source)?;
        let molecule = document.molecule.try_into()?;

        Ok(Self {
            molecule,
            driver: document.driver,
            model: document.model,
            keywords: document.keywords,
        })
    }
}

impl TryFrom<MoleculeDocument> for Molecule {
    type Error = InputError;

    fn try_from(document: MoleculeDocument) -> Result<Self, Self::Error> {
        let expected = 3 * document.symbols.len();
        if document.geometry.len() != expected {
            return Err(InputError::GeometryLength {
                atoms: document.symbols.len(),
                expected,
                found: document.geometry.len(),
            });
        }

        let mut atoms = Vec::with_capacity(document.symbols.len());
        for (symbol, coordinates) in document.symbols.iter().zip(document.geometry.chunks_exact(3))
        {
            let element =
                Element::from_symbol(symbol).ok_or_else(|| InputError::UnknownElement {
                    symbol: symbol.clone(),
                })?;

            atoms.push(Atom {
                element,
                position: Vector3::new(coordinates[0], coordinates[1], coordinates[2]),
            });
        }

        Ok(Molecule::new(atoms, document.molecular_charge))
    }
}

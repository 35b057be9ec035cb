use serde_json::Value;
use thiserror::Error;

use crate::keywords::KeywordSection;

/// Initial density guess for the SCF procedure.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Guess {
    /// Core-Hamiltonian guess
    #[default]
    Hcore,
    /// Superposition of atomic densities
    Sad,
}

/// The scf keywords the driver itself understands. Anything else in the
/// section is forwarded to the engine untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct ScfOptions {
    /// the maximum number of iterations before the system is considered to
    /// not converge
    pub max_iterations: usize,
    /// if the rms of the density matrix change drops below this, the system
    /// is considered converged
    pub density_convergence: f64,
    pub guess: Guess,
}

impl Default for ScfOptions {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            density_convergence: 1e-6,
            guess: Guess::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ScfOptionsError {
    #[error("scf keyword `{key}` has unexpected value: {value}")]
    BadValue { key: &'static str, value: Value },
}

impl ScfOptions {
    /// Decodes the known keys of an `scf` keyword section, keeping defaults
    /// for anything absent. Unknown keys are not an error; the engine may
    /// understand more than the driver does.
    pub fn from_section(section: &KeywordSection) -> Result<Self, ScfOptionsError> {
        let mut options = Self::default();

        if let Some(value) = section.get("max_iterations") {
            options.max_iterations = value
                .as_u64()
                .map(|n| n as usize)
                .ok_or_else(|| ScfOptionsError::BadValue {
                    key: "max_iterations",
                    value: value.clone(),
                })?;
        }

        if let Some(value) = section.get("density_convergence") {
            options.density_convergence =
                value.as_f64().ok_or_else(|| ScfOptionsError::BadValue {
                    key: "density_convergence",
                    value: value.clone(),
                })?;
        }

        if let Some(value) = section.get("guess") {
            options.guess = match value.as_str() {
                Some("hcore") => Guess::Hcore,
                Some("sad") => Guess::Sad,
                _ => {
                    return Err(ScfOptionsError::BadValue {
                        key: "guess",
                        value: value.clone(),
                    })
                }
            };
        }

        Ok(options)
    }
}

/// The result handle produced by the engine's SCF stage.
#[derive(Clone, Debug, PartialEq)]
pub struct ScfResult {
    /// The electronic energy of the system
    pub electronic_energy: f64,
    /// The nuclear repulsion energy
    pub nuclear_repulsion: f64,
    /// After how many iterations did the system converge
    pub iterations: usize,
    pub converged: bool,
}

impl ScfResult {
    pub fn total_energy(&self) -> f64 {
        self.electronic_energy + self.nuclear_repulsion
    }
}

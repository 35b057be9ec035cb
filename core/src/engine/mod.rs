pub mod stub;

use std::backtrace::Backtrace;
use std::fmt;

// thiserror's derive treats any field whose type is spelled `Backtrace` as a
// request for the unstable `Error::provide` API; spelling the type through an
// alias keeps the field a plain data member on stable.
type BacktraceStorage = Backtrace;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    basis::Basis,
    input::{Input, Model},
    keywords::KeywordSection,
    molecule::Molecule,
    scf::ScfResult,
};

/// How much an engine stage should print while it runs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputLevel {
    None,
    #[default]
    Minimal,
    Verbose,
}

impl fmt::Display for OutputLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputLevel::None => "none",
            OutputLevel::Minimal => "minimal",
            OutputLevel::Verbose => "verbose",
        })
    }
}

impl FromStr for OutputLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(OutputLevel::None),
            "minimal" => Ok(OutputLevel::Minimal),
            "verbose" => Ok(OutputLevel::Verbose),
            other => Err(format!(
                "unknown output level `{other}` (expected none, minimal or verbose)"
            )),
        }
    }
}

/// An engine-side failure, with the backtrace captured where it was raised.
///
/// Whether the backtrace holds frames depends on `RUST_BACKTRACE`, same as
/// for panics.
#[derive(Debug, Error)]
#[error("engine operation `{operation}` failed: {message}")]
pub struct EngineError {
    operation: &'static str,
    message: String,
    backtrace: BacktraceStorage,
}

impl EngineError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
            backtrace: Backtrace::capture(),
        }
    }

    pub fn operation(&self) -> &str {
        self.operation
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

/// The contract an engine backend implements: three pipeline stages plus the
/// process-wide lifecycle operations.
///
/// All calls are synchronous and blocking. Stages must only be called between
/// `initialize` and `finalize`; [`crate::runtime::Runtime`] is the intended
/// way to uphold that.
pub trait Engine {
    /// Brings the engine's global runtime state up. Must precede any stage.
    fn initialize(&mut self) -> Result<(), EngineError>;

    /// Tears the engine's global runtime state down.
    fn finalize(&mut self) -> Result<(), EngineError>;

    /// Clears per-calculation state between runs.
    fn reset(&mut self) -> Result<(), EngineError>;

    /// Input stage: parses an input document into a molecule plus the driver,
    /// model and keyword configuration.
    fn parse_input(&mut self, source: &str, output: OutputLevel) -> Result<Input, EngineError>;

    /// Basis stage: builds a basis set for the molecule under the given
    /// model. The engine may hand back an updated molecule.
    fn build_basis(
        &mut self,
        molecule: &Molecule,
        model: &Model,
        output: OutputLevel,
    ) -> Result<(Molecule, Basis), EngineError>;

    /// SCF stage: runs a restricted Hartree-Fock calculation. `keywords` is
    /// the `scf` section of the parsed keyword set.
    fn run_scf(
        &mut self,
        molecule: &Molecule,
        basis: &Basis,
        keywords: &KeywordSection,
        output: OutputLevel,
    ) -> Result<ScfResult, EngineError>;
}

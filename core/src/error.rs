use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::engine::EngineError;

/// Which pipeline step a failure came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stage {
    Initialize,
    ParseInput,
    BuildBasis,
    Scf,
    Reset,
    Finalize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Initialize => "initialize",
            Stage::ParseInput => "input parsing",
            Stage::BuildBasis => "basis construction",
            Stage::Scf => "scf",
            Stage::Reset => "reset",
            Stage::Finalize => "finalize",
        })
    }
}

/// Driver-level failure: either the input file could not be read, or the
/// engine failed in one of its operations.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("failed to read input file: {path}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} stage failed")]
    Engine {
        stage: Stage,
        #[source]
        source: EngineError,
    },
}

impl DriverError {
    /// The engine error underneath, if this failure came from the engine.
    pub fn engine_error(&self) -> Option<&EngineError> {
        match self {
            DriverError::Engine { source, .. } => Some(source),
            DriverError::ReadInput { .. } => None,
        }
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            DriverError::Engine { stage, .. } => Some(*stage),
            DriverError::ReadInput { .. } => None,
        }
    }
}

/// Result alias used throughout the driver.
pub type Result<T> = std::result::Result<T, DriverError>;

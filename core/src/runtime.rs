use crate::{
    basis::Basis,
    engine::{Engine, OutputLevel},
    error::{DriverError, Result, Stage},
    input::{Input, Model},
    keywords::KeywordSection,
    molecule::Molecule,
    scf::ScfResult,
};

/// Scoped handle to an initialized engine runtime.
///
/// Construction runs [`Engine::initialize`]; the engine is finalized exactly
/// once on every exit path, either through [`Runtime::finalize`] or on drop.
/// Pipeline stages are only reachable through this guard, so no stage can run
/// outside an initialize/finalize window.
#[derive(Debug)]
pub struct Runtime<E: Engine> {
    engine: E,
    finalized: bool,
}

impl<E: Engine> Runtime<E> {
    pub fn initialize(mut engine: E) -> Result<Self> {
        engine.initialize().map_err(|source| DriverError::Engine {
            stage: Stage::Initialize,
            source,
        })?;

        Ok(Self {
            engine,
            finalized: false,
        })
    }

    pub fn parse_input(&mut self, source: &str, output: OutputLevel) -> Result<Input> {
        self.engine
            .parse_input(source, output)
            .map_err(|source| DriverError::Engine {
                stage: Stage::ParseInput,
                source,
            })
    }

    pub fn build_basis(
        &mut self,
        molecule: &Molecule,
        model: &Model,
        output: OutputLevel,
    ) -> Result<(Molecule, Basis)> {
        self.engine
            .build_basis(molecule, model, output)
            .map_err(|source| DriverError::Engine {
                stage: Stage::BuildBasis,
                source,
            })
    }

    pub fn run_scf(
        &mut self,
        molecule: &Molecule,
        basis: &Basis,
        keywords: &KeywordSection,
        output: OutputLevel,
    ) -> Result<ScfResult> {
        self.engine
            .run_scf(molecule, basis, keywords, output)
            .map_err(|source| DriverError::Engine {
                stage: Stage::Scf,
                source,
            })
    }

    /// Clears the engine's per-calculation state so the runtime can serve
    /// another run.
    pub fn reset(&mut self) -> Result<()> {
        self.engine.reset().map_err(|source| DriverError::Engine {
            stage: Stage::Reset,
            source,
        })
    }

    /// Tears the engine down, reporting a teardown failure to the caller.
    /// After this the guard is gone and drop will not finalize again.
    pub fn finalize(mut self) -> Result<()> {
        self.finalized = true;
        self.engine.finalize().map_err(|source| DriverError::Engine {
            stage: Stage::Finalize,
            source,
        })
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}

impl<E: Engine> Drop for Runtime<E> {
    fn drop(&mut self) {
        if !self.finalized {
            self.finalized = true;
            if let Err(error) = self.engine.finalize() {
                log::error!("engine finalize failed during drop: {error}");
            }
        }
    }
}

use super::{Engine, EngineError, OutputLevel};
use crate::{
    basis::Basis,
    input::{Input, Model},
    keywords::KeywordSection,
    molecule::Molecule,
    periodic_table::Element,
    scf::{ScfOptions, ScfResult},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Lifecycle {
    Uninitialized,
    Ready,
    Finalized,
}

/// An in-process engine that implements the full pipeline contract without
/// any SCF numerics: input parsing and basis bookkeeping are real, the SCF
/// stage reports the nuclear repulsion energy of the geometry.
///
/// It exists so the driver and CLI can run end to end, and so lifecycle
/// misuse surfaces as an error instead of silent state corruption. Real
/// backends implement [`Engine`] the same way.
#[derive(Debug)]
pub struct StubEngine {
    lifecycle: Lifecycle,
}

impl StubEngine {
    pub fn new() -> Self {
        Self {
            lifecycle: Lifecycle::Uninitialized,
        }
    }

    fn ready(&self, operation: &'static str) -> Result<(), EngineError> {
        match self.lifecycle {
            Lifecycle::Ready => Ok(()),
            Lifecycle::Uninitialized => {
                Err(EngineError::new(operation, "engine is not initialized"))
            }
            Lifecycle::Finalized => Err(EngineError::new(operation, "engine is finalized")),
        }
    }
}

impl Default for StubEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Basis-function count an atom contributes in the basis sets the stub
/// knows about.
fn functions_for(basis: &str, element: Element) -> Option<usize> {
    let n = element.atomic_number();
    match basis {
        "sto-3g" => match n {
            1..=2 => Some(1),
            3..=10 => Some(5),
            11..=18 => Some(9),
            _ => None,
        },
        "6-31g" => match n {
            1..=2 => Some(2),
            3..=10 => Some(9),
            11..=18 => Some(13),
            _ => None,
        },
        "6-31g*" => match n {
            1..=2 => Some(2),
            3..=10 => Some(15),
            11..=18 => Some(19),
            _ => None,
        },
        _ => None,
    }
}

impl Engine for StubEngine {
    fn initialize(&mut self) -> Result<(), EngineError> {
        if self.lifecycle == Lifecycle::Ready {
            return Err(EngineError::new("initialize", "engine is already initialized"));
        }
        self.lifecycle = Lifecycle::Ready;
        log::debug!("stub engine initialized");
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), EngineError> {
        self.ready("finalize")?;
        self.lifecycle = Lifecycle::Finalized;
        log::debug!("stub engine finalized");
        Ok(())
    }

    fn reset(&mut self) -> Result<(), EngineError> {
        // per-calculation state would be dropped here; the stub keeps none
        self.ready("reset")
    }

    fn parse_input(&mut self, source: &str, output: OutputLevel) -> Result<Input, EngineError> {
        self.ready("parse_input")?;

        let input = Input::from_json(source)
            .map_err(|error| EngineError::new("parse_input", error.to_string()))?;

        if output >= OutputLevel::Verbose {
            log::info!(
                "parsed input: {} atoms, method {}, basis {}",
                input.molecule.atoms().len(),
                input.model.method,
                input.model.basis
            );
        }
        Ok(input)
    }

    fn build_basis(
        &mut self,
        molecule: &Molecule,
        model: &Model,
        output: OutputLevel,
    ) -> Result<(Molecule, Basis), EngineError> {
        self.ready("build_basis")?;

        let name = model.basis.to_lowercase();
        let mut functions_per_atom = Vec::with_capacity(molecule.atoms().len());
        for atom in molecule.atoms() {
            let count = functions_for(&name, atom.element).ok_or_else(|| {
                EngineError::new(
                    "build_basis",
                    format!("no basis `{name}` for element {}", atom.element),
                )
            })?;
            functions_per_atom.push(count);
        }

        let basis = Basis::new(name, functions_per_atom);
        if output >= OutputLevel::Verbose {
            log::info!("built basis {} with {} functions", basis.name(), basis.n_basis());
        }

        // the stub has no geometry normalization to apply
        Ok((molecule.clone(), basis))
    }

    fn run_scf(
        &mut self,
        molecule: &Molecule,
        basis: &Basis,
        keywords: &KeywordSection,
        output: OutputLevel,
    ) -> Result<ScfResult, EngineError> {
        self.ready("run_scf")?;

        let options = ScfOptions::from_section(keywords)
            .map_err(|error| EngineError::new("run_scf", error.to_string()))?;

        let nuclear_repulsion = molecule.nuclear_repulsion();
        if output >= OutputLevel::Minimal {
            log::info!(
                "stub scf: {} electrons in {} basis functions, guess {:?}, up to {} iterations",
                molecule.n_electrons(),
                basis.n_basis(),
                options.guess,
                options.max_iterations
            );
        }

        Ok(ScfResult {
            electronic_energy: 0.0,
            nuclear_repulsion,
            iterations: 0,
            converged: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use serde_json::json;

    use super::StubEngine;
    use crate::engine::{Engine, OutputLevel};
    use crate::keywords::KeywordSection;

    const WATER: &str = r#"{
        "molecule": {
            "symbols": ["O", "H", "H"],
            "geometry": [
                0.0, 0.0, 0.0,
                0.0, 1.43, 1.108,
                0.0, -1.43, 1.108
            ]
        },
        "driver": "energy",
        "model": { "method": "rhf", "basis": "STO-3G" },
        "keywords": { "scf": { "max_iterations": 50 } }
    }"#;

    fn ready_engine() -> StubEngine {
        let mut engine = StubEngine::new();
        engine.initialize().unwrap();
        engine
    }

    #[test]
    fn stages_fail_before_initialize() {
        let mut engine = StubEngine::new();
        assert!(engine.parse_input(WATER, OutputLevel::None).is_err());
        assert!(engine.reset().is_err());
        assert!(engine.finalize().is_err());
    }

    #[test]
    fn double_initialize_is_an_error() {
        let mut engine = ready_engine();
        assert!(engine.initialize().is_err());
    }

    #[test]
    fn finalize_then_initialize_is_allowed() {
        let mut engine = ready_engine();
        engine.finalize().unwrap();
        assert!(engine.finalize().is_err());
        engine.initialize().unwrap();
        engine.finalize().unwrap();
    }

    #[test]
    fn full_pipeline_on_water() {
        let mut engine = ready_engine();

        let input = engine.parse_input(WATER, OutputLevel::None).unwrap();
        let (molecule, basis) = engine
            .build_basis(&input.molecule, &input.model, OutputLevel::None)
            .unwrap();

        // basis names are matched case-insensitively
        assert_eq!(basis.name(), "sto-3g");
        assert_eq!(basis.functions_per_atom(), &[5, 1, 1]);

        let scf = engine
            .run_scf(
                &molecule,
                &basis,
                &input.keywords.section("scf"),
                OutputLevel::None,
            )
            .unwrap();

        assert!(scf.converged);
        assert_relative_eq!(
            scf.total_energy(),
            molecule.nuclear_repulsion(),
            epsilon = 1e-12
        );

        engine.reset().unwrap();
        engine.finalize().unwrap();
    }

    #[test]
    fn unknown_basis_is_an_error() {
        let mut engine = ready_engine();
        let input = engine.parse_input(WATER, OutputLevel::None).unwrap();

        let mut model = input.model.clone();
        model.basis = "cc-pvqz".into();

        let error = engine
            .build_basis(&input.molecule, &model, OutputLevel::None)
            .unwrap_err();
        assert!(error.to_string().contains("cc-pvqz"));
    }

    #[test]
    fn bad_scf_keyword_is_an_error() {
        let mut engine = ready_engine();
        let input = engine.parse_input(WATER, OutputLevel::None).unwrap();
        let (molecule, basis) = engine
            .build_basis(&input.molecule, &input.model, OutputLevel::None)
            .unwrap();

        let keywords: KeywordSection =
            serde_json::from_value(json!({ "guess": "random" })).unwrap();

        assert!(engine
            .run_scf(&molecule, &basis, &keywords, OutputLevel::None)
            .is_err());
    }
}

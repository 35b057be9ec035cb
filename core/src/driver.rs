use std::fs;
use std::path::Path;

use crate::{
    engine::{Engine, OutputLevel},
    error::{DriverError, Result},
    runtime::Runtime,
    scf::ScfResult,
};

/// Runs the full restricted Hartree-Fock pipeline for one input file:
/// parse input, build basis, run SCF with the `scf` keyword section, then
/// reset the engine's per-calculation state.
///
/// The input and basis stages run silently; `output` controls the SCF stage,
/// which is the one with something worth printing. The runtime stays usable
/// for further runs and the caller keeps ownership of finalization.
pub fn run_rhf<E: Engine>(
    runtime: &mut Runtime<E>,
    path: &Path,
    output: OutputLevel,
) -> Result<ScfResult> {
    let source = fs::read_to_string(path).map_err(|source| DriverError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;

    let input = runtime.parse_input(&source, OutputLevel::None)?;
    log::debug!(
        "parsed {}: {} atoms, method {}, basis {}",
        path.display(),
        input.molecule.atoms().len(),
        input.model.method,
        input.model.basis
    );

    let (molecule, basis) = runtime.build_basis(&input.molecule, &input.model, OutputLevel::None)?;
    log::debug!(
        "basis {} holds {} functions",
        basis.name(),
        basis.n_basis()
    );

    let scf_keywords = input.keywords.section("scf");
    let result = runtime.run_scf(&molecule, &basis, &scf_keywords, output)?;

    runtime.reset()?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::run_rhf;
    use crate::engine::OutputLevel;
    use crate::error::{DriverError, Stage};
    use crate::runtime::Runtime;
    use crate::testing::{Call, FailPoint, RecordingEngine};

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
        "model": { "method": "rhf", "basis": "sto-3g" },
        "keywords": {
            "scf": { "max_iterations": 50, "guess": "hcore" },
            "basis": { "cartesian": true }
        }
    }"#;

    struct InputFile(PathBuf);

    impl InputFile {
        fn new(name: &str, contents: &str) -> Self {
            let path = std::env::temp_dir().join(format!("qcdrive-{}-{name}", std::process::id()));
            fs::write(&path, contents).unwrap();
            Self(path)
        }
    }

    impl Drop for InputFile {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }

    #[test]
    fn well_formed_input_yields_a_result_and_one_finalize() {
        let file = InputFile::new("water.json", WATER);
        let (engine, calls) = RecordingEngine::new();
        let mut runtime = Runtime::initialize(engine).unwrap();

        let scf = run_rhf(&mut runtime, &file.0, OutputLevel::Minimal).unwrap();
        assert!(scf.converged);

        runtime.finalize().unwrap();

        let calls = calls.borrow();
        assert!(matches!(
            calls.as_slice(),
            [
                Call::Initialize,
                Call::ParseInput,
                Call::BuildBasis,
                Call::RunScf { .. },
                Call::Reset,
                Call::Finalize
            ]
        ));
    }

    #[test]
    fn scf_stage_receives_exactly_the_scf_section() {
        let file = InputFile::new("water-sections.json", WATER);
        let (engine, calls) = RecordingEngine::new();
        let mut runtime = Runtime::initialize(engine).unwrap();

        run_rhf(&mut runtime, &file.0, OutputLevel::None).unwrap();

        let calls = calls.borrow();
        let keywords = calls
            .iter()
            .find_map(|call| match call {
                Call::RunScf { keywords } => Some(keywords.clone()),
                _ => None,
            })
            .unwrap();

        // the scf sub-mapping and nothing else; the basis section stays out
        assert_eq!(keywords.len(), 2);
        assert_eq!(keywords["max_iterations"], serde_json::json!(50));
        assert_eq!(keywords["guess"], serde_json::json!("hcore"));
        assert!(!keywords.contains_key("cartesian"));
    }

    #[test]
    fn malformed_input_fails_in_the_parse_stage() {
        let file = InputFile::new("broken.json", "{ this is not json");
        let (engine, calls) = RecordingEngine::new();
        let mut runtime = Runtime::initialize(engine).unwrap();

        let error = run_rhf(&mut runtime, &file.0, OutputLevel::None).unwrap_err();
        assert_eq!(error.stage(), Some(Stage::ParseInput));
        assert!(!error.to_string().is_empty());

        drop(runtime);
        let finalizes = calls
            .borrow()
            .iter()
            .filter(|call| **call == Call::Finalize)
            .count();
        assert_eq!(finalizes, 1);
    }

    #[test]
    fn missing_input_file_is_a_read_error() {
        let (engine, calls) = RecordingEngine::new();
        let mut runtime = Runtime::initialize(engine).unwrap();

        let error = run_rhf(
            &mut runtime,
            std::path::Path::new("/nonexistent/input.json"),
            OutputLevel::None,
        )
        .unwrap_err();

        assert!(matches!(error, DriverError::ReadInput { .. }));
        // the engine never saw a stage call
        assert_eq!(*calls.borrow(), vec![Call::Initialize]);
    }

    #[test]
    fn scf_failure_does_not_reach_reset() {
        let file = InputFile::new("water-scf-fail.json", WATER);
        let (engine, calls) = RecordingEngine::failing_at(FailPoint::RunScf);
        let mut runtime = Runtime::initialize(engine).unwrap();

        let error = run_rhf(&mut runtime, &file.0, OutputLevel::None).unwrap_err();
        assert_eq!(error.stage(), Some(Stage::Scf));
        assert!(!calls.borrow().contains(&Call::Reset));
    }

    #[test]
    fn reset_failure_is_surfaced() {
        let file = InputFile::new("water-reset-fail.json", WATER);
        let (engine, _calls) = RecordingEngine::failing_at(FailPoint::Reset);
        let mut runtime = Runtime::initialize(engine).unwrap();

        let error = run_rhf(&mut runtime, &file.0, OutputLevel::None).unwrap_err();
        assert_eq!(error.stage(), Some(Stage::Reset));
    }

    #[test]
    fn runtime_survives_for_a_second_run() {
        let file = InputFile::new("water-twice.json", WATER);
        let (engine, calls) = RecordingEngine::new();
        let mut runtime = Runtime::initialize(engine).unwrap();

        run_rhf(&mut runtime, &file.0, OutputLevel::None).unwrap();
        run_rhf(&mut runtime, &file.0, OutputLevel::None).unwrap();
        runtime.finalize().unwrap();

        let calls = calls.borrow();
        assert_eq!(
            calls.iter().filter(|c| **c == Call::Initialize).count(),
            1
        );
        assert_eq!(calls.iter().filter(|c| **c == Call::Reset).count(), 2);
        assert_eq!(calls.iter().filter(|c| **c == Call::Finalize).count(), 1);
    }
}

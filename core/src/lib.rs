pub mod basis;
pub mod driver;
pub mod engine;
pub mod error;
pub mod input;
pub mod keywords;
pub mod molecule;
pub mod periodic_table;
pub mod runtime;
pub mod scf;

pub use driver::run_rhf;
pub use engine::{Engine, EngineError, OutputLevel};
pub use error::{DriverError, Stage};
pub use runtime::Runtime;
pub use scf::ScfResult;

pub mod testing {
    //! Engine test doubles, for exercising the driver and for downstream
    //! engine implementors to test their own plumbing against.

    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::{
        basis::Basis,
        engine::{Engine, EngineError, OutputLevel},
        input::{Input, Model},
        keywords::KeywordSection,
        molecule::Molecule,
        scf::ScfResult,
    };

    /// One recorded engine call. `RunScf` keeps the keyword section it was
    /// handed so keyword routing can be asserted.
    #[derive(Clone, Debug, PartialEq)]
    pub enum Call {
        Initialize,
        ParseInput,
        BuildBasis,
        RunScf { keywords: KeywordSection },
        Reset,
        Finalize,
    }

    /// Shared view of the calls a [`RecordingEngine`] has seen, alive even
    /// after the engine itself moved into a runtime guard.
    pub type CallLog = Rc<RefCell<Vec<Call>>>;

    /// Operations a [`RecordingEngine`] can be made to fail at.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub enum FailPoint {
        Initialize,
        ParseInput,
        BuildBasis,
        RunScf,
        Reset,
        Finalize,
    }

    /// An [`Engine`] that records every call and can inject a failure at a
    /// chosen operation. Input parsing is real, so malformed documents fail
    /// the way they would against a live engine.
    #[derive(Debug)]
    pub struct RecordingEngine {
        calls: CallLog,
        fail_at: Option<FailPoint>,
    }

    impl RecordingEngine {
        pub fn new() -> (Self, CallLog) {
            Self::with_failure(None)
        }

        pub fn failing_at(point: FailPoint) -> (Self, CallLog) {
            Self::with_failure(Some(point))
        }

        fn with_failure(fail_at: Option<FailPoint>) -> (Self, CallLog) {
            let calls = CallLog::default();
            (
                Self {
                    calls: Rc::clone(&calls),
                    fail_at,
                },
                calls,
            )
        }

        fn record(&self, call: Call) {
            self.calls.borrow_mut().push(call);
        }

        fn injected(
            &self,
            point: FailPoint,
            operation: &'static str,
        ) -> Result<(), EngineError> {
            if self.fail_at == Some(point) {
                Err(EngineError::new(operation, "injected failure"))
            } else {
                Ok(())
            }
        }
    }

    impl Engine for RecordingEngine {
        fn initialize(&mut self) -> Result<(), EngineError> {
            self.record(Call::Initialize);
            self.injected(FailPoint::Initialize, "initialize")
        }

        fn finalize(&mut self) -> Result<(), EngineError> {
            self.record(Call::Finalize);
            self.injected(FailPoint::Finalize, "finalize")
        }

        fn reset(&mut self) -> Result<(), EngineError> {
            self.record(Call::Reset);
            self.injected(FailPoint::Reset, "reset")
        }

        fn parse_input(
            &mut self,
            source: &str,
            _output: OutputLevel,
        ) -> Result<Input, EngineError> {
            self.record(Call::ParseInput);
            self.injected(FailPoint::ParseInput, "parse_input")?;

            Input::from_json(source)
                .map_err(|error| EngineError::new("parse_input", error.to_string()))
        }

        fn build_basis(
            &mut self,
            molecule: &Molecule,
            model: &Model,
            _output: OutputLevel,
        ) -> Result<(Molecule, Basis), EngineError> {
            self.record(Call::BuildBasis);
            self.injected(FailPoint::BuildBasis, "build_basis")?;

            let functions_per_atom = vec![1; molecule.atoms().len()];
            Ok((
                molecule.clone(),
                Basis::new(model.basis.as_str(), functions_per_atom),
            ))
        }

        fn run_scf(
            &mut self,
            molecule: &Molecule,
            _basis: &Basis,
            keywords: &KeywordSection,
            _output: OutputLevel,
        ) -> Result<ScfResult, EngineError> {
            self.record(Call::RunScf {
                keywords: keywords.clone(),
            });
            self.injected(FailPoint::RunScf, "run_scf")?;

            Ok(ScfResult {
                electronic_energy: 0.0,
                nuclear_repulsion: molecule.nuclear_repulsion(),
                iterations: 1,
                converged: true,
            })
        }
    }
}

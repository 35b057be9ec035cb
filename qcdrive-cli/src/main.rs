use std::{path::PathBuf, time::Instant};

use clap::Parser;
use qcdrive_core::{engine::stub::StubEngine, run_rhf, OutputLevel, Runtime};

/// Minimal restricted Hartree-Fock driver: parses an input file, builds a
/// basis set and runs the SCF calculation on the configured engine.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the input file
    input: PathBuf,

    /// How much output the engine should produce while the SCF stage runs
    #[arg(long, short, default_value_t = OutputLevel::Minimal)]
    output: OutputLevel,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args = Args::parse();

    let mut runtime = Runtime::initialize(StubEngine::new())?;

    let start = Instant::now();
    match run_rhf(&mut runtime, &args.input, args.output) {
        Ok(scf) => {
            println!(
                "scf finished after {} iterations and {:0.2?}",
                scf.iterations,
                start.elapsed()
            );
            println!("converged: {}", scf.converged);
            println!("nuclear repulsion energy: {:3.3}", scf.nuclear_repulsion);
            println!("electronic energy: {:3.3}", scf.electronic_energy);
            println!("total energy: {:3.3}", scf.total_energy());

            runtime.finalize()?;
            Ok(())
        }
        Err(error) => {
            if let Some(engine_error) = error.engine_error() {
                log::debug!("engine backtrace:\n{}", engine_error.backtrace());
            }

            // teardown still has to happen once, but the stage failure is
            // the error worth reporting
            if let Err(finalize_error) = runtime.finalize() {
                log::error!("engine finalize failed: {finalize_error}");
            }

            Err(error.into())
        }
    }
}

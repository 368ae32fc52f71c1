use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;
use tursim::{Config, Program, ProgramLoader, Report, TuringMachine, DEFAULT_SOURCE};

/// Runs every input of a machine description and prints the transitions taken
/// and whether each input was accepted.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// The machine description file
    #[clap(default_value = DEFAULT_SOURCE)]
    source: PathBuf,

    /// Reject an input after this many transitions instead of running until it halts
    #[clap(long)]
    max_steps: Option<usize>,

    /// Print one JSON report per input instead of the text trace
    #[clap(long)]
    json: bool,
}

fn main() {
    // Logs go to stderr; stdout carries only the trace and summary lines.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::default().with_max_steps(cli.max_steps);

    let program = match ProgramLoader::load_program_with(&cli.source, &config) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let stdout = io::stdout();
    if let Err(e) = simulate(&program, &config, cli.json, &mut stdout.lock()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Runs each input in order, writing its trace and summary before moving on.
fn simulate<W: Write>(
    program: &Program,
    config: &Config,
    json: bool,
    out: &mut W,
) -> io::Result<()> {
    for (i, input) in program.inputs.iter().enumerate() {
        let index = i + 1;
        tracing::debug!(index, input = %input, "running input");

        let report = match TuringMachine::new(&program.definition, input, config) {
            Ok(mut machine) => {
                let mut written = Ok(());
                let halt = machine.run_with(|event| {
                    if !json && written.is_ok() {
                        written = writeln!(out, "{event}");
                    }
                });
                written?;

                Report::new(index, input, &halt, machine.trace().to_vec())
            }
            Err(e) => Report::failed(index, input, &e),
        };

        if json {
            writeln!(out, "{}", report.to_json()?)?;
        } else {
            if let Some(line) = report.diagnostic_line() {
                writeln!(out, "{line}")?;
            }
            writeln!(out, "{}", report.summary())?;
        }
    }

    out.flush()
}

use std::fs;
use std::io::{stdout, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use miette::{bail, IntoDiagnostic, Result};
use tracing_subscriber::EnvFilter;

use ls8::Cpu;

/// ls8 runs LS-8 program images on an 8-bit virtual CPU.
#[derive(Parser)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Quickly provide a `.ls8` file to run
    path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a `.ls8` program image and print its output to the terminal
    Run {
        /// `.ls8` file to run
        name: PathBuf,
        /// Produce minimal output, suited for blackbox tests
        #[arg(short, long)]
        minimal: bool,
        /// Give up after this many instructions (overrides `LS8_STEP_LIMIT`)
        #[arg(long)]
        max_steps: Option<u64>,
    },
    /// Check a `.ls8` file parses without running it
    Check {
        /// File to check
        name: PathBuf,
    },
}

fn main() -> miette::Result<()> {
    use MsgColor::*;
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(ls8::env::LOG_VAR).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    ls8::env::init();

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new() //
                .context_lines(ls8::DIAGNOSTIC_CONTEXT_LINES)
                .build(),
        )
    }))?;

    match args.command {
        Some(Command::Run {
            name,
            minimal,
            max_steps,
        }) => run(&name, minimal, max_steps),
        Some(Command::Check { name }) => {
            file_message(Green, "Checking", &name);
            let image = load(&name)?;
            message(Green, "Success", &format!("{} bytes, no errors found!", image.len()));
            Ok(())
        }
        None => {
            if let Some(path) = args.path {
                run(&path, false, None)
            } else {
                println!("\n~ ls8 v{VERSION} ~");
                println!("{SHORT_INFO}");
                Ok(())
            }
        }
    }
}

#[allow(unused)]
enum MsgColor {
    Green,
    Cyan,
    Red,
}

fn file_message(color: MsgColor, left: &str, right: &Path) {
    let right = format!("target {}", right.display());
    message(color, left, &right);
}

fn message(color: MsgColor, left: &str, right: &str) {
    let left = match color {
        MsgColor::Green => left.green(),
        MsgColor::Cyan => left.cyan(),
        MsgColor::Red => left.red(),
    };
    println!("{left:>12} {right}");
}

fn run(name: &Path, minimal: bool, max_steps: Option<u64>) -> Result<()> {
    if !minimal {
        file_message(MsgColor::Green, "Loading", name);
    }
    let image = load(name)?;
    let mut cpu = Cpu::from_image(&image)?;

    if !minimal {
        message(MsgColor::Green, "Running", "program image");
    }
    let limit = max_steps.or_else(ls8::env::step_limit);
    let mut out = stdout().lock();
    let steps = cpu.run_with_limit(&mut out, limit)?;
    out.flush().into_diagnostic()?;
    drop(out);

    if !minimal {
        message(MsgColor::Cyan, "Halted", &format!("after {steps} steps"));
    }
    Ok(())
}

/// Read and parse a program image from disk.
fn load(name: &Path) -> Result<Vec<u8>> {
    match name.extension().and_then(|ext| ext.to_str()) {
        Some("ls8") => (),
        Some(_) => bail!("File has unknown extension. Exiting..."),
        None => bail!("File has no extension. Exiting..."),
    }
    let src = fs::read_to_string(name).into_diagnostic()?;
    ls8::parse_image(&src)
}

const SHORT_INFO: &str = r"
Welcome to ls8, an interpreter for LS-8 program images.
Please use `-h` or `--help` to access the usage instructions.
";

const VERSION: &str = env!("CARGO_PKG_VERSION");

use clap::Parser;
use std::process::ExitCode;

use relayout::{defaults, migrate, Error};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Runs over the fixed project file list in the working directory.
/// Optional overrides are read from relayout.json next to the project files.
#[derive(Parser)]
#[command(name = "relayout")]
#[command(version = VERSION)]
#[command(about = "Update Visual Studio project files for the src/ and include/ directory layout")]
struct Cli {}

fn main() -> ExitCode {
    let _cli = Cli::parse();

    let root = match std::env::current_dir() {
        Ok(root) => root,
        Err(e) => {
            return fail(&Error::internal_io(
                e.to_string(),
                Some("resolve working directory".to_string()),
            ))
        }
    };

    let config = match defaults::load_config(&root) {
        Ok(config) => config,
        Err(err) => return fail(&err),
    };
    let rules = match config.rules() {
        Ok(rules) => rules,
        Err(err) => return fail(&err),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match migrate::run(&root, &config.project_files, &rules, &mut out) {
        Ok(_) => ExitCode::SUCCESS,
        // The orchestrator already printed the error line.
        Err(err) => ExitCode::from(exit_code_to_u8(err.code.exit_code())),
    }
}

fn fail(err: &Error) -> ExitCode {
    eprintln!("Error: {}", err);
    for hint in &err.hints {
        eprintln!("  hint: {}", hint.message);
    }
    ExitCode::from(exit_code_to_u8(err.code.exit_code()))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        1
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}

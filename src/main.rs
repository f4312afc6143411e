//! resmatch - match and allocate skilled resources to project tasks

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = resource_matcher::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

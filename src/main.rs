//! catalog-tidy - Normalizes connector catalog component definitions

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = catalog_tidy::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

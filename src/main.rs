//! taskheap - priority task queue with dependencies

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = taskheap::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

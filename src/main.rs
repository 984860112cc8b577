//! Binary entrypoint for the `code-obituary` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    match code_obituary::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#![forbid(unsafe_code)]

use std::process::ExitCode;

fn main() -> ExitCode {
    backoffice_cli::main_entry()
}

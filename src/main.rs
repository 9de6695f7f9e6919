//! Asepix - Command-line tool for flattening Aseprite documents to PNG

use std::process::ExitCode;

use asepix::cli;

fn main() -> ExitCode {
    cli::run()
}

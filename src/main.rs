//! copy-views - Command-line tool for writing the views copy manifest

use std::process::ExitCode;

use copy_views::cli;

fn main() -> ExitCode {
    cli::run()
}

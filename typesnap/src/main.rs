use clap::Parser;
use std::process::ExitCode;
use typesnap::cli::{Cli, init_tracing};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("typesnap: {e}");
            ExitCode::FAILURE
        }
    }
}

use clap::Parser;
use cryptrader::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}

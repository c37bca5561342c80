//! graphon CLI entry point

use clap::Parser;
use graphon::cli::args::{Cli, Command};
use std::process;

fn main() {
    let cli = Cli::parse();
    let color = cli.color.to_termcolor();

    let exit_code = match &cli.command {
        Command::Transcribe(args) => graphon::cli::transcribe::run_transcribe(args, color),
        Command::Syllabify(args) => graphon::cli::syllabify::run_syllabify(args, color),
    };

    process::exit(exit_code);
}

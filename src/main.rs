use std::process;

use clap::Parser;

use importcop::cli::Args;

fn main() {
    let args = Args::parse();
    match importcop::run(args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(2);
        }
    }
}

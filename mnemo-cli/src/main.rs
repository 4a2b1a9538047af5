//! Mnemo - regenerate BIP-39 wallet mnemonics from a single master seed.
//!
//! Everything runs locally; nothing is stored or sent anywhere.

mod commands;
mod logging;

use clap::Parser;
use commands::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Some(Commands::Validate(cmd)) => cmd.execute()?,
        None => cli.generate.execute()?,
    }
    Ok(())
}

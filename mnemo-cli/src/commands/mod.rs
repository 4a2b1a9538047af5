//! CLI command definitions and handlers.

mod generate;
mod validate;

use clap::{ArgAction, Parser, Subcommand};
pub use generate::GenerateArgs;
pub use validate::ValidateCommand;

/// Mnemo - regenerate BIP-39 wallet phrases from one master seed.
#[derive(Parser)]
#[command(name = "mnemo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub generate: GenerateArgs,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Available commands besides generation.
#[derive(Subcommand)]
pub enum Commands {
    /// Check whether a phrase is a valid BIP-39 mnemonic.
    Validate(ValidateCommand),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use mnemo::WordCount;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn positional_defaults() {
        let cli = Cli::try_parse_from(["mnemo", "my seed"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.generate.master_seed.as_deref(), Some("my seed"));
        assert_eq!(cli.generate.count, 3);
        assert_eq!(cli.generate.word_count, WordCount::Words12);
    }

    #[test]
    fn positional_overrides() {
        let cli = Cli::try_parse_from(["mnemo", "seed", "5", "24", "-i", "500"]).unwrap();
        assert_eq!(cli.generate.count, 5);
        assert_eq!(cli.generate.word_count, WordCount::Words24);
        assert_eq!(cli.generate.iterations, 500);
    }

    #[test]
    fn bad_numbers_are_errors() {
        assert!(Cli::try_parse_from(["mnemo", "seed", "three"]).is_err());
        assert!(Cli::try_parse_from(["mnemo", "seed", "3", "13"]).is_err());
        assert!(Cli::try_parse_from(["mnemo", "seed", "3", "12", "-i", "many"]).is_err());
    }

    #[test]
    fn seed_is_optional() {
        let cli = Cli::try_parse_from(["mnemo"]).unwrap();
        assert!(cli.generate.master_seed.is_none());
    }

    #[test]
    fn validate_subcommand() {
        let cli = Cli::try_parse_from(["mnemo", "validate", "abandon about"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Validate(_))));
    }

    #[test]
    fn verbose_flag_before_or_after_subcommand() {
        for argv in [
            ["mnemo", "-v", "validate", "abandon about"],
            ["mnemo", "validate", "-v", "abandon about"],
        ] {
            let cli = Cli::try_parse_from(argv).unwrap();
            assert!(matches!(cli.command, Some(Commands::Validate(_))), "{argv:?}");
            assert_eq!(cli.verbose, 1);
        }
    }

    #[test]
    fn verbose_flag_with_generation() {
        let cli = Cli::try_parse_from(["mnemo", "-vv", "seed", "2"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.generate.count, 2);
    }
}

//! Mnemonic validation command.

use clap::Args;
use colored::Colorize;
use mnemo::mnemonic_to_entropy;
use zeroize::Zeroizing;

/// Check a BIP-39 phrase.
#[derive(Args)]
pub struct ValidateCommand {
    /// BIP-39 mnemonic phrase to check.
    phrase: String,
}

impl ValidateCommand {
    /// Execute the validate command.
    ///
    /// An invalid phrase is reported as an error so the process exits
    /// non-zero.
    pub fn execute(self) -> Result<(), Box<dyn std::error::Error>> {
        let phrase = Zeroizing::new(self.phrase);
        let words = phrase.split_whitespace().count();
        match mnemonic_to_entropy(&phrase) {
            Ok(_) => {
                print_result(words, true);
                Ok(())
            }
            Err(e) => {
                print_result(words, false);
                Err(e.into())
            }
        }
    }
}

/// Display the validation result.
#[rustfmt::skip]
fn print_result(words: usize, valid: bool) {
    let status = if valid { "valid".green() } else { "invalid".red() };

    println!();
    println!("      {}        {words} words", "Words".cyan().bold());
    println!("      {}       {status}", "Status".cyan().bold());
    println!();
}

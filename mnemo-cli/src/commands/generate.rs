//! Wallet generation from a master seed.

use std::fmt;
use std::io::{IsTerminal, Write};

use clap::{Args, CommandFactory};
use colored::Colorize;
use mnemo::config::{DEFAULT_ITERATIONS, DEFAULT_MAX_PARALLELISM};
use mnemo::{validate_mnemonic, Batch, BatchRequest, Config, MasterSeed, Progress, WordCount};
use tracing::debug;
use zeroize::Zeroizing;

use super::Cli;

/// Positional and tuning arguments for generation.
#[derive(Args)]
pub struct GenerateArgs {
    /// Your master seed (keep this secret!).
    ///
    /// With --passphrase this must be an existing BIP-39 phrase instead.
    pub master_seed: Option<String>,

    /// Number of wallets to generate.
    #[arg(default_value_t = 3)]
    pub count: u32,

    /// Words per mnemonic (12, 15, 18, 21, or 24).
    #[arg(default_value = "12")]
    pub word_count: WordCount,

    /// PBKDF2 iterations (higher is slower to brute force).
    #[arg(short, long, env = "MNEMO_ITERATIONS", default_value_t = DEFAULT_ITERATIONS)]
    pub iterations: u32,

    /// Maximum number of parallel workers.
    #[arg(short, long, env = "MNEMO_JOBS", default_value_t = DEFAULT_MAX_PARALLELISM)]
    pub jobs: usize,

    /// Password for plausible deniability mode.
    ///
    /// The master seed is then read as an existing BIP-39 phrase and combined
    /// with this password; the same phrase yields different wallets for
    /// different passwords.
    #[arg(short, long, env = "MNEMO_PASSPHRASE", hide_env_values = true)]
    pub passphrase: Option<String>,

    /// Do not draw the progress indicator.
    #[arg(long)]
    pub no_progress: bool,
}

impl GenerateArgs {
    /// Execute the generate command.
    ///
    /// Without a master seed this prints usage and returns [`MissingSeed`].
    pub fn execute(mut self) -> Result<(), Box<dyn std::error::Error>> {
        let Some(master_seed) = self.master_seed.take().map(Zeroizing::new) else {
            print_usage();
            return Err(MissingSeed.into());
        };
        let passphrase = self.passphrase.take().map(Zeroizing::new);

        let config = Config::default().with_max_parallelism(self.jobs);
        let seed = match passphrase.as_deref() {
            Some(password) => MasterSeed::with_passphrase(&master_seed, password)?,
            None => MasterSeed::new(master_seed.as_str())?,
        };
        let request = BatchRequest::new(seed, self.count, self.word_count, self.iterations);
        let mut batch = Batch::new(request, &config)?;
        debug!(
            count = self.count,
            word_count = %self.word_count,
            iterations = self.iterations,
            workers = batch.workers(),
            deniability = passphrase.is_some(),
            "generating wallets"
        );

        print_header(self.count, self.word_count);

        let show_progress = !self.no_progress && std::io::stderr().is_terminal();
        let runtime = tokio::runtime::Builder::new_current_thread().build()?;
        let phrases = runtime.block_on(batch.run_async(|progress| {
            if show_progress {
                draw_progress(progress);
            }
        }));
        if show_progress {
            clear_progress();
        }

        for (index, phrase) in phrases?.iter().enumerate() {
            print_wallet(index, phrase);
        }
        print_footer();
        Ok(())
    }
}

/// No master seed was given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingSeed;

impl fmt::Display for MissingSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("missing required argument <MASTER_SEED>")
    }
}

impl std::error::Error for MissingSeed {}

fn draw_progress(progress: Progress) {
    let mut stderr = std::io::stderr().lock();
    let _ = write!(
        stderr,
        "\r      {}   {:>3}% ({}/{})",
        "Generating".cyan().bold(),
        progress.percent(),
        progress.completed,
        progress.total
    );
    let _ = stderr.flush();
}

fn clear_progress() {
    let mut stderr = std::io::stderr().lock();
    let _ = write!(stderr, "\r\x1b[2K");
    let _ = stderr.flush();
}

fn print_usage() {
    let _ = Cli::command().print_help();
    println!();
    println!("{}", "SECURITY WARNING:".red().bold());
    println!("  - Keep your master seed absolutely secret");
    println!("  - Anyone with your master seed can generate all your wallet mnemonics");
    println!("  - Store it securely offline (paper backup, encrypted storage, etc.)");
    println!("  - Never share it or commit it to version control");
}

#[rustfmt::skip]
fn print_header(count: u32, word_count: WordCount) {
    println!();
    println!("      {}      {count}", "Wallets".cyan().bold());
    println!("      {}        {word_count}", "Words".cyan().bold());
}

#[rustfmt::skip]
fn print_wallet(index: usize, phrase: &str) {
    let valid = if validate_mnemonic(phrase) { "✓".green() } else { "✗".red() };

    println!();
    println!("      {}   {phrase}", format!("Wallet #{}", index + 1).cyan().bold());
    println!("      {}        {valid}", "Valid".cyan().bold());
}

fn print_footer() {
    println!();
    println!("{}", "IMPORTANT:".yellow().bold());
    println!("  - Test each wallet with a small amount first");
    println!("  - Keep your master seed safe - it can regenerate all these mnemonics");
    println!("  - These mnemonics are deterministic - same seed + index = same mnemonic");
    println!();
}

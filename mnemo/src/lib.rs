//! # Mnemo - Deterministic BIP-39 Mnemonic Derivation
//!
//! Derive any number of independent BIP-39 wallet phrases from a single
//! secret master seed plus a wallet index. Nothing needs to be stored: the
//! same master seed always regenerates the same phrases.
//!
//! ## How It Works
//!
//! 1. `"{master_seed}:wallet:{index}"` is stretched with PBKDF2-HMAC-SHA256
//!    into 16 to 32 bytes of entropy.
//! 2. The entropy is encoded as a standard English BIP-39 phrase.
//! 3. Batches spread the indices over a small worker pool and return the
//!    phrases in index order.
//!
//! ## Features
//!
//! - **Interoperable**: phrases restore in any BIP-39 wallet
//! - **Tunable cost**: the PBKDF2 iteration count slows down seed guessing
//! - **Secure by design**: seeds, entropy and phrases are zeroized on drop
//! - `async` (default): non-blocking batches on the tokio blocking pool
//!
//! # Example
//!
//! ```
//! use mnemo::{generate_batch, BatchRequest, Config, MasterSeed, WordCount};
//!
//! let seed = MasterSeed::new("my-super-secret-master-seed")?;
//! let request = BatchRequest::new(seed, 3, WordCount::Words12, 10_000);
//! let phrases = generate_batch(request, &Config::default(), |p| {
//!     println!("{}%", p.percent());
//! })?;
//! assert_eq!(phrases.len(), 3);
//! # Ok::<(), mnemo::Error>(())
//! ```

#![warn(
    missing_docs,
    rust_2018_idioms,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::doc_markdown,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless,
    clippy::needless_pass_by_value,
    clippy::significant_drop_tightening
)]
#![forbid(unsafe_code)]

pub mod batch;
pub mod config;
pub mod deriver;
pub mod entropy;
pub mod error;
pub mod mnemonic;
pub mod secret;
pub mod traits;
pub mod types;

#[cfg(feature = "async")]
pub use batch::generate_batch_async;
pub use batch::{generate_batch, Batch, BatchRequest, BatchResult, BatchState};
pub use config::Config;
pub use deriver::{generate_mnemonic, generate_mnemonics, Deriver};
pub use entropy::{derive_entropy, DerivationRequest};
pub use error::{Error, ErrorKind, PhraseError, Result};
pub use mnemonic::{entropy_to_mnemonic, mnemonic_to_entropy, validate_mnemonic};
pub use secret::{GenerationForm, MasterSeed, SecretInput};
pub use traits::DeriveMnemonic;
pub use types::{ParseWordCountError, Progress, WordCount};

//! Password-based entropy derivation.
//!
//! Each wallet slot gets its own entropy by stretching
//! `"{master_seed}:wallet:{index}"` through PBKDF2-HMAC-SHA256 with a fixed,
//! application specific salt. The iteration count is the cost knob: every
//! guess of the master seed costs an attacker the same work.
//!
//! The salt and password layout are part of the output format. Changing
//! either makes previously generated phrases unrecoverable.

use core::fmt::Write as _;

use hmac::Hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::{Error, MasterSeed, Result, WordCount};

/// Fixed salt for deterministic entropy derivation.
pub const PBKDF2_SALT: &[u8] = b"wallet-mnemonic-salt";

/// Separator between the master seed and the wallet index.
const INDEX_TAG: &str = ":wallet:";

/// Derive `entropy_len` bytes of entropy for wallet `index`.
///
/// # Arguments
///
/// * `seed` - The master seed
/// * `index` - Wallet slot, starting at 0
/// * `iterations` - PBKDF2 round count, at least 1
/// * `entropy_len` - 16, 20, 24, 28, or 32 bytes
///
/// # Errors
///
/// Returns [`Error::InvalidEntropyLength`] for unsupported lengths and
/// [`Error::InvalidIterations`] when `iterations` is zero.
pub fn derive_entropy(
    seed: &MasterSeed,
    index: u32,
    iterations: u32,
    entropy_len: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    if WordCount::from_entropy_len(entropy_len).is_none() {
        return Err(Error::InvalidEntropyLength(entropy_len));
    }
    if iterations == 0 {
        return Err(Error::InvalidIterations {
            iterations,
            max: u32::MAX,
        });
    }

    let secret = seed.expose();
    let mut password = Zeroizing::new(String::with_capacity(secret.len() + INDEX_TAG.len() + 10));
    password.push_str(secret);
    password.push_str(INDEX_TAG);
    write!(password, "{index}").map_err(|_| Error::KeyDerivation)?;

    let mut entropy = Zeroizing::new(vec![0u8; entropy_len]);
    pbkdf2::pbkdf2::<Hmac<Sha256>>(password.as_bytes(), PBKDF2_SALT, iterations, &mut entropy)
        .map_err(|_| Error::KeyDerivation)?;
    Ok(entropy)
}

/// One wallet slot to derive.
#[derive(Debug, Clone)]
pub struct DerivationRequest {
    /// Master seed.
    pub seed: MasterSeed,
    /// Wallet slot.
    pub index: u32,
    /// Words in the resulting phrase.
    pub word_count: WordCount,
    /// PBKDF2 iterations.
    pub iterations: u32,
}

impl DerivationRequest {
    /// Derive the entropy for this slot.
    pub fn derive_entropy(&self) -> Result<Zeroizing<Vec<u8>>> {
        derive_entropy(
            &self.seed,
            self.index,
            self.iterations,
            self.word_count.entropy_len(),
        )
    }
}

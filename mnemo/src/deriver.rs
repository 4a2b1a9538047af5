//! Single wallet derivation: entropy, then phrase.

use tracing::trace;
use zeroize::Zeroizing;

use crate::entropy::derive_entropy;
use crate::mnemonic::{entropy_to_mnemonic, mnemonic_to_entropy};
use crate::error::PhraseError;
use crate::{DeriveMnemonic, Error, MasterSeed, Result, WordCount};

/// Derives phrases for any index of one master seed.
///
/// # Example
///
/// ```
/// use mnemo::{Deriver, DeriveMnemonic, MasterSeed, WordCount};
///
/// let seed = MasterSeed::new("correct horse").unwrap();
/// let deriver = Deriver::new(seed, WordCount::Words12, 1_000).unwrap();
/// let first = deriver.derive(0).unwrap();
/// let second = deriver.derive(1).unwrap();
/// assert_ne!(first, second);
/// assert_eq!(first.split(' ').count(), 12);
/// ```
#[derive(Debug, Clone)]
pub struct Deriver {
    seed: MasterSeed,
    word_count: WordCount,
    iterations: u32,
}

impl Deriver {
    /// Create a deriver.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIterations`] when `iterations` is zero.
    pub fn new(seed: MasterSeed, word_count: WordCount, iterations: u32) -> Result<Self> {
        if iterations == 0 {
            return Err(Error::InvalidIterations {
                iterations,
                max: u32::MAX,
            });
        }
        Ok(Self {
            seed,
            word_count,
            iterations,
        })
    }

    /// Words per derived phrase.
    #[inline]
    #[must_use]
    pub const fn word_count(&self) -> WordCount {
        self.word_count
    }

    /// PBKDF2 iterations per derivation.
    #[inline]
    #[must_use]
    pub const fn iterations(&self) -> u32 {
        self.iterations
    }
}

impl DeriveMnemonic for Deriver {
    fn derive(&self, index: u32) -> Result<Zeroizing<String>> {
        trace!(index, "deriving wallet");
        let entropy = derive_entropy(
            &self.seed,
            index,
            self.iterations,
            self.word_count.entropy_len(),
        )?;
        let phrase = entropy_to_mnemonic(&entropy)?;

        // Self-check: the phrase must decode back to the same entropy.
        let decoded = mnemonic_to_entropy(&phrase).map_err(Error::Validation)?;
        if decoded != entropy {
            return Err(Error::Validation(PhraseError::Checksum));
        }
        Ok(phrase)
    }
}

/// Generate the phrase for one wallet slot.
///
/// # Errors
///
/// Returns [`Error::InvalidIterations`] when `iterations` is zero.
pub fn generate_mnemonic(
    seed: &MasterSeed,
    index: u32,
    word_count: WordCount,
    iterations: u32,
) -> Result<Zeroizing<String>> {
    Deriver::new(seed.clone(), word_count, iterations)?.derive(index)
}

/// Generate phrases for slots `0..count` one after another on this thread.
///
/// Produces exactly what [`crate::generate_batch`] returns, without workers.
pub fn generate_mnemonics(
    seed: &MasterSeed,
    count: u32,
    word_count: WordCount,
    iterations: u32,
) -> Result<Vec<Zeroizing<String>>> {
    let deriver = Deriver::new(seed.clone(), word_count, iterations)?;
    (0..count).map(|index| deriver.derive(index)).collect()
}

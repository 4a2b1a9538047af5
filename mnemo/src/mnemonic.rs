//! BIP-39 mnemonic encoding and validation.
//!
//! Entropy is extended with the first `ENT / 32` bits of its SHA-256 digest
//! and the result is cut into 11-bit groups, each indexing the 2048-entry
//! English word list. Both directions go through [`bip39::Mnemonic`], so
//! phrases produced here restore in any BIP-39 compatible wallet.
//!
//! # Example
//!
//! ```
//! use mnemo::mnemonic;
//!
//! let phrase = mnemonic::entropy_to_mnemonic(&[0u8; 16]).unwrap();
//! assert_eq!(
//!     phrase.as_str(),
//!     "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about"
//! );
//! assert!(mnemonic::validate_mnemonic(&phrase));
//! ```

use bip39::{Language, Mnemonic};
use zeroize::Zeroizing;

use crate::error::PhraseError;
use crate::{Error, Result, WordCount};

/// Build the English mnemonic for `entropy`.
fn encode(entropy: &[u8]) -> Result<Mnemonic> {
    if WordCount::from_entropy_len(entropy.len()).is_none() {
        return Err(Error::InvalidEntropyLength(entropy.len()));
    }
    Mnemonic::from_entropy_in(Language::English, entropy)
        .map_err(|_| Error::InvalidEntropyLength(entropy.len()))
}

/// Encode entropy as a list of BIP-39 words.
///
/// # Errors
///
/// Returns [`Error::InvalidEntropyLength`] unless the entropy is 16, 20, 24,
/// 28, or 32 bytes long.
pub fn entropy_to_words(entropy: &[u8]) -> Result<Vec<&'static str>> {
    let mnemonic = encode(entropy)?;
    Ok(mnemonic.words().collect())
}

/// Encode entropy as a space separated BIP-39 phrase.
///
/// # Errors
///
/// Returns [`Error::InvalidEntropyLength`] for unsupported entropy lengths.
pub fn entropy_to_mnemonic(entropy: &[u8]) -> Result<Zeroizing<String>> {
    let mnemonic = encode(entropy)?;
    Ok(Zeroizing::new(mnemonic.to_string()))
}

/// Decode a phrase back into its entropy, verifying the checksum.
///
/// Words may be separated by any amount of whitespace.
///
/// # Errors
///
/// Returns [`PhraseError::WordCount`] for unsupported phrase lengths,
/// [`PhraseError::UnknownWord`] for words outside the list, and
/// [`PhraseError::Checksum`] when the checksum bits do not match.
pub fn mnemonic_to_entropy(phrase: &str) -> core::result::Result<Zeroizing<Vec<u8>>, PhraseError> {
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase)
        .map_err(|err| PhraseError::from_bip39(err, phrase))?;
    Ok(Zeroizing::new(mnemonic.to_entropy()))
}

/// Check that a phrase is a well-formed BIP-39 mnemonic.
pub fn validate_mnemonic(phrase: &str) -> bool {
    mnemonic_to_entropy(phrase).is_ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const ZERO_12: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    const ZERO_24: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon art";

    #[test]
    fn reference_vectors() {
        let vectors: [(&[u8], &str); 6] = [
            (&hex!("00000000000000000000000000000000"), ZERO_12),
            (
                &hex!("7f7f7f7f7f7f7f7f7f7f7f7f7f7f7f7f"),
                "legal winner thank year wave sausage worth useful legal winner thank yellow",
            ),
            (
                &hex!("80808080808080808080808080808080"),
                "letter advice cage absurd amount doctor acoustic avoid letter advice cage above",
            ),
            (
                &hex!("ffffffffffffffffffffffffffffffff"),
                "zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo wrong",
            ),
            (
                &hex!("0000000000000000000000000000000000000000000000000000000000000000"),
                ZERO_24,
            ),
            (
                &hex!("ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"),
                "zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo vote",
            ),
        ];

        for (entropy, phrase) in vectors {
            assert_eq!(entropy_to_mnemonic(entropy).unwrap().as_str(), phrase);
            assert_eq!(mnemonic_to_entropy(phrase).unwrap().as_slice(), entropy);
        }
    }

    #[test]
    fn matches_bip39_crate() {
        for count in WordCount::ALL {
            let entropy: Vec<u8> = (0..count.entropy_len())
                .map(|i| (i as u8).wrapping_mul(37).wrapping_add(11))
                .collect();
            let ours = entropy_to_mnemonic(&entropy).unwrap();
            let theirs = bip39::Mnemonic::from_entropy(&entropy).unwrap().to_string();
            assert_eq!(ours.as_str(), theirs, "{count} words");
        }
    }

    #[test]
    fn words_join_to_phrase() {
        let entropy = hex!("80808080808080808080808080808080");
        let words = entropy_to_words(&entropy).unwrap();
        assert_eq!(words.join(" "), entropy_to_mnemonic(&entropy).unwrap().as_str());
    }

    #[test]
    fn word_count_follows_entropy_length() {
        for count in WordCount::ALL {
            let words = entropy_to_words(&vec![0xa5; count.entropy_len()]).unwrap();
            assert_eq!(words.len(), count.words());
        }
    }

    #[test]
    fn unsupported_entropy_length_rejected() {
        for len in [0, 15, 17, 31, 33, 64] {
            assert!(matches!(
                entropy_to_mnemonic(&vec![0; len]),
                Err(Error::InvalidEntropyLength(l)) if l == len
            ));
        }
    }

    #[test]
    fn wrong_last_word_fails_checksum() {
        let phrase = ZERO_12.replace("about", "abandon");
        assert_eq!(mnemonic_to_entropy(&phrase), Err(PhraseError::Checksum));
        assert!(!validate_mnemonic(&phrase));
    }

    #[test]
    fn unknown_word_reported_with_position() {
        let phrase = ZERO_12.replacen("abandon", "ability", 1).replacen("abandon", "satoshi", 1);
        assert_eq!(
            mnemonic_to_entropy(&phrase),
            Err(PhraseError::UnknownWord {
                position: 1,
                word: "satoshi".into()
            })
        );
    }

    #[test]
    fn unsupported_word_count_rejected() {
        let eleven = ZERO_12.rsplit_once(' ').unwrap().0;
        assert_eq!(mnemonic_to_entropy(eleven), Err(PhraseError::WordCount(11)));
        assert_eq!(mnemonic_to_entropy(""), Err(PhraseError::WordCount(0)));
        assert!(!validate_mnemonic(&format!("{ZERO_12} abandon")));
    }

    #[test]
    fn extra_whitespace_accepted() {
        let spaced = format!("  {}\n", ZERO_12.replace(' ', "   "));
        assert!(validate_mnemonic(&spaced));
    }

    #[test]
    fn uppercase_words_rejected() {
        assert!(!validate_mnemonic(&ZERO_12.to_uppercase()));
    }
}

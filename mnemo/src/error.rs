//! Error types for mnemonic derivation.

use core::fmt;

/// Broad classes of failure, used by callers to decide how to report an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A numeric parameter (word count, iterations, count) is out of range.
    InvalidParameter,
    /// The secret input is malformed (empty seed, bad phrase, password mismatch).
    InvalidSecret,
    /// A derivation task failed while the batch was running.
    WorkerFailure,
    /// A phrase failed the BIP-39 checksum or word-list checks.
    ValidationFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidParameter => "invalid parameter",
            Self::InvalidSecret => "invalid secret",
            Self::WorkerFailure => "worker failure",
            Self::ValidationFailure => "validation failure",
        };
        f.write_str(name)
    }
}

/// Reasons a phrase is not a well-formed BIP-39 mnemonic.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PhraseError {
    /// Word count is not 12, 15, 18, 21, or 24.
    WordCount(usize),
    /// A word is not in the word list.
    UnknownWord {
        /// Zero-based position of the word in the phrase.
        position: usize,
        /// The offending word.
        word: String,
    },
    /// The checksum bits do not match SHA-256 of the entropy.
    Checksum,
    /// Words are not separated by exactly one space.
    Spacing,
}

impl PhraseError {
    /// Translate a `bip39` parse error, recovering the offending word from
    /// `phrase`.
    pub(crate) fn from_bip39(err: bip39::Error, phrase: &str) -> Self {
        match err {
            bip39::Error::BadWordCount(n) => Self::WordCount(n),
            bip39::Error::UnknownWord(position) => Self::UnknownWord {
                position,
                word: phrase
                    .split_whitespace()
                    .nth(position)
                    .unwrap_or_default()
                    .to_owned(),
            },
            // English only: length and language errors cannot come out of parsing.
            bip39::Error::InvalidChecksum
            | bip39::Error::BadEntropyBitCount(_)
            | bip39::Error::AmbiguousLanguages(_) => Self::Checksum,
        }
    }
}

impl fmt::Display for PhraseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WordCount(n) => {
                write!(f, "phrase has {n} words, must be 12, 15, 18, 21, or 24")
            }
            Self::UnknownWord { position, word } => {
                write!(f, "word #{} \"{word}\" is not in the BIP-39 word list", position + 1)
            }
            Self::Checksum => write!(f, "checksum mismatch"),
            Self::Spacing => write!(f, "words must be separated by single spaces"),
        }
    }
}

impl std::error::Error for PhraseError {}

/// Errors that can occur while deriving mnemonics.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// Word count is not one of the supported values.
    InvalidWordCount(usize),
    /// Entropy length does not correspond to a supported word count.
    InvalidEntropyLength(usize),
    /// Iteration count is zero or above the configured maximum.
    InvalidIterations {
        /// The rejected iteration count.
        iterations: u32,
        /// Largest accepted iteration count.
        max: u32,
    },
    /// Wallet count is zero or above the configured maximum.
    InvalidCount {
        /// The rejected wallet count.
        count: u32,
        /// Largest accepted wallet count.
        max: u32,
    },
    /// Worker parallelism must be at least one.
    InvalidParallelism,
    /// Master seed is empty.
    EmptySecret,
    /// The existing phrase supplied for deniability mode is not valid BIP-39.
    InvalidPhrase(PhraseError),
    /// Deniability mode requires a non-empty password.
    EmptyPassword,
    /// Password and its confirmation differ.
    PasswordMismatch,
    /// PBKDF2 rejected the requested output length.
    KeyDerivation,
    /// A derivation task panicked or could not be scheduled.
    Worker {
        /// Index of the wallet slot the task was working on.
        index: u32,
        /// Human readable cause.
        reason: String,
    },
    /// A generated phrase failed its own validation.
    Validation(PhraseError),
    /// A batch was run after it already completed or failed.
    BatchReused,
}

impl Error {
    /// The class this error belongs to.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidWordCount(_)
            | Self::InvalidEntropyLength(_)
            | Self::InvalidIterations { .. }
            | Self::InvalidCount { .. }
            | Self::InvalidParallelism
            | Self::BatchReused => ErrorKind::InvalidParameter,
            Self::EmptySecret
            | Self::InvalidPhrase(_)
            | Self::EmptyPassword
            | Self::PasswordMismatch => ErrorKind::InvalidSecret,
            Self::KeyDerivation | Self::Worker { .. } => ErrorKind::WorkerFailure,
            Self::Validation(_) => ErrorKind::ValidationFailure,
        }
    }

    /// Name of the input field this error refers to, if any.
    ///
    /// Interactive callers use it to attach the message to the right field.
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidWordCount(_) | Self::InvalidEntropyLength(_) => Some("word_count"),
            Self::InvalidIterations { .. } => Some("iterations"),
            Self::InvalidCount { .. } => Some("count"),
            Self::EmptySecret => Some("master_seed"),
            Self::InvalidPhrase(_) => Some("phrase"),
            Self::EmptyPassword => Some("password"),
            Self::PasswordMismatch => Some("confirm_password"),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWordCount(n) => {
                write!(f, "invalid word count {n}, must be 12, 15, 18, 21, or 24")
            }
            Self::InvalidEntropyLength(n) => {
                write!(f, "invalid entropy length {n} bytes, must be 16, 20, 24, 28, or 32")
            }
            Self::InvalidIterations { iterations, max } => {
                write!(f, "iterations must be between 1 and {max}, got {iterations}")
            }
            Self::InvalidCount { count, max } => {
                write!(f, "count must be between 1 and {max}, got {count}")
            }
            Self::InvalidParallelism => write!(f, "parallelism must be at least 1"),
            Self::EmptySecret => write!(f, "master seed must not be empty"),
            Self::InvalidPhrase(e) => write!(f, "invalid BIP-39 seed phrase: {e}"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordMismatch => write!(f, "passwords do not match"),
            Self::KeyDerivation => write!(f, "PBKDF2 key derivation failed"),
            Self::Worker { index, reason } => {
                write!(f, "derivation of wallet {index} failed: {reason}")
            }
            Self::Validation(e) => write!(f, "generated phrase is invalid: {e}"),
            Self::BatchReused => write!(f, "batch has already run"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidPhrase(e) | Self::Validation(e) => Some(e),
            _ => None,
        }
    }
}

/// A convenient Result type alias for mnemo operations.
pub type Result<T> = core::result::Result<T, Error>;

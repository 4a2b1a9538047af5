//! Core types used throughout the library.

use core::fmt;
use core::str::FromStr;

use crate::Error;

/// Supported BIP-39 phrase lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum WordCount {
    /// 12 words, 128 bits of entropy.
    #[default]
    Words12,
    /// 15 words, 160 bits of entropy.
    Words15,
    /// 18 words, 192 bits of entropy.
    Words18,
    /// 21 words, 224 bits of entropy.
    Words21,
    /// 24 words, 256 bits of entropy.
    Words24,
}

impl WordCount {
    /// All supported word counts, shortest first.
    pub const ALL: [Self; 5] = [
        Self::Words12,
        Self::Words15,
        Self::Words18,
        Self::Words21,
        Self::Words24,
    ];

    /// Number of words in the phrase.
    #[inline]
    #[must_use]
    pub const fn words(self) -> usize {
        match self {
            Self::Words12 => 12,
            Self::Words15 => 15,
            Self::Words18 => 18,
            Self::Words21 => 21,
            Self::Words24 => 24,
        }
    }

    /// Entropy length in bytes (`words / 3 * 4`).
    #[inline]
    #[must_use]
    pub const fn entropy_len(self) -> usize {
        self.words() / 3 * 4
    }

    /// Entropy length in bits.
    #[inline]
    #[must_use]
    pub const fn entropy_bits(self) -> usize {
        self.entropy_len() * 8
    }

    /// Checksum length in bits (`ENT / 32`).
    #[inline]
    #[must_use]
    pub const fn checksum_bits(self) -> usize {
        self.entropy_bits() / 32
    }

    /// Look up the word count for a phrase of `words` words.
    pub const fn from_words(words: usize) -> Option<Self> {
        match words {
            12 => Some(Self::Words12),
            15 => Some(Self::Words15),
            18 => Some(Self::Words18),
            21 => Some(Self::Words21),
            24 => Some(Self::Words24),
            _ => None,
        }
    }

    /// Look up the word count whose entropy is `len` bytes long.
    pub const fn from_entropy_len(len: usize) -> Option<Self> {
        match len {
            16 => Some(Self::Words12),
            20 => Some(Self::Words15),
            24 => Some(Self::Words18),
            28 => Some(Self::Words21),
            32 => Some(Self::Words24),
            _ => None,
        }
    }
}

impl fmt::Display for WordCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.words())
    }
}

impl TryFrom<usize> for WordCount {
    type Error = Error;

    fn try_from(words: usize) -> Result<Self, Self::Error> {
        Self::from_words(words).ok_or(Error::InvalidWordCount(words))
    }
}

impl From<WordCount> for usize {
    fn from(count: WordCount) -> Self {
        count.words()
    }
}

/// Error returned when parsing an invalid word count string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWordCountError(String);

impl fmt::Display for ParseWordCountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid word count \"{}\", expected: 12, 15, 18, 21, or 24",
            self.0
        )
    }
}

impl std::error::Error for ParseWordCountError {}

impl FromStr for WordCount {
    type Err = ParseWordCountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<usize>()
            .ok()
            .and_then(Self::from_words)
            .ok_or_else(|| ParseWordCountError(s.to_owned()))
    }
}

/// Snapshot of batch progress, delivered after each finished task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Tasks finished so far, including the one that triggered this report.
    pub completed: u32,
    /// Tasks in the batch.
    pub total: u32,
}

impl Progress {
    /// Completion as a whole percentage, rounded to nearest.
    #[must_use]
    pub fn percent(self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((u64::from(self.completed) * 100 + u64::from(self.total) / 2) / u64::from(self.total))
            .min(100) as u8
    }

    /// Whether every task has finished.
    #[must_use]
    pub const fn is_done(self) -> bool {
        self.completed >= self.total
    }
}

//! Master seed handling and secret input rules.
//!
//! A master seed is either plain text chosen by the user, or, in plausible
//! deniability mode, an existing BIP-39 phrase combined with a password as
//! `"{phrase}:{password}"`. The same phrase then yields different wallets
//! depending on a password that is never written down next to it.

use core::fmt;

use zeroize::Zeroizing;

use crate::config::Config;
use crate::error::PhraseError;
use crate::mnemonic::mnemonic_to_entropy;
use crate::{BatchRequest, Error, Result, WordCount};

/// The user's root secret.
///
/// Held in a zeroizing buffer for the lifetime of a request; never printed
/// by `Debug`.
#[derive(Clone)]
pub struct MasterSeed(Zeroizing<String>);

impl MasterSeed {
    /// Wrap a plain text master seed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySecret`] if the seed is empty or only whitespace.
    pub fn new(seed: impl Into<String>) -> Result<Self> {
        let seed = Zeroizing::new(seed.into());
        if seed.trim().is_empty() {
            return Err(Error::EmptySecret);
        }
        Ok(Self(seed))
    }

    /// Build the deniability-mode composite `"{phrase}:{password}"`.
    ///
    /// The phrase is validated in trimmed form but combined exactly as
    /// entered, so regenerating requires the same input. Inside the trimmed
    /// phrase, words must be separated by exactly one space.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySecret`] for a blank phrase,
    /// [`Error::InvalidPhrase`] if it is not valid BIP-39 or is irregularly
    /// spaced, and
    /// [`Error::EmptyPassword`] for a blank password.
    pub fn with_passphrase(phrase: &str, password: &str) -> Result<Self> {
        let trimmed = phrase.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptySecret);
        }
        if trimmed
            .split(' ')
            .any(|word| word.is_empty() || word.contains(char::is_whitespace))
        {
            return Err(Error::InvalidPhrase(PhraseError::Spacing));
        }
        mnemonic_to_entropy(trimmed).map_err(Error::InvalidPhrase)?;
        if password.trim().is_empty() {
            return Err(Error::EmptyPassword);
        }

        let mut composite = Zeroizing::new(String::with_capacity(phrase.len() + password.len() + 1));
        composite.push_str(phrase);
        composite.push(':');
        composite.push_str(password);
        Ok(Self(composite))
    }

    /// The secret text.
    ///
    /// **Security Warning**: anyone holding this value can regenerate every
    /// derived wallet.
    #[inline]
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for MasterSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterSeed([REDACTED])")
    }
}

/// Secret as entered on the interactive form.
#[derive(Clone)]
pub enum SecretInput {
    /// Free text master seed.
    Text(Zeroizing<String>),
    /// Existing BIP-39 phrase plus a password typed twice.
    Phrase {
        /// Existing mnemonic.
        phrase: Zeroizing<String>,
        /// Password.
        password: Zeroizing<String>,
        /// Password confirmation.
        confirm: Zeroizing<String>,
    },
}

impl SecretInput {
    /// Free text input.
    pub fn text(seed: impl Into<String>) -> Self {
        Self::Text(Zeroizing::new(seed.into()))
    }

    /// Phrase plus password input.
    pub fn phrase(
        phrase: impl Into<String>,
        password: impl Into<String>,
        confirm: impl Into<String>,
    ) -> Self {
        Self::Phrase {
            phrase: Zeroizing::new(phrase.into()),
            password: Zeroizing::new(password.into()),
            confirm: Zeroizing::new(confirm.into()),
        }
    }

    /// Resolve the input into a master seed.
    ///
    /// Checks run in the order the fields appear: phrase, password,
    /// confirmation.
    pub fn into_master_seed(self) -> Result<MasterSeed> {
        match self {
            Self::Text(seed) => MasterSeed::new(seed.as_str()),
            Self::Phrase {
                phrase,
                password,
                confirm,
            } => {
                let seed = MasterSeed::with_passphrase(&phrase, &password)?;
                if password.as_str() != confirm.as_str() {
                    return Err(Error::PasswordMismatch);
                }
                Ok(seed)
            }
        }
    }
}

impl fmt::Debug for SecretInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(_) => f.write_str("SecretInput::Text([REDACTED])"),
            Self::Phrase { .. } => f.write_str("SecretInput::Phrase([REDACTED])"),
        }
    }
}

/// Everything the interactive surface collects before generating.
#[derive(Debug, Clone)]
pub struct GenerationForm {
    /// The secret, in either input mode.
    pub secret: SecretInput,
    /// Number of wallets.
    pub count: u32,
    /// Words per phrase.
    pub word_count: WordCount,
    /// PBKDF2 iterations.
    pub iterations: u32,
}

impl GenerationForm {
    /// Validate the form and turn it into a batch request.
    ///
    /// Nothing is derived here; an error names the offending field through
    /// [`Error::field`].
    pub fn validate(self, config: &Config) -> Result<BatchRequest> {
        let seed = self.secret.into_master_seed()?;
        config.check_count(self.count)?;
        config.check_iterations(self.iterations)?;
        Ok(BatchRequest::new(seed, self.count, self.word_count, self.iterations))
    }
}

//! Traits at the seams between the batch orchestrator and derivation.

use zeroize::Zeroizing;

use crate::Result;

/// Something that turns a wallet index into a mnemonic phrase.
///
/// Implementations must be pure: the same index always yields the same
/// phrase, and calls for different indices never interfere.
///
/// # Thread Safety
/// This trait requires `Send + Sync` because a batch calls it from several
/// worker threads at once.
pub trait DeriveMnemonic: Send + Sync {
    /// Derive the phrase for wallet `index`.
    fn derive(&self, index: u32) -> Result<Zeroizing<String>>;
}

impl<T: DeriveMnemonic + ?Sized> DeriveMnemonic for &T {
    fn derive(&self, index: u32) -> Result<Zeroizing<String>> {
        (**self).derive(index)
    }
}

impl<T: DeriveMnemonic + ?Sized> DeriveMnemonic for std::sync::Arc<T> {
    fn derive(&self, index: u32) -> Result<Zeroizing<String>> {
        (**self).derive(index)
    }
}

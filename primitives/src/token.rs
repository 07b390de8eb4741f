//! Confidential token boundary (ERC-7984 style).
use crate::Cipher;
use sp_runtime::DispatchError;

/// Backend holding the encrypted balances of every asset the pair touches,
/// the LP asset included.
///
/// Transfers never fail on insufficient balance: they move an encrypted zero instead
/// and return the amount actually transferred.
pub trait ConfidentialTokens<AccountId, AssetId> {
    /// Move `amount` from `from` to `to` on behalf of `operator`, which must be
    /// `from` itself or an operator approved by `from`.
    fn transfer_from(
        asset: AssetId,
        operator: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: &Cipher,
    ) -> Result<Cipher, DispatchError>;

    fn transfer(
        asset: AssetId,
        from: &AccountId,
        to: &AccountId,
        amount: &Cipher,
    ) -> Result<Cipher, DispatchError>;

    fn mint(asset: AssetId, to: &AccountId, amount: &Cipher) -> Result<Cipher, DispatchError>;

    fn burn(asset: AssetId, from: &AccountId, amount: &Cipher) -> Result<Cipher, DispatchError>;
}

//! The `AssetLedger` trait — the engine's view of the hosting ledger.
//!
//! Object-safe so the engine can hand a `&mut dyn AssetLedger` across the
//! untrusted-exchange boundary without exposing its own state.

use opensettle_types::{AccountId, Amount, AssetId, Result};

/// Asset custody primitive of the hosting execution environment.
///
/// The engine's `pull` from the original adapter surface is
/// `transfer_from(engine, payer, engine, amount)` (spending the payer's
/// allowance to the engine); `push` is `transfer(engine -> to)`. Native
/// currency moves through plain `transfer` — attached call value is credited
/// by the engine at entry, never pulled through an allowance.
pub trait AssetLedger {
    /// Balance of `asset` held by `account`.
    fn balance_of(&self, account: AccountId, asset: &AssetId) -> Amount;

    /// Move `amount` of `asset` from `from` to `to`.
    ///
    /// # Errors
    /// - `InsufficientBalance` if `from` holds less than `amount`
    /// - `TransferToZero` if `to` is the null account
    fn transfer(
        &mut self,
        asset: &AssetId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<()>;

    /// Move `amount` of `asset` from `owner` to `to`, spending the
    /// allowance `owner` granted to `spender`. An [`Amount::UNLIMITED`]
    /// allowance is never decremented.
    ///
    /// # Errors
    /// - `InsufficientAllowance` if the allowance is less than `amount`
    /// - `InsufficientBalance` / `TransferToZero` as for [`Self::transfer`]
    fn transfer_from(
        &mut self,
        asset: &AssetId,
        spender: AccountId,
        owner: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<()>;

    /// Set the allowance `owner` grants to `spender` over `asset`.
    /// Overwrites any previous value; zero revokes.
    fn approve(
        &mut self,
        asset: &AssetId,
        owner: AccountId,
        spender: AccountId,
        amount: Amount,
    ) -> Result<()>;

    /// Current allowance `owner` has granted to `spender` over `asset`.
    fn allowance(&self, asset: &AssetId, owner: AccountId, spender: AccountId) -> Amount;
}

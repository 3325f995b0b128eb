//! In-memory asset ledger.
//!
//! `HashMap`-backed balances and allowances with the failure behavior the
//! settlement engine relies on: insufficient balance, insufficient
//! allowance, and transfer-to-zero all reject before any mutation. `Clone`
//! makes whole-ledger snapshots cheap enough for the engine's
//! all-or-nothing call semantics.

use std::collections::HashMap;

use opensettle_types::{AccountId, Amount, AssetId, Result, SettleError};

use crate::adapter::AssetLedger;

/// In-memory reference implementation of [`AssetLedger`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    /// Per-(account, asset) balances.
    balances: HashMap<(AccountId, AssetId), Amount>,
    /// (owner, asset, spender) -> granted allowance.
    allowances: HashMap<(AccountId, AssetId, AccountId), Amount>,
}

impl InMemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` of `asset` to `account` out of thin air. Test setup
    /// and faucet use only.
    pub fn mint(&mut self, account: AccountId, asset: &AssetId, amount: Amount) {
        let entry = self
            .balances
            .entry((account, asset.clone()))
            .or_insert(Amount::ZERO);
        *entry = entry.saturating_add(amount);
    }

    /// Total supply of `asset` across all accounts.
    #[must_use]
    pub fn total_supply(&self, asset: &AssetId) -> Amount {
        self.balances
            .iter()
            .filter(|((_, a), _)| a == asset)
            .map(|(_, amount)| *amount)
            .sum()
    }

    fn debit(&mut self, account: AccountId, asset: &AssetId, amount: Amount) -> Result<()> {
        let available = self.balance_of(account, asset);
        let remaining =
            available
                .checked_sub(amount)
                .ok_or_else(|| SettleError::InsufficientBalance {
                    asset: asset.clone(),
                    needed: amount,
                    available,
                })?;
        self.balances.insert((account, asset.clone()), remaining);
        Ok(())
    }

    fn credit(&mut self, account: AccountId, asset: &AssetId, amount: Amount) -> Result<()> {
        let entry = self
            .balances
            .entry((account, asset.clone()))
            .or_insert(Amount::ZERO);
        *entry = entry
            .checked_add(amount)
            .ok_or(SettleError::ArithmeticFault {
                context: "balance overflow on credit",
            })?;
        Ok(())
    }
}

impl AssetLedger for InMemoryLedger {
    fn balance_of(&self, account: AccountId, asset: &AssetId) -> Amount {
        self.balances
            .get(&(account, asset.clone()))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    fn transfer(
        &mut self,
        asset: &AssetId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<()> {
        if to.is_zero() {
            return Err(SettleError::TransferToZero);
        }
        self.debit(from, asset, amount)?;
        self.credit(to, asset, amount)
    }

    fn transfer_from(
        &mut self,
        asset: &AssetId,
        spender: AccountId,
        owner: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<()> {
        let granted = self.allowance(asset, owner, spender);
        if granted < amount {
            return Err(SettleError::InsufficientAllowance {
                asset: asset.clone(),
                needed: amount,
                available: granted,
            });
        }
        self.transfer(asset, owner, to, amount)?;
        // Unlimited allowances are not consumed.
        if granted != Amount::UNLIMITED {
            let remaining = granted
                .checked_sub(amount)
                .unwrap_or(Amount::ZERO);
            self.allowances
                .insert((owner, asset.clone(), spender), remaining);
        }
        Ok(())
    }

    fn approve(
        &mut self,
        asset: &AssetId,
        owner: AccountId,
        spender: AccountId,
        amount: Amount,
    ) -> Result<()> {
        self.allowances
            .insert((owner, asset.clone(), spender), amount);
        Ok(())
    }

    fn allowance(&self, asset: &AssetId, owner: AccountId, spender: AccountId) -> Amount {
        self.allowances
            .get(&(owner, asset.clone(), spender))
            .copied()
            .unwrap_or(Amount::ZERO)
    }
}

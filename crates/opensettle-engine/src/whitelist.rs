//! Provider whitelist — the governed set of external exchanges the swap
//! executor may invoke.
//!
//! Mutated only through the engine's administrator-gated entry points. Both
//! mutators are idempotent: approving twice or revoking a non-member is a
//! no-op, not an error. No expiry, no rate limiting.

use std::collections::HashSet;

use opensettle_types::AccountId;

/// The set of approved external-exchange addresses.
#[derive(Debug, Clone, Default)]
pub struct ProviderWhitelist {
    approved: HashSet<AccountId>,
}

impl ProviderWhitelist {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Approve an exchange. Returns `true` if it was newly added.
    pub fn approve(&mut self, exchange: AccountId) -> bool {
        self.approved.insert(exchange)
    }

    /// Revoke an exchange. Returns `true` if it was previously approved.
    pub fn revoke(&mut self, exchange: AccountId) -> bool {
        self.approved.remove(&exchange)
    }

    /// Whether the exchange may be invoked by swap settlement.
    #[must_use]
    pub fn is_approved(&self, exchange: AccountId) -> bool {
        self.approved.contains(&exchange)
    }

    /// Number of approved exchanges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.approved.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.approved.is_empty()
    }
}

//! Configuration types for the OpenSettle engine.

use serde::{Deserialize, Serialize};

use crate::{constants, AccountId};

/// Configuration for a settlement engine instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The engine's own ledger account. Accrued fees are simply this
    /// account's balances.
    pub engine_account: AccountId,
    /// The designated administrator: the only account allowed to mutate the
    /// provider whitelist, claim fees, or reset allowances.
    pub administrator: AccountId,
    /// Maximum number of settlement events retained in memory before the
    /// oldest are evicted.
    pub event_log_capacity: usize,
}

impl EngineConfig {
    #[must_use]
    pub fn new(engine_account: AccountId, administrator: AccountId) -> Self {
        Self {
            engine_account,
            administrator,
            event_log_capacity: constants::DEFAULT_EVENT_LOG_CAPACITY,
        }
    }
}

//! Settlement request model.
//!
//! A [`TransferRequest`] describes what the payer owes the merchant; a
//! [`SwapInstruction`] describes how (and through whom) the payer's asset is
//! converted when the merchant wants a different asset. Both are immutable
//! for the duration of one settlement call. The [`CallContext`] carries the
//! hosting environment's per-call ambient data: the sender, the attached
//! native value, and the current ledger time.

use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, AssetId, OrderRef};

/// What kind of settlement the caller is performing. Both kinds execute
/// identically; the kind is recorded on the emitted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    /// A merchant payment for a specific order.
    Payment,
    /// A donation. Deadlines are enforced the same way as for payments.
    Donation,
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Payment => write!(f, "PAYMENT"),
            Self::Donation => write!(f, "DONATION"),
        }
    }
}

/// A single value-transfer request, immutable per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Caller-chosen correlation id. Used only for event correlation, NOT
    /// enforced unique by the engine.
    pub order_ref: OrderRef,
    /// Asset the payer provides.
    pub input_asset: AssetId,
    /// Asset the merchant receives.
    pub output_asset: AssetId,
    /// Amount of `input_asset` the payer declares.
    pub input_amount: Amount,
    /// Exact amount of `output_asset` owed to the merchant.
    pub output_amount: Amount,
    /// The receiving merchant account.
    pub merchant: AccountId,
    /// Ledger timestamp after which the request must be rejected.
    pub deadline: u64,
}

/// Which way the external exchange is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapDirection {
    /// The full declared input amount is offered to the exchange.
    Sell,
    /// The exchange is told to acquire a fixed output amount; it may consume
    /// less than the declared input, leaving a refundable remainder.
    Buy,
}

impl std::fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sell => write!(f, "SELL"),
            Self::Buy => write!(f, "BUY"),
        }
    }
}

/// How to convert the payer's asset through an external exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapInstruction {
    /// SELL offers the declared input; BUY acquires a fixed output.
    pub direction: SwapDirection,
    /// The external exchange to invoke. Must be whitelisted.
    pub exchange: AccountId,
    /// Native-currency value forwarded with the exchange call.
    pub native_value: Amount,
    /// Opaque instruction payload for the exchange. The engine never
    /// interprets it.
    pub payload: Vec<u8>,
    /// Whether the exchange needs a spending allowance over the input asset
    /// held by the engine before the call.
    pub grant_allowance: bool,
}

/// Per-call ambient data supplied by the hosting environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// The account initiating the settlement (the payer).
    pub caller: AccountId,
    /// Native-currency value attached to the call.
    pub attached_native: Amount,
    /// Current ledger time, as an unsigned timestamp.
    pub now: u64,
}

impl CallContext {
    /// A context with no attached native value.
    #[must_use]
    pub fn new(caller: AccountId, now: u64) -> Self {
        Self {
            caller,
            attached_native: Amount::ZERO,
            now,
        }
    }

    /// Attach native value to the call.
    #[must_use]
    pub fn with_attached(mut self, attached: Amount) -> Self {
        self.attached_native = attached;
        self
    }
}

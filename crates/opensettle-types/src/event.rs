//! Settlement event model — the sole externally observable audit trail.
//!
//! Every successful settlement (direct or swap, payment or donation) produces
//! exactly one immutable [`SettlementEvent`]. The engine keeps no other
//! settlement history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{AccountId, Amount, AssetId, OrderRef, RequestKind};

/// What a completed settlement returned to its caller: the true input amount
/// consumed (may be less than declared for BUY swaps) and the fee retained by
/// the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementOutcome {
    /// Input actually consumed, measured from balance deltas.
    pub spent: Amount,
    /// Value retained by the engine: received minus owed.
    pub fee: Amount,
}

/// The canonical record of a completed settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementEvent {
    /// The caller's correlation id.
    pub order_ref: OrderRef,
    /// Payment or donation.
    pub kind: RequestKind,
    /// Asset the payer provided.
    pub input_asset: AssetId,
    /// Asset the merchant received.
    pub output_asset: AssetId,
    /// Actual input amount consumed.
    pub input_amount: Amount,
    /// Output amount delivered to the merchant.
    pub output_amount: Amount,
    /// Fee retained by the engine.
    pub fee: Amount,
    /// The receiving merchant account.
    pub merchant: AccountId,
    /// When the settlement completed.
    pub settled_at: DateTime<Utc>,
}

impl SettlementEvent {
    /// SHA-256 content digest over the canonical fields, for audit
    /// correlation. Two events with identical facts and timestamp produce
    /// the same digest.
    #[must_use]
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(b"opensettle:event:v1:");
        hasher.update(self.order_ref.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(self.kind.to_string().as_bytes());
        hasher.update([0u8]);
        hasher.update(self.input_asset.to_string().as_bytes());
        hasher.update([0u8]);
        hasher.update(self.output_asset.to_string().as_bytes());
        hasher.update([0u8]);
        hasher.update(self.input_amount.0.to_le_bytes());
        hasher.update(self.output_amount.0.to_le_bytes());
        hasher.update(self.fee.0.to_le_bytes());
        hasher.update(self.merchant.as_bytes());
        hasher.update(self.settled_at.timestamp_millis().to_le_bytes());
        hasher.finalize().into()
    }

    /// Hex form of [`Self::digest`] for log lines.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest())
    }
}

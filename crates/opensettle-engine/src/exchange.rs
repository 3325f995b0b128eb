//! The untrusted-exchange boundary.
//!
//! Swap settlement delegates asset conversion to arbitrary external code.
//! The engine never trusts what that code returns — it measures balance
//! deltas instead — so the boundary is a capability-style interface: the
//! engine hands the invoker an opaque call plus a [`SettlementHost`] handle,
//! and accounts for whatever actually happened afterwards.
//!
//! Handing out the host handle is deliberate: it is exactly what a malicious
//! exchange would use to re-enter the engine mid-settlement, which is what
//! the engine's reentrancy flag exists to reject.

use opensettle_ledger::AssetLedger;
use opensettle_types::{
    AccountId, Amount, CallContext, RequestKind, Result, SettlementOutcome, SwapInstruction,
    TransferRequest,
};

/// One opaque call to an external exchange.
#[derive(Debug, Clone, Copy)]
pub struct ExchangeCall<'a> {
    /// The exchange being invoked.
    pub exchange: AccountId,
    /// Native value forwarded with the call (already credited to the
    /// exchange when the invoker runs).
    pub native_value: Amount,
    /// Opaque instruction payload. The engine never interprets it.
    pub payload: &'a [u8],
}

/// What the external call reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvokeOutcome {
    /// The exchange call completed.
    Delivered,
    /// The exchange call failed; the raw failure payload is re-raised
    /// verbatim to the settlement caller.
    Reverted(Vec<u8>),
}

/// The engine as seen from inside an exchange invocation.
///
/// Implemented by [`crate::SettlementEngine`]. A well-behaved exchange only
/// touches the ledger; the settlement entry points are exposed so tests can
/// model an adversarial exchange calling back in.
pub trait SettlementHost {
    /// Mutable access to the hosting ledger.
    fn ledger_mut(&mut self) -> &mut dyn AssetLedger;

    /// Re-entrant direct settlement attempt (rejected while a settlement is
    /// in progress).
    fn settle(
        &mut self,
        ctx: &CallContext,
        kind: RequestKind,
        req: &TransferRequest,
    ) -> Result<SettlementOutcome>;

    /// Re-entrant swap settlement attempt (rejected while a settlement is
    /// in progress).
    fn settle_with_swap(
        &mut self,
        ctx: &CallContext,
        kind: RequestKind,
        req: &TransferRequest,
        instruction: &SwapInstruction,
        invoker: &mut dyn ExchangeInvoker,
    ) -> Result<SettlementOutcome>;
}

/// Capability to perform the opaque external call.
///
/// Success or failure is all the engine reads from the outcome; the actual
/// asset movements are measured from ledger balance deltas.
pub trait ExchangeInvoker {
    fn invoke(&mut self, host: &mut dyn SettlementHost, call: ExchangeCall<'_>) -> InvokeOutcome;
}

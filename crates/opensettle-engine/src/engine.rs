//! The settlement engine: entry points, atomicity, and governance.
//!
//! Each entry point runs as one atomic unit of work:
//! 1. Reject reentrant calls (explicit in-progress flag)
//! 2. Snapshot the ledger
//! 3. Execute (direct or swap)
//! 4. On success record the settlement event; on any failure restore the
//!    snapshot so no partial settlement is observable
//!
//! Fees are not tracked separately — they are the residual balances of the
//! engine's own ledger account, claimable by the administrator.

use chrono::Utc;
use opensettle_ledger::AssetLedger;
use opensettle_types::{
    AccountId, Amount, AssetId, CallContext, EngineConfig, RequestKind, Result, SettleError,
    SettlementEvent, SettlementOutcome, SwapInstruction, TransferRequest,
};

use crate::events::EventLog;
use crate::exchange::{ExchangeInvoker, SettlementHost};
use crate::whitelist::ProviderWhitelist;

/// Settles value transfers between a payer and a merchant on the hosting
/// ledger, optionally converting assets through a whitelisted external
/// exchange.
pub struct SettlementEngine<L: AssetLedger + Clone> {
    pub(crate) config: EngineConfig,
    pub(crate) ledger: L,
    pub(crate) whitelist: ProviderWhitelist,
    events: EventLog,
    /// Set while a settlement is executing. A call arriving while this is
    /// set is a callback from inside the external exchange invocation and is
    /// rejected.
    entered: bool,
}

impl<L: AssetLedger + Clone> SettlementEngine<L> {
    #[must_use]
    pub fn new(config: EngineConfig, ledger: L) -> Self {
        let events = EventLog::new(config.event_log_capacity);
        Self {
            config,
            ledger,
            whitelist: ProviderWhitelist::new(),
            events,
            entered: false,
        }
    }

    // =================================================================
    // Settlement entry points
    // =================================================================

    /// Direct (same-asset) settlement.
    ///
    /// # Errors
    /// `Expired`, `IncorrectNativeAmount`, `ArithmeticFault`, ledger
    /// failures, or `ReentrantCall`. On any error every balance change made
    /// within the call is unwound.
    pub fn settle(
        &mut self,
        ctx: &CallContext,
        kind: RequestKind,
        req: &TransferRequest,
    ) -> Result<SettlementOutcome> {
        self.guarded(kind, req, |engine| engine.execute_direct(ctx, req))
    }

    /// Swap-mediated settlement through a whitelisted external exchange.
    ///
    /// # Errors
    /// As [`Self::settle`], plus `ProviderNotWhitelisted` and
    /// `ExternalCallFailure` (the exchange's own failure payload, verbatim).
    pub fn settle_with_swap(
        &mut self,
        ctx: &CallContext,
        kind: RequestKind,
        req: &TransferRequest,
        instruction: &SwapInstruction,
        invoker: &mut dyn ExchangeInvoker,
    ) -> Result<SettlementOutcome> {
        self.guarded(kind, req, |engine| {
            engine.execute_swap(ctx, req, instruction, invoker)
        })
    }

    /// Reentrancy guard + all-or-nothing execution + event emission.
    fn guarded<F>(
        &mut self,
        kind: RequestKind,
        req: &TransferRequest,
        op: F,
    ) -> Result<SettlementOutcome>
    where
        F: FnOnce(&mut Self) -> Result<SettlementOutcome>,
    {
        if self.entered {
            return Err(SettleError::ReentrantCall);
        }
        self.entered = true;
        let snapshot = self.ledger.clone();
        let result = op(self);
        self.entered = false;

        match result {
            Ok(outcome) => {
                self.record(kind, req, outcome);
                Ok(outcome)
            }
            Err(err) => {
                tracing::warn!(
                    order_ref = %req.order_ref,
                    error = %err,
                    "settlement failed, unwinding balance changes"
                );
                self.ledger = snapshot;
                Err(err)
            }
        }
    }

    fn record(&mut self, kind: RequestKind, req: &TransferRequest, outcome: SettlementOutcome) {
        let event = SettlementEvent {
            order_ref: req.order_ref.clone(),
            kind,
            input_asset: req.input_asset.clone(),
            output_asset: req.output_asset.clone(),
            input_amount: outcome.spent,
            output_amount: req.output_amount,
            fee: outcome.fee,
            merchant: req.merchant,
            settled_at: Utc::now(),
        };
        tracing::info!(
            order_ref = %event.order_ref,
            kind = %event.kind,
            spent = %event.input_amount,
            output = %event.output_amount,
            fee = %event.fee,
            merchant = %event.merchant.short(),
            digest = %event.digest_hex(),
            "settlement completed"
        );
        self.events.record(event);
    }

    // =================================================================
    // Administrative surface (owner-gated)
    // =================================================================

    /// Approve an external exchange for swap settlement. Idempotent.
    ///
    /// # Errors
    /// `NotAdministrator` unless `caller` is the designated administrator.
    pub fn approve_provider(&mut self, caller: AccountId, exchange: AccountId) -> Result<bool> {
        self.require_admin(caller)?;
        Ok(self.whitelist.approve(exchange))
    }

    /// Revoke an external exchange. Idempotent.
    ///
    /// # Errors
    /// `NotAdministrator` unless `caller` is the designated administrator.
    pub fn revoke_provider(&mut self, caller: AccountId, exchange: AccountId) -> Result<bool> {
        self.require_admin(caller)?;
        Ok(self.whitelist.revoke(exchange))
    }

    /// Claim the engine's full accrued fee balance of `asset` to `receiver`.
    /// Returns the amount claimed.
    ///
    /// # Errors
    /// `NotAdministrator`, or `ZeroReceiver` if `receiver` is the null
    /// account.
    pub fn claim_fees(
        &mut self,
        caller: AccountId,
        asset: &AssetId,
        receiver: AccountId,
    ) -> Result<Amount> {
        self.require_admin(caller)?;
        if receiver.is_zero() {
            return Err(SettleError::ZeroReceiver);
        }
        let accrued = self.ledger.balance_of(self.config.engine_account, asset);
        if !accrued.is_zero() {
            self.ledger
                .transfer(asset, self.config.engine_account, receiver, accrued)?;
        }
        tracing::info!(asset = %asset, amount = %accrued, receiver = %receiver.short(), "fees claimed");
        Ok(accrued)
    }

    /// Revoke the engine's outstanding allowance grant to `spender` over
    /// `asset` (set to zero).
    ///
    /// # Errors
    /// `NotAdministrator` unless `caller` is the designated administrator.
    pub fn reset_allowance(
        &mut self,
        caller: AccountId,
        asset: &AssetId,
        spender: AccountId,
    ) -> Result<()> {
        self.require_admin(caller)?;
        self.ledger
            .approve(asset, self.config.engine_account, spender, Amount::ZERO)
    }

    fn require_admin(&self, caller: AccountId) -> Result<()> {
        if caller != self.config.administrator {
            return Err(SettleError::NotAdministrator(caller));
        }
        Ok(())
    }

    // =================================================================
    // Accessors
    // =================================================================

    /// The engine's residual balance of `asset` — the accrued, unclaimed fee.
    #[must_use]
    pub fn accrued_fees(&self, asset: &AssetId) -> Amount {
        self.ledger.balance_of(self.config.engine_account, asset)
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    #[must_use]
    pub fn whitelist(&self) -> &ProviderWhitelist {
        &self.whitelist
    }

    /// The settlement event log, oldest-first.
    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.events
    }
}

impl<L: AssetLedger + Clone> SettlementHost for SettlementEngine<L> {
    fn ledger_mut(&mut self) -> &mut dyn AssetLedger {
        &mut self.ledger
    }

    fn settle(
        &mut self,
        ctx: &CallContext,
        kind: RequestKind,
        req: &TransferRequest,
    ) -> Result<SettlementOutcome> {
        SettlementEngine::settle(self, ctx, kind, req)
    }

    fn settle_with_swap(
        &mut self,
        ctx: &CallContext,
        kind: RequestKind,
        req: &TransferRequest,
        instruction: &SwapInstruction,
        invoker: &mut dyn ExchangeInvoker,
    ) -> Result<SettlementOutcome> {
        SettlementEngine::settle_with_swap(self, ctx, kind, req, instruction, invoker)
    }
}

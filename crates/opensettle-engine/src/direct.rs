//! Direct (same-asset) settlement executor.
//!
//! 1. Validate deadline and native attachment
//! 2. Pull the declared input from the payer into the engine (the attached
//!    value serves as the pull when the input asset is native)
//! 3. Push the exact output amount to the merchant
//!
//! Fee = input − output, left behind on the engine's own account. The
//! subtraction is checked: a request declaring less input than output aborts
//! with an arithmetic fault and no state change.

use opensettle_ledger::AssetLedger;
use opensettle_types::{
    Amount, AssetId, CallContext, Result, SettleError, SettlementOutcome, TransferRequest,
};

use crate::engine::SettlementEngine;
use crate::validator;

impl<L: AssetLedger + Clone> SettlementEngine<L> {
    pub(crate) fn execute_direct(
        &mut self,
        ctx: &CallContext,
        req: &TransferRequest,
    ) -> Result<SettlementOutcome> {
        validator::ensure_not_expired(req, ctx.now)?;
        validator::ensure_native_attachment(req, Amount::ZERO, ctx)?;

        let engine = self.config.engine_account;

        // Pull the input. For native input the attached value is the pull.
        if req.input_asset.is_native() {
            self.ledger
                .transfer(&AssetId::Native, ctx.caller, engine, req.input_amount)?;
        } else {
            self.ledger.transfer_from(
                &req.input_asset,
                engine,
                ctx.caller,
                engine,
                req.input_amount,
            )?;
        }

        let fee = req
            .input_amount
            .checked_sub(req.output_amount)
            .ok_or(SettleError::ArithmeticFault {
                context: "direct settlement output exceeds input",
            })?;

        // Both movements use the input asset ("same asset" settlement).
        self.ledger
            .transfer(&req.input_asset, engine, req.merchant, req.output_amount)?;

        Ok(SettlementOutcome {
            spent: req.input_amount,
            fee,
        })
    }
}

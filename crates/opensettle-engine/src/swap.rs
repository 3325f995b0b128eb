//! Swap-mediated settlement executor.
//!
//! Delegates asset conversion to a whitelisted external exchange, then
//! accounts for what actually happened from the engine's own balance deltas:
//!
//! 1. Whitelist check
//! 2. Pull the declared input from the payer into the engine
//! 3. Optional allowance grant over the input asset to the exchange
//! 4. Snapshot the engine's input and output balances
//! 5. Forward the native value and invoke the exchange (opaque payload);
//!    a failure re-raises the exchange's raw failure payload verbatim
//! 6. `spent` = input delta, `received` = output delta (both checked)
//! 7. Fee = `received` − owed output (checked: under-delivery aborts)
//! 8. Push the exact owed output to the merchant
//! 9. BUY direction: refund unspent input to the payer
//!
//! The exchange's return value is never trusted; only conservation of the
//! assets the engine custodies.

use opensettle_ledger::AssetLedger;
use opensettle_types::{
    Amount, AssetId, CallContext, Result, SettleError, SettlementOutcome, SwapDirection,
    SwapInstruction, TransferRequest,
};

use crate::engine::SettlementEngine;
use crate::exchange::{ExchangeCall, ExchangeInvoker, InvokeOutcome};
use crate::validator;

impl<L: AssetLedger + Clone> SettlementEngine<L> {
    pub(crate) fn execute_swap(
        &mut self,
        ctx: &CallContext,
        req: &TransferRequest,
        instruction: &SwapInstruction,
        invoker: &mut dyn ExchangeInvoker,
    ) -> Result<SettlementOutcome> {
        validator::ensure_not_expired(req, ctx.now)?;
        validator::ensure_native_attachment(req, instruction.native_value, ctx)?;

        if !self.whitelist.is_approved(instruction.exchange) {
            return Err(SettleError::ProviderNotWhitelisted(instruction.exchange));
        }

        let engine = self.config.engine_account;

        // Pull the input. For native input the attached value is the pull;
        // for token input any attached native funds the payable exchange call.
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
            if !ctx.attached_native.is_zero() {
                self.ledger
                    .transfer(&AssetId::Native, ctx.caller, engine, ctx.attached_native)?;
            }
        }

        if instruction.grant_allowance {
            self.ledger.approve(
                &req.input_asset,
                engine,
                instruction.exchange,
                Amount::UNLIMITED,
            )?;
        }

        // Balances immediately before the untrusted call.
        let pre_input = self.ledger.balance_of(engine, &req.input_asset);
        let pre_output = self.ledger.balance_of(engine, &req.output_asset);

        // The native value travels with the call itself.
        if !instruction.native_value.is_zero() {
            self.ledger.transfer(
                &AssetId::Native,
                engine,
                instruction.exchange,
                instruction.native_value,
            )?;
        }

        let call = ExchangeCall {
            exchange: instruction.exchange,
            native_value: instruction.native_value,
            payload: &instruction.payload,
        };
        if let InvokeOutcome::Reverted(payload) = invoker.invoke(&mut *self, call) {
            return Err(SettleError::ExternalCallFailure { payload });
        }

        let post_input = self.ledger.balance_of(engine, &req.input_asset);
        let post_output = self.ledger.balance_of(engine, &req.output_asset);

        let spent =
            pre_input
                .checked_sub(post_input)
                .ok_or(SettleError::ArithmeticFault {
                    context: "engine input balance grew across exchange call",
                })?;
        let received =
            post_output
                .checked_sub(pre_output)
                .ok_or(SettleError::ArithmeticFault {
                    context: "engine output balance shrank across exchange call",
                })?;

        // Excess output beyond what the merchant is owed stays as fee.
        let fee = received
            .checked_sub(req.output_amount)
            .ok_or(SettleError::ArithmeticFault {
                context: "exchange delivered less than the owed output",
            })?;

        // The merchant receives exactly the requested amount, never more.
        self.ledger
            .transfer(&req.output_asset, engine, req.merchant, req.output_amount)?;

        // BUY may leave declared input unconsumed; refund it to the payer.
        if instruction.direction == SwapDirection::Buy {
            let unused =
                req.input_amount
                    .checked_sub(spent)
                    .ok_or(SettleError::ArithmeticFault {
                        context: "exchange consumed more than the declared input",
                    })?;
            if !unused.is_zero() {
                self.ledger
                    .transfer(&req.input_asset, engine, ctx.caller, unused)?;
            }
        }

        Ok(SettlementOutcome { spent, fee })
    }
}

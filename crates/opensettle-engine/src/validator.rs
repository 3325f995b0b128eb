//! Request validation — applied before any asset movement.
//!
//! The engine performs no structural validation beyond these checks: asset
//! identifiers, amounts, and the merchant account are trusted as supplied,
//! and malformed input is caught by ledger-level failures (e.g.
//! transfer-to-zero).

use opensettle_types::{Amount, CallContext, Result, SettleError, TransferRequest};

/// Reject a request whose deadline has passed.
///
/// # Errors
/// Returns [`SettleError::Expired`] iff the current ledger time exceeds the
/// request's deadline. A request settling exactly at its deadline is valid.
pub fn ensure_not_expired(req: &TransferRequest, now: u64) -> Result<()> {
    if now > req.deadline {
        return Err(SettleError::Expired {
            deadline: req.deadline,
            now,
        });
    }
    Ok(())
}

/// Reject a call whose attached native value mismatches what the request
/// declares.
///
/// When the input asset is the native sentinel the caller must attach
/// exactly the declared input amount. Otherwise the attachment must equal
/// the native value forwarded to the exchange (`swap_native`, zero for
/// direct settlement) — stray native value is rejected rather than silently
/// absorbed into the fee residual.
pub fn ensure_native_attachment(
    req: &TransferRequest,
    swap_native: Amount,
    ctx: &CallContext,
) -> Result<()> {
    let declared = if req.input_asset.is_native() {
        req.input_amount
    } else {
        swap_native
    };
    if ctx.attached_native != declared {
        return Err(SettleError::IncorrectNativeAmount {
            declared,
            attached: ctx.attached_native,
        });
    }
    Ok(())
}

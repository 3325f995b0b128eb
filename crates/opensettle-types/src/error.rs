//! Error types for the OpenSettle settlement engine.
//!
//! All errors use the `OS_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Request errors
//! - 2xx: Ledger / arithmetic errors
//! - 3xx: Provider / exchange errors
//! - 4xx: Administrative errors
//! - 5xx: Call-sequencing errors
//!
//! Every error is a full-call abort: no partial settlement state survives a
//! failure, and nothing is retried internally.

use thiserror::Error;

use crate::{AccountId, Amount, AssetId};

/// Central error enum for all OpenSettle operations.
#[derive(Debug, Error)]
pub enum SettleError {
    // =================================================================
    // Request Errors (1xx)
    // =================================================================
    /// The request's deadline passed before any asset movement.
    #[error("OS_ERR_100: Request expired: deadline {deadline}, ledger time {now}")]
    Expired { deadline: u64, now: u64 },

    /// The attached native value does not match the declared native amount.
    #[error("OS_ERR_101: Incorrect native amount: declared {declared}, attached {attached}")]
    IncorrectNativeAmount { declared: Amount, attached: Amount },

    // =================================================================
    // Ledger / Arithmetic Errors (2xx)
    // =================================================================
    /// Not enough balance to perform a transfer.
    #[error("OS_ERR_200: Insufficient balance of {asset}: need {needed}, have {available}")]
    InsufficientBalance {
        asset: AssetId,
        needed: Amount,
        available: Amount,
    },

    /// Not enough allowance to pull funds from the owner.
    #[error("OS_ERR_201: Insufficient allowance for {asset}: need {needed}, have {available}")]
    InsufficientAllowance {
        asset: AssetId,
        needed: Amount,
        available: Amount,
    },

    /// A settlement subtraction underflowed. Signals a malformed request or
    /// an exchange that under-delivered.
    #[error("OS_ERR_202: Arithmetic fault: {context}")]
    ArithmeticFault { context: &'static str },

    /// Transfer to the null account, rejected at the ledger level.
    #[error("OS_ERR_203: Transfer to the zero account")]
    TransferToZero,

    // =================================================================
    // Provider / Exchange Errors (3xx)
    // =================================================================
    /// The swap instruction names an exchange that is not approved.
    #[error("OS_ERR_300: Provider not whitelisted: {0}")]
    ProviderNotWhitelisted(AccountId),

    /// The external exchange call failed. The exchange's own failure payload
    /// is carried verbatim — callers rely on the original diagnostic.
    #[error("OS_ERR_301: External exchange call failed: 0x{}", hex::encode(payload))]
    ExternalCallFailure { payload: Vec<u8> },

    // =================================================================
    // Administrative Errors (4xx)
    // =================================================================
    /// A governed entry point was called by someone other than the
    /// designated administrator.
    #[error("OS_ERR_400: Caller is not the administrator: {0}")]
    NotAdministrator(AccountId),

    /// Fee claim to the null account.
    #[error("OS_ERR_401: Fee claim receiver is the zero account")]
    ZeroReceiver,

    // =================================================================
    // Call-Sequencing Errors (5xx)
    // =================================================================
    /// A settlement entry point was re-entered while another settlement was
    /// in progress (malicious exchange calling back into the engine).
    #[error("OS_ERR_500: Reentrant settlement call rejected")]
    ReentrantCall,
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SettleError>;

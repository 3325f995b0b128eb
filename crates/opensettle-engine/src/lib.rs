//! # opensettle-engine
//!
//! The OpenSettle settlement engine: all-or-nothing value transfers from a
//! paying account to a merchant on a totally-ordered execution ledger,
//! optionally converting the payer's asset through an untrusted external
//! exchange.
//!
//! ## Architecture
//!
//! One settlement call runs as a single atomic, sequential unit:
//! 1. Request validation (deadline, native-value attachment)
//! 2. Direct execution, or swap execution through a whitelisted exchange
//! 3. Fee accounting from measured balance deltas — never from the
//!    exchange's return value
//! 4. Event emission (the sole audit trail)
//!
//! Any failure unwinds every balance change made within the call. The
//! external exchange invocation is the one point where control leaves the
//! engine's trust boundary; an explicit reentrancy flag rejects callbacks
//! into the settlement entry points mid-execution.

pub mod direct;
pub mod engine;
pub mod events;
pub mod exchange;
pub mod swap;
pub mod validator;
pub mod whitelist;

pub use engine::SettlementEngine;
pub use events::EventLog;
pub use exchange::{ExchangeCall, ExchangeInvoker, InvokeOutcome, SettlementHost};
pub use whitelist::ProviderWhitelist;

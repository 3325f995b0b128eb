//! # opensettle-types
//!
//! Shared types, errors, and configuration for the **OpenSettle** settlement
//! engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`AccountId`], [`OrderRef`]
//! - **Value model**: [`Amount`], [`AssetId`]
//! - **Request model**: [`TransferRequest`], [`RequestKind`], [`SwapInstruction`], [`SwapDirection`], [`CallContext`]
//! - **Event model**: [`SettlementEvent`], [`SettlementOutcome`]
//! - **Configuration**: [`EngineConfig`]
//! - **Errors**: [`SettleError`] with `OS_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod amount;
pub mod asset;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod request;

// Re-export all primary types at crate root for ergonomic imports:
//   use opensettle_types::{TransferRequest, SwapInstruction, SettleError, ...};

pub use amount::*;
pub use asset::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use request::*;

// Constants are accessed via `opensettle_types::constants::FOO`
// (not re-exported to avoid name collisions).

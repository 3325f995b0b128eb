//! # opensettle-ledger
//!
//! The asset custody seam of OpenSettle: an object-safe [`AssetLedger`]
//! trait describing the transfer primitive the engine builds on, plus an
//! [`InMemoryLedger`] reference implementation used by the engine, exchange
//! mocks, and tests.
//!
//! The transfer primitive itself is a property of the hosting environment:
//! move N units from account A to account B, failing if balance or allowance
//! is insufficient. The engine adds no custody logic of its own; it only
//! sequences these primitives.

pub mod adapter;
pub mod memory;

pub use adapter::AssetLedger;
pub use memory::InMemoryLedger;

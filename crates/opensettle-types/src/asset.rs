//! Asset identifiers.
//!
//! The native currency of the hosting ledger is a first-class variant rather
//! than a magic token address: native value arrives attached to the call
//! itself and is never pulled through an allowance.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies an asset on the hosting ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum AssetId {
    /// The chain's native currency. Sourced from the call's attached value
    /// instead of a ledger pull.
    Native,
    /// A token identified by its ledger symbol or address string.
    Token(String),
}

impl AssetId {
    #[must_use]
    pub fn token(symbol: impl Into<String>) -> Self {
        Self::Token(symbol.into())
    }

    /// Whether this is the native-currency sentinel.
    #[must_use]
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "NATIVE"),
            Self::Token(symbol) => write!(f, "{symbol}"),
        }
    }
}

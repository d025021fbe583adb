//! # Counter Operations
//!
//! Selectors for the stock and sold-count adjustment calls.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Selector            Statement applied server-side                  │
//! │  ────────            ─────────────────────────────                  │
//! │  Add                 stocks = stocks + ?                            │
//! │  Subtract            stocks = stocks - ?                            │
//! │  Set (stock only)    stocks = ?                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Arithmetic happens inside a single UPDATE, so concurrent writers never
//! lose each other's deltas.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Stock Operation
// =============================================================================

/// How a product-level stock adjustment is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockOperation {
    /// Increase stock by the quantity.
    Add,
    /// Decrease stock by the quantity.
    Subtract,
    /// Replace stock with the quantity.
    Set,
}

impl StockOperation {
    /// Wire name of the selector.
    pub fn as_str(&self) -> &'static str {
        match self {
            StockOperation::Add => "add",
            StockOperation::Subtract => "subtract",
            StockOperation::Set => "set",
        }
    }
}

impl fmt::Display for StockOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockOperation {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "add" => Ok(StockOperation::Add),
            "subtract" => Ok(StockOperation::Subtract),
            // The admin console sends "update" for an absolute count
            "set" | "update" => Ok(StockOperation::Set),
            _ => Err(ValidationError::NotAllowed {
                field: "operation".to_string(),
                allowed: vec!["add".into(), "subtract".into(), "set".into()],
            }),
        }
    }
}

impl From<CountOperation> for StockOperation {
    fn from(op: CountOperation) -> Self {
        match op {
            CountOperation::Add => StockOperation::Add,
            CountOperation::Subtract => StockOperation::Subtract,
        }
    }
}

// =============================================================================
// Count Operation
// =============================================================================

/// Relative adjustment used for sold counts and variant stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CountOperation {
    Add,
    Subtract,
}

impl CountOperation {
    /// Wire name of the selector.
    pub fn as_str(&self) -> &'static str {
        match self {
            CountOperation::Add => "add",
            CountOperation::Subtract => "subtract",
        }
    }
}

impl fmt::Display for CountOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CountOperation {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "add" => Ok(CountOperation::Add),
            "subtract" => Ok(CountOperation::Subtract),
            _ => Err(ValidationError::NotAllowed {
                field: "operation".to_string(),
                allowed: vec!["add".into(), "subtract".into()],
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

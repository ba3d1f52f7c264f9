//! Write-through balance held in a single [`BalanceSlot`].

use anyhow::{Context, Result};
use tracing::warn;
use vx_storage::BalanceSlot;

use crate::error::TopUpError;

pub struct BalanceStore<S> {
    slot: S,
    balance: u64,
}

impl<S: BalanceSlot> BalanceStore<S> {
    /// Reads the slot once. A missing key is a zero balance.
    pub fn load(slot: S) -> Result<Self> {
        let raw = slot.load().context("failed to read stored balance")?;
        let balance = match raw.as_deref() {
            None => 0,
            Some(value) => parse_stored_balance(value).unwrap_or_else(|| {
                warn!("stored balance {value:?} is not a number, starting from 0");
                0
            }),
        };
        Ok(Self { slot, balance })
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Adds `amount` and persists the result before exposing it.
    /// On error the in-memory balance is left untouched.
    pub fn commit(&mut self, amount: u64) -> Result<u64, TopUpError> {
        let next = self
            .balance
            .checked_add(amount)
            .ok_or(TopUpError::Overflow {
                balance: self.balance,
                amount,
            })?;
        self.slot
            .store(&next.to_string())
            .map_err(TopUpError::Storage)?;
        self.balance = next;
        Ok(next)
    }
}

/// Accepts plain integers and, for values written as decimals, their
/// non-negative integer part.
fn parse_stored_balance(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<u64>() {
        return Some(value);
    }
    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 && value <= u64::MAX as f64 {
        Some(value.trunc() as u64)
    } else {
        None
    }
}

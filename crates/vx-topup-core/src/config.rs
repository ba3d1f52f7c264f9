use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;
use vx_api_types::PaymentMethod;

use crate::totals::DEFAULT_FEE_BPS;

pub const DEFAULT_BALANCE_KEY: &str = "voltrixBalance";

/// Form tunables. Every field has a default so partial JSON is accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TopUpConfig {
    pub min_amount: u64,
    pub max_amount: u64,
    pub fee_bps: u32,
    pub presets: Vec<u64>,
    pub balance_key: String,
    pub default_method: PaymentMethod,
}

impl Default for TopUpConfig {
    fn default() -> Self {
        Self {
            min_amount: 10_000,
            max_amount: 100_000_000,
            fee_bps: DEFAULT_FEE_BPS,
            presets: vec![50_000, 100_000, 200_000, 500_000, 1_000_000, 2_000_000],
            balance_key: DEFAULT_BALANCE_KEY.to_owned(),
            default_method: PaymentMethod::Card,
        }
    }
}

impl TopUpConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("invalid top-up config json")
    }

    /// Defaults overridden by `TOPUP_MIN_AMOUNT`, `TOPUP_MAX_AMOUNT`,
    /// `TOPUP_FEE_BPS` and `TOPUP_BALANCE_KEY`.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = parse_override(&lookup, "TOPUP_MIN_AMOUNT") {
            self.min_amount = value;
        }
        if let Some(value) = parse_override(&lookup, "TOPUP_MAX_AMOUNT") {
            self.max_amount = value;
        }
        if let Some(value) = parse_override(&lookup, "TOPUP_FEE_BPS") {
            self.fee_bps = value;
        }
        if let Some(key) = lookup("TOPUP_BALANCE_KEY") {
            let key = key.trim();
            if !key.is_empty() {
                self.balance_key = key.to_owned();
            }
        }
        self
    }
}

fn parse_override<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("ignoring {key}={raw:?}: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_rupiah_form() {
        let config = TopUpConfig::default();
        assert_eq!(config.min_amount, 10_000);
        assert_eq!(config.max_amount, 100_000_000);
        assert_eq!(config.fee_bps, 290);
        assert_eq!(config.balance_key, "voltrixBalance");
        assert_eq!(config.default_method, PaymentMethod::Card);
        assert!(config.presets.contains(&50_000));
    }

    #[test]
    fn partial_json_keeps_defaults() -> Result<()> {
        let config = TopUpConfig::from_json(r#"{"presets":[25000,75000],"default_method":"ovo"}"#)?;
        assert_eq!(config.presets, vec![25_000, 75_000]);
        assert_eq!(config.default_method, PaymentMethod::Ovo);
        assert_eq!(config.min_amount, 10_000);
        Ok(())
    }

    #[test]
    fn overrides_apply_and_bad_values_are_ignored() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("TOPUP_MIN_AMOUNT", "20000"),
            ("TOPUP_FEE_BPS", "two percent"),
            ("TOPUP_BALANCE_KEY", " walletBalance "),
        ]);
        let config = TopUpConfig::default()
            .with_overrides(|key| vars.get(key).map(|value| (*value).to_owned()));
        assert_eq!(config.min_amount, 20_000);
        assert_eq!(config.fee_bps, 290);
        assert_eq!(config.max_amount, 100_000_000);
        assert_eq!(config.balance_key, "walletBalance");
    }
}

//! Page configuration.
//!
//! Read from an optional `<script id="topupConfig" type="application/json">`
//! block. The preset catalog always follows the amount buttons on the page.

use anyhow::Result;
use serde::Deserialize;
use vx_gateway::GatewayConfig;
use vx_topup_core::TopUpConfig;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    pub form: TopUpConfig,
    pub gateway: GatewayConfig,
}

impl PageConfig {
    /// `None` or blank input yields the defaults.
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        match raw.map(str::trim) {
            Some(raw) if !raw.is_empty() => Ok(serde_json::from_str(raw)?),
            _ => Ok(Self::default()),
        }
    }

    /// Replaces the preset catalog with the values rendered on the page, if any.
    pub fn with_page_presets(mut self, presets: Vec<u64>) -> Self {
        if !presets.is_empty() {
            self.form.presets = presets;
        }
        self
    }
}

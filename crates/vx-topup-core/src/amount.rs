use serde::{Deserialize, Serialize};

use crate::format::format_amount_input;

/// Where the current amount came from. Only one source is active at a time.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum AmountSource {
    #[default]
    Empty,
    Preset(u64),
    Custom,
}

#[derive(Debug, Clone)]
pub struct AmountSelector {
    max_amount: u64,
    amount: u64,
    source: AmountSource,
    custom_text: String,
}

impl AmountSelector {
    pub fn new(max_amount: u64) -> Self {
        Self {
            max_amount,
            amount: 0,
            source: AmountSource::Empty,
            custom_text: String::new(),
        }
    }

    /// Catalog membership is checked by the caller.
    pub fn select_preset(&mut self, value: u64) {
        self.amount = value;
        self.source = AmountSource::Preset(value);
        self.custom_text.clear();
    }

    /// The re-rendered text is available through [`AmountSelector::custom_text`].
    pub fn set_custom_amount(&mut self, text: &str) {
        let (amount, formatted) = format_amount_input(text, self.max_amount);
        self.amount = amount;
        self.source = AmountSource::Custom;
        self.custom_text = formatted;
    }

    pub fn reset(&mut self) {
        self.amount = 0;
        self.source = AmountSource::Empty;
        self.custom_text.clear();
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn source(&self) -> AmountSource {
        self.source
    }

    pub fn active_preset(&self) -> Option<u64> {
        match self.source {
            AmountSource::Preset(value) => Some(value),
            _ => None,
        }
    }

    pub fn custom_text(&self) -> &str {
        &self.custom_text
    }
}

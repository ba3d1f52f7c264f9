use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Card,
    Dana,
    Gopay,
    Ovo,
    Shopeepay,
    Bank,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 6] = [
        PaymentMethod::Card,
        PaymentMethod::Dana,
        PaymentMethod::Gopay,
        PaymentMethod::Ovo,
        PaymentMethod::Shopeepay,
        PaymentMethod::Bank,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Dana => "dana",
            PaymentMethod::Gopay => "gopay",
            PaymentMethod::Ovo => "ovo",
            PaymentMethod::Shopeepay => "shopeepay",
            PaymentMethod::Bank => "bank",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown payment method: {0}")]
pub struct UnknownPaymentMethod(pub String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == value.trim())
            .ok_or_else(|| UnknownPaymentMethod(value.to_owned()))
    }
}

/// One of the four card inputs, as the user sees them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CardField {
    Number,
    Expiry,
    Cvv,
    Name,
}

/// Card inputs in their displayed (already formatted) form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardDetails {
    pub number: String,
    pub expiry: String,
    pub cvv: String,
    pub name: String,
}

impl CardDetails {
    pub fn get(&self, field: CardField) -> &str {
        match field {
            CardField::Number => &self.number,
            CardField::Expiry => &self.expiry,
            CardField::Cvv => &self.cvv,
            CardField::Name => &self.name,
        }
    }

    pub fn set(&mut self, field: CardField, value: String) {
        match field {
            CardField::Number => self.number = value,
            CardField::Expiry => self.expiry = value,
            CardField::Cvv => self.cvv = value,
            CardField::Name => self.name = value,
        }
    }

    /// Card number with every non-digit removed.
    pub fn number_digits(&self) -> String {
        self.number.chars().filter(char::is_ascii_digit).collect()
    }
}

/// Snapshot of the form taken when an attempt is submitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopUpRequest {
    pub amount: u64,
    pub method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<CardDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub reference: Uuid,
    pub method: PaymentMethod,
    pub amount: u64,
    pub latency_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("payment declined by {method} gateway")]
    Declined { method: PaymentMethod },
    #[error("unexpected payment fault: {0}")]
    Fault(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
        }
    }
}

/// Transient toast shown to the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_method_parses_wire_tags() {
        for method in PaymentMethod::ALL {
            assert_eq!(method.as_str().parse::<PaymentMethod>(), Ok(method));
        }
        assert!("paypal".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn payment_method_serializes_lowercase() {
        let json = serde_json::to_string(&PaymentMethod::Shopeepay).unwrap();
        assert_eq!(json, "\"shopeepay\"");
    }

    #[test]
    fn number_digits_drops_separators() {
        let card = CardDetails {
            number: "4111 1111-1111 1111".to_owned(),
            ..CardDetails::default()
        };
        assert_eq!(card.number_digits(), "4111111111111111");
    }

    #[test]
    fn request_without_card_omits_field() {
        let request = TopUpRequest {
            amount: 50_000,
            method: PaymentMethod::Dana,
            card: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("card").is_none());
        assert_eq!(json["method"], "dana");
    }
}

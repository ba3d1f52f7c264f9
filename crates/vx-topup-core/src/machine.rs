//! Payment attempt lifecycle: `Idle → Submitting → {Succeeded, Failed} → Idle`.

use serde::Serialize;
use vx_api_types::{PaymentError, PaymentReceipt, TopUpRequest};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum PaymentPhase {
    Idle,
    Submitting { request: TopUpRequest },
    Succeeded { receipt: PaymentReceipt },
    Failed { error: String },
}

impl PaymentPhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, PaymentPhase::Idle)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, PaymentPhase::Submitting { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMachine {
    phase: PaymentPhase,
    last_outcome: Option<Result<PaymentReceipt, PaymentError>>,
}

impl Default for PaymentMachine {
    fn default() -> Self {
        Self {
            phase: PaymentPhase::Idle,
            last_outcome: None,
        }
    }
}

impl PaymentMachine {
    pub fn phase(&self) -> &PaymentPhase {
        &self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase.is_submitting()
    }

    pub fn in_flight(&self) -> Option<&TopUpRequest> {
        match &self.phase {
            PaymentPhase::Submitting { request } => Some(request),
            _ => None,
        }
    }

    pub fn last_outcome(&self) -> Option<&Result<PaymentReceipt, PaymentError>> {
        self.last_outcome.as_ref()
    }

    /// `Idle → Submitting`. Returns `false` and changes nothing while another
    /// attempt is in flight.
    pub fn begin(&mut self, request: TopUpRequest) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.phase = PaymentPhase::Submitting { request };
        true
    }

    /// `Submitting → Succeeded | Failed`. Returns `false` when nothing was in flight.
    pub fn complete(&mut self, outcome: Result<PaymentReceipt, PaymentError>) -> bool {
        if !self.is_submitting() {
            return false;
        }
        self.phase = match &outcome {
            Ok(receipt) => PaymentPhase::Succeeded {
                receipt: receipt.clone(),
            },
            Err(error) => PaymentPhase::Failed {
                error: error.to_string(),
            },
        };
        self.last_outcome = Some(outcome);
        true
    }

    /// Terminal states fall back to `Idle`; an in-flight attempt is never abandoned.
    pub fn return_to_idle(&mut self) {
        if !self.is_submitting() {
            self.phase = PaymentPhase::Idle;
        }
    }
}

use thiserror::Error;
use vx_api_types::PaymentError;

#[derive(Debug, Error)]
pub enum TopUpError {
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error("failed to persist balance: {0:#}")]
    Storage(anyhow::Error),
    #[error("balance {balance} cannot grow by {amount}")]
    Overflow { balance: u64, amount: u64 },
}

impl TopUpError {
    /// Collapses the error into the payment outcome shown to the user.
    /// Anything that is not a gateway decline counts as an unexpected fault.
    pub fn into_payment_error(self) -> PaymentError {
        match self {
            TopUpError::Payment(err) => err,
            other => PaymentError::Fault(other.to_string()),
        }
    }
}

//! Add-funds form controller for the Voltrix wallet.
//!
//! Amount selection, fee totals, field formatting and validation, and the
//! simulated payment lifecycle that commits to a persisted balance.

pub mod amount;
pub mod balance;
pub mod config;
pub mod controller;
pub mod error;
pub mod format;
pub mod machine;
pub mod totals;
pub mod validate;

pub use amount::{AmountSelector, AmountSource};
pub use balance::BalanceStore;
pub use config::TopUpConfig;
pub use controller::{Effect, Submission, TopUpController};
pub use error::TopUpError;
pub use machine::{PaymentMachine, PaymentPhase};
pub use totals::Totals;
pub use validate::ValidationError;

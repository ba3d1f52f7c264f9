//! A single top-up described on the command line, driven through the controller.

use anyhow::{Context, Result, bail};
use tracing::{info, warn};
use vx_api_types::{CardDetails, CardField, Notice, PaymentError, PaymentMethod, PaymentReceipt};
use vx_gateway::PaymentGateway;
use vx_storage::{BalanceSlot, NoopSlot, RocksDbSlot};
use vx_topup_core::{Effect, TopUpConfig, TopUpController};

pub const USAGE: &str = "usage: topup-cli <amount> [method] [card-number expiry cvv name...]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopUpOrder {
    /// Raw amount text, handled like the free-text field unless it names a preset.
    pub amount: String,
    /// `None` keeps the configured default method.
    pub method: Option<PaymentMethod>,
    pub card: Option<CardDetails>,
}

impl TopUpOrder {
    pub fn parse(args: &[String]) -> Result<Self> {
        let Some((amount, rest)) = args.split_first() else {
            bail!(USAGE);
        };
        let method = rest
            .first()
            .map(|raw| raw.parse::<PaymentMethod>())
            .transpose()
            .with_context(|| USAGE.to_owned())?;

        let card = match rest.get(1..) {
            Some(fields) if !fields.is_empty() => {
                let [number, expiry, cvv, name @ ..] = fields else {
                    bail!("card payments need number, expiry, cvv and name\n{USAGE}");
                };
                if name.is_empty() {
                    bail!("card payments need number, expiry, cvv and name\n{USAGE}");
                }
                Some(CardDetails {
                    number: number.clone(),
                    expiry: expiry.clone(),
                    cvv: cvv.clone(),
                    name: name.join(" "),
                })
            }
            _ => None,
        };

        Ok(Self {
            amount: amount.clone(),
            method,
            card,
        })
    }
}

/// RocksDB slot when a store path is configured, otherwise a slot that forgets.
pub fn open_slot(db_path: Option<&str>, key: &str) -> Result<Box<dyn BalanceSlot>> {
    match db_path.map(str::trim).filter(|path| !path.is_empty()) {
        Some(path) => {
            info!(path, key, "opening balance store");
            Ok(Box::new(RocksDbSlot::open_default(path, key)?))
        }
        None => {
            warn!("TOPUP_DB_PATH is not set, the balance will not be persisted");
            Ok(Box::new(NoopSlot))
        }
    }
}

#[derive(Debug)]
pub struct Outcome {
    pub effects: Vec<Effect>,
    pub balance: u64,
    pub result: Result<PaymentReceipt, PaymentError>,
}

impl Outcome {
    /// The last notice the page would have shown.
    pub fn notice(&self) -> Option<&Notice> {
        self.effects.iter().rev().find_map(|effect| match effect {
            Effect::Notify(notice) => Some(notice),
            _ => None,
        })
    }
}

/// Fills the form the way a user would and submits it once.
pub async fn run<S, G>(
    config: TopUpConfig,
    slot: S,
    gateway: &G,
    order: &TopUpOrder,
) -> Result<Outcome>
where
    S: BalanceSlot,
    G: PaymentGateway + ?Sized,
{
    let mut controller = TopUpController::open(config, slot)?;
    let mut effects = controller.initial_effects();

    let preset = order
        .amount
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|value| controller.config().presets.contains(value));
    effects.extend(match preset {
        Some(value) => controller.on_preset_selected(value),
        None => controller.on_custom_amount_changed(&order.amount),
    });

    if let Some(method) = order.method {
        effects.extend(controller.on_method_changed(method));
    }
    if let Some(card) = &order.card {
        for field in [CardField::Number, CardField::Expiry, CardField::Cvv, CardField::Name] {
            effects.extend(controller.on_card_field_changed(field, card.get(field)));
        }
    }

    controller
        .validation()
        .context("top-up form is not valid")?;

    effects.extend(controller.submit(gateway).await);
    let result = controller
        .last_outcome()
        .cloned()
        .context("payment attempt did not start")?;

    Ok(Outcome {
        effects,
        balance: controller.balance(),
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use vx_gateway::{GatewayConfig, NoDelay, SimulatedGateway};
    use vx_storage::InMemorySlot;
    use vx_topup_core::controller::{DECLINED_MESSAGE, SUCCESS_MESSAGE};

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|arg| (*arg).to_owned()).collect()
    }

    fn gateway() -> SimulatedGateway<NoDelay> {
        SimulatedGateway::new(&GatewayConfig::default(), NoDelay)
    }

    #[test]
    fn amount_alone_keeps_default_method() -> Result<()> {
        let order = TopUpOrder::parse(&args(&["50000"]))?;
        assert_eq!(order.amount, "50000");
        assert_eq!(order.method, None);
        assert_eq!(order.card, None);
        Ok(())
    }

    #[test]
    fn card_name_collects_remaining_words() -> Result<()> {
        let order = TopUpOrder::parse(&args(&[
            "20000",
            "card",
            "4242424242424242",
            "08/28",
            "321",
            "Siti",
            "Rahma",
        ]))?;
        assert_eq!(order.method, Some(PaymentMethod::Card));
        let card = order.card.expect("card details parsed");
        assert_eq!(card.name, "Siti Rahma");
        assert_eq!(card.cvv, "321");
        Ok(())
    }

    #[test]
    fn malformed_arguments_are_rejected() {
        assert!(TopUpOrder::parse(&[]).is_err());
        assert!(TopUpOrder::parse(&args(&["50000", "paypal"])).is_err());
        assert!(TopUpOrder::parse(&args(&["50000", "card", "4242424242424242", "08/28"])).is_err());
        assert!(TopUpOrder::parse(&args(&["50000", "card", "4242", "08/28", "321"])).is_err());
    }

    #[tokio::test]
    async fn preset_top_up_commits_to_slot() -> Result<()> {
        let slot = Arc::new(InMemorySlot::default());
        let order = TopUpOrder::parse(&args(&["50000", "dana"]))?;
        let outcome = run(TopUpConfig::default(), Arc::clone(&slot), &gateway(), &order).await?;

        assert_eq!(outcome.balance, 50_000);
        assert_eq!(outcome.result.as_ref().map(|receipt| receipt.amount), Ok(50_000));
        assert_eq!(outcome.notice().map(|n| n.message.as_str()), Some(SUCCESS_MESSAGE));
        assert_eq!(slot.current().as_deref(), Some("50000"));
        assert!(outcome.effects.contains(&Effect::PresetHighlighted(Some(50_000))));
        Ok(())
    }

    #[tokio::test]
    async fn declined_card_leaves_balance() -> Result<()> {
        let slot = Arc::new(InMemorySlot::with_value("10000"));
        let order = TopUpOrder::parse(&args(&[
            "20000",
            "card",
            "4111 1111 1111 1111",
            "12/29",
            "123",
            "Budi",
        ]))?;
        let outcome = run(TopUpConfig::default(), Arc::clone(&slot), &gateway(), &order).await?;

        assert_eq!(outcome.balance, 10_000);
        assert_eq!(
            outcome.result,
            Err(PaymentError::Declined {
                method: PaymentMethod::Card
            })
        );
        assert_eq!(outcome.notice().map(|n| n.message.as_str()), Some(DECLINED_MESSAGE));
        assert_eq!(slot.current().as_deref(), Some("10000"));
        Ok(())
    }

    #[tokio::test]
    async fn invalid_form_is_not_submitted() -> Result<()> {
        let order = TopUpOrder::parse(&args(&["7500", "ovo"]))?;
        let err = run(TopUpConfig::default(), NoopSlot, &gateway(), &order)
            .await
            .expect_err("amount below minimum");
        assert!(format!("{err:#}").contains("below the minimum"), "{err:#}");
        Ok(())
    }

    #[tokio::test]
    async fn rocksdb_balance_accumulates_across_runs() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("balance");
        let path = path.to_str().expect("temp path is utf-8");
        let order = TopUpOrder::parse(&args(&["75.000", "gopay"]))?;

        let first = run(
            TopUpConfig::default(),
            open_slot(Some(path), "voltrixBalance")?,
            &gateway(),
            &order,
        )
        .await?;
        assert_eq!(first.balance, 75_000);

        let second = run(
            TopUpConfig::default(),
            open_slot(Some(path), "voltrixBalance")?,
            &gateway(),
            &order,
        )
        .await?;
        assert_eq!(second.balance, 150_000);
        Ok(())
    }

    #[test]
    fn blank_store_path_forgets_balance() -> Result<()> {
        let slot = open_slot(Some("  "), "voltrixBalance")?;
        slot.store("50000")?;
        assert_eq!(slot.load()?, None);
        Ok(())
    }
}

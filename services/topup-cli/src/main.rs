//! Runs one add-funds attempt from the command line against the simulated gateway.
//!
//! Configuration comes from `TOPUP_*` environment variables; `TOPUP_DB_PATH`
//! selects the RocksDB balance store.

mod order;

use anyhow::{Result, bail};
use tracing::{debug, info};
use vx_gateway::{GatewayConfig, SimulatedGateway, TokioDelay};
use vx_topup_core::TopUpConfig;
use vx_topup_core::format::format_idr;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let order = order::TopUpOrder::parse(&args)?;

    let config = TopUpConfig::from_env();
    let gateway = SimulatedGateway::new(&GatewayConfig::from_env(), TokioDelay);
    let db_path = std::env::var("TOPUP_DB_PATH").ok();
    let slot = order::open_slot(db_path.as_deref(), &config.balance_key)?;

    let outcome = order::run(config, slot, &gateway, &order).await?;
    for effect in &outcome.effects {
        debug!(effect = %serde_json::to_string(effect)?, "effect");
    }
    if let Some(notice) = outcome.notice() {
        println!("{}", notice.message);
    }

    match outcome.result {
        Ok(receipt) => {
            info!(reference = %receipt.reference, latency_ms = receipt.latency_ms, "top-up settled");
            println!("saldo: {}", format_idr(outcome.balance));
            Ok(())
        }
        Err(err) => bail!("top-up failed: {err}"),
    }
}

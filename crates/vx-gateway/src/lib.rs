use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;
use vx_api_types::{PaymentError, PaymentMethod, PaymentReceipt, TopUpRequest};

pub const DECLINED_TEST_CARD_PREFIX: &str = "4111";

/// Non-blocking wait used to simulate gateway latency.
#[async_trait(?Send)]
pub trait Delay {
    async fn sleep(&self, duration: Duration);
}

/// Resolves immediately. Useful for tests and for a zero-latency demo mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

#[async_trait(?Send)]
impl Delay for NoDelay {
    async fn sleep(&self, _duration: Duration) {}
}

#[cfg(feature = "tokio")]
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioDelay;

#[cfg(feature = "tokio")]
#[async_trait(?Send)]
impl Delay for TokioDelay {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[async_trait(?Send)]
pub trait PaymentGateway {
    async fn charge(&self, request: &TopUpRequest) -> Result<PaymentReceipt, PaymentError>;
}

/// Decides whether a simulated attempt is declined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclineRule {
    Never,
    Always,
    /// Declines card payments whose digits start with the prefix.
    CardPrefix(String),
}

impl DeclineRule {
    pub fn declines(&self, request: &TopUpRequest) -> bool {
        match self {
            DeclineRule::Never => false,
            DeclineRule::Always => true,
            DeclineRule::CardPrefix(prefix) => request
                .card
                .as_ref()
                .is_some_and(|card| card.number_digits().starts_with(prefix.as_str())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodProfile {
    pub latency: Duration,
    pub decline: DeclineRule,
}

/// Tunables for [`SimulatedGateway`].
///
/// Reads `TOPUP_DECLINE_PREFIX` and `TOPUP_LATENCY_SCALE` from the environment in
/// [`GatewayConfig::from_env`]; everything else comes from defaults or JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    pub latency_ms: HashMap<PaymentMethod, u64>,
    pub declined_card_prefix: String,
    pub latency_scale: f64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        let latency_ms = PaymentMethod::ALL
            .into_iter()
            .map(|method| (method, default_latency_ms(method)))
            .collect();
        Self {
            latency_ms,
            declined_card_prefix: DECLINED_TEST_CARD_PREFIX.to_owned(),
            latency_scale: 1.0,
        }
    }
}

fn default_latency_ms(method: PaymentMethod) -> u64 {
    match method {
        PaymentMethod::Card => 1500,
        PaymentMethod::Dana => 1000,
        PaymentMethod::Gopay => 800,
        PaymentMethod::Ovo => 800,
        PaymentMethod::Shopeepay => 900,
        PaymentMethod::Bank => 2000,
    }
}

impl GatewayConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("invalid gateway config json")
    }

    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(prefix) = lookup("TOPUP_DECLINE_PREFIX") {
            self.declined_card_prefix = prefix.trim().to_owned();
        }
        if let Some(raw) = lookup("TOPUP_LATENCY_SCALE") {
            match raw.trim().parse::<f64>() {
                Ok(scale) => self.latency_scale = scale,
                Err(err) => warn!("ignoring TOPUP_LATENCY_SCALE={raw:?}: {err}"),
            }
        }
        self
    }

    pub fn latency_for(&self, method: PaymentMethod) -> Duration {
        let base = self
            .latency_ms
            .get(&method)
            .copied()
            .unwrap_or_else(|| default_latency_ms(method));
        let scale = if self.latency_scale.is_finite() && self.latency_scale >= 0.0 {
            self.latency_scale
        } else {
            warn!("latency scale {} is not usable, falling back to 1.0", self.latency_scale);
            1.0
        };
        Duration::from_millis((base as f64 * scale).round() as u64)
    }

    pub fn profiles(&self) -> HashMap<PaymentMethod, MethodProfile> {
        PaymentMethod::ALL
            .into_iter()
            .map(|method| {
                let decline = match method {
                    PaymentMethod::Card if !self.declined_card_prefix.is_empty() => {
                        DeclineRule::CardPrefix(self.declined_card_prefix.clone())
                    }
                    _ => DeclineRule::Never,
                };
                (
                    method,
                    MethodProfile {
                        latency: self.latency_for(method),
                        decline,
                    },
                )
            })
            .collect()
    }
}

/// In-process stand-in for the payment providers.
///
/// Each method waits for its configured latency and then settles according to its
/// [`DeclineRule`].
pub struct SimulatedGateway<D> {
    profiles: HashMap<PaymentMethod, MethodProfile>,
    delay: D,
}

impl<D: Delay> SimulatedGateway<D> {
    pub fn new(config: &GatewayConfig, delay: D) -> Self {
        Self {
            profiles: config.profiles(),
            delay,
        }
    }

    pub fn with_profile(mut self, method: PaymentMethod, profile: MethodProfile) -> Self {
        self.profiles.insert(method, profile);
        self
    }
}

#[async_trait(?Send)]
impl<D: Delay> PaymentGateway for SimulatedGateway<D> {
    async fn charge(&self, request: &TopUpRequest) -> Result<PaymentReceipt, PaymentError> {
        let Some(profile) = self.profiles.get(&request.method) else {
            return Err(PaymentError::Fault(format!(
                "no simulated gateway for {}",
                request.method
            )));
        };

        if request.method == PaymentMethod::Card && request.card.is_none() {
            return Err(PaymentError::Fault("card details missing".to_owned()));
        }

        debug!(
            method = %request.method,
            amount = request.amount,
            latency_ms = profile.latency.as_millis() as u64,
            "simulating gateway call"
        );
        self.delay.sleep(profile.latency).await;

        if profile.decline.declines(request) {
            return Err(PaymentError::Declined {
                method: request.method,
            });
        }

        Ok(PaymentReceipt {
            reference: Uuid::new_v4(),
            method: request.method,
            amount: request.amount,
            latency_ms: profile.latency.as_millis() as u64,
        })
    }
}

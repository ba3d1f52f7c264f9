//! The add-funds form controller.
//!
//! Each `on_*` handler is a synchronous state transition that returns the
//! presentation [`Effect`]s the front end has to apply, in order. The only
//! asynchronous step is the gateway call between [`TopUpController::on_submit`]
//! and [`TopUpController::on_payment_resolved`]; callers that cannot hold the
//! controller across an await point (the browser front end) drive the two halves
//! themselves, everyone else can use [`TopUpController::submit`].

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, warn};
use vx_api_types::{
    CardDetails, CardField, Notice, PaymentError, PaymentMethod, PaymentReceipt, TopUpRequest,
};
use vx_gateway::PaymentGateway;
use vx_storage::BalanceSlot;

use crate::amount::{AmountSelector, AmountSource};
use crate::balance::BalanceStore;
use crate::config::TopUpConfig;
use crate::error::TopUpError;
use crate::format::{format_card_number, format_cvv, format_expiry};
use crate::machine::{PaymentMachine, PaymentPhase};
use crate::totals::Totals;
use crate::validate::{ValidationError, validate};

pub const SUCCESS_MESSAGE: &str = "Saldo berhasil ditambahkan!";
pub const DECLINED_MESSAGE: &str = "Pembayaran gagal. Silakan coba lagi.";
pub const FAULT_MESSAGE: &str = "Terjadi kesalahan. Silakan coba lagi.";

/// A presentation update emitted by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "effect", content = "data")]
pub enum Effect {
    BalanceChanged(u64),
    TotalsChanged(Totals),
    PresetHighlighted(Option<u64>),
    CustomAmountText(String),
    MethodSelected(PaymentMethod),
    CardDetailsVisible(bool),
    CardFieldText { field: CardField, text: String },
    SubmitEnabled(bool),
    PhaseChanged(PaymentPhase),
    ConfirmationShown { amount: u64 },
    ConfirmationHidden,
    Notify(Notice),
}

/// Result of [`TopUpController::on_submit`]: the effects to render and, when an
/// attempt actually started, the request to hand to the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub effects: Vec<Effect>,
    pub request: Option<TopUpRequest>,
}

pub struct TopUpController<S> {
    config: TopUpConfig,
    selector: AmountSelector,
    method: PaymentMethod,
    card: CardDetails,
    balance: BalanceStore<S>,
    machine: PaymentMachine,
    confirmation: Option<u64>,
}

impl<S: BalanceSlot> TopUpController<S> {
    pub fn new(config: TopUpConfig, balance: BalanceStore<S>) -> Self {
        Self {
            selector: AmountSelector::new(config.max_amount),
            method: config.default_method,
            card: CardDetails::default(),
            balance,
            machine: PaymentMachine::default(),
            confirmation: None,
            config,
        }
    }

    /// Loads the balance from `slot` and builds the controller around it.
    pub fn open(config: TopUpConfig, slot: S) -> Result<Self> {
        let balance = BalanceStore::load(slot)?;
        Ok(Self::new(config, balance))
    }

    /// Everything the front end needs to paint the initial form.
    pub fn initial_effects(&self) -> Vec<Effect> {
        vec![
            Effect::BalanceChanged(self.balance()),
            Effect::MethodSelected(self.method),
            Effect::CardDetailsVisible(self.method == PaymentMethod::Card),
            Effect::PresetHighlighted(self.selector.active_preset()),
            Effect::CustomAmountText(self.selector.custom_text().to_owned()),
            Effect::TotalsChanged(self.totals()),
            Effect::PhaseChanged(self.machine.phase().clone()),
            Effect::SubmitEnabled(self.can_submit()),
        ]
    }

    // ── Queries ──

    pub fn config(&self) -> &TopUpConfig {
        &self.config
    }

    pub fn balance(&self) -> u64 {
        self.balance.balance()
    }

    pub fn amount(&self) -> u64 {
        self.selector.amount()
    }

    pub fn amount_source(&self) -> AmountSource {
        self.selector.source()
    }

    pub fn custom_text(&self) -> &str {
        self.selector.custom_text()
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn card(&self) -> &CardDetails {
        &self.card
    }

    pub fn totals(&self) -> Totals {
        Totals::for_amount(self.amount(), self.config.fee_bps)
    }

    pub fn validation(&self) -> Result<(), ValidationError> {
        validate(self.amount(), self.config.min_amount, self.method, &self.card)
    }

    pub fn is_valid(&self) -> bool {
        self.validation().is_ok()
    }

    /// Valid and not already submitting.
    pub fn can_submit(&self) -> bool {
        self.is_valid() && !self.machine.is_submitting()
    }

    pub fn phase(&self) -> &PaymentPhase {
        self.machine.phase()
    }

    pub fn last_outcome(&self) -> Option<&Result<PaymentReceipt, PaymentError>> {
        self.machine.last_outcome()
    }

    pub fn confirmation(&self) -> Option<u64> {
        self.confirmation
    }

    // ── Handlers ──

    pub fn on_preset_selected(&mut self, value: u64) -> Vec<Effect> {
        if !self.config.presets.contains(&value) {
            warn!("ignoring preset {value}: not in the catalog");
            return Vec::new();
        }
        self.selector.select_preset(value);
        self.amount_effects()
    }

    pub fn on_custom_amount_changed(&mut self, text: &str) -> Vec<Effect> {
        self.selector.set_custom_amount(text);
        self.amount_effects()
    }

    pub fn on_method_changed(&mut self, method: PaymentMethod) -> Vec<Effect> {
        self.method = method;
        vec![
            Effect::MethodSelected(method),
            Effect::CardDetailsVisible(method == PaymentMethod::Card),
            Effect::SubmitEnabled(self.can_submit()),
        ]
    }

    /// Formats the raw input and stores the formatted text, which is echoed back so
    /// the input shows the same value the validator sees.
    pub fn on_card_field_changed(&mut self, field: CardField, raw: &str) -> Vec<Effect> {
        let text = match field {
            CardField::Number => format_card_number(raw),
            CardField::Expiry => format_expiry(raw),
            CardField::Cvv => format_cvv(raw),
            CardField::Name => raw.to_owned(),
        };
        self.card.set(field, text.clone());
        vec![
            Effect::CardFieldText { field, text },
            Effect::SubmitEnabled(self.can_submit()),
        ]
    }

    /// Starts an attempt from a snapshot of the form. Ignored while another attempt
    /// is in flight or while the form is invalid.
    pub fn on_submit(&mut self) -> Submission {
        if self.machine.is_submitting() {
            debug!("submit ignored: an attempt is already in flight");
            return Submission::default();
        }
        if let Err(err) = self.validation() {
            debug!("submit ignored: {err}");
            return Submission::default();
        }

        let request = TopUpRequest {
            amount: self.amount(),
            method: self.method,
            card: (self.method == PaymentMethod::Card).then(|| self.card.clone()),
        };
        if !self.machine.begin(request.clone()) {
            return Submission::default();
        }

        Submission {
            effects: vec![
                Effect::PhaseChanged(self.machine.phase().clone()),
                Effect::SubmitEnabled(false),
            ],
            request: Some(request),
        }
    }

    /// Settles the in-flight attempt with the gateway's answer. Commits the balance
    /// on success; a failed commit is reported like any other fault.
    pub fn on_payment_resolved(
        &mut self,
        result: Result<PaymentReceipt, PaymentError>,
    ) -> Vec<Effect> {
        let Some(request) = self.machine.in_flight().cloned() else {
            warn!("payment result arrived with no attempt in flight");
            return Vec::new();
        };

        let outcome = result.map_err(TopUpError::from).and_then(|receipt| {
            self.balance.commit(request.amount).map(|balance| (receipt, balance))
        });

        let mut effects = Vec::new();
        match outcome {
            Ok((receipt, balance)) => {
                info!(
                    reference = %receipt.reference,
                    method = %request.method,
                    amount = request.amount,
                    balance,
                    "top-up committed"
                );
                self.machine.complete(Ok(receipt));
                self.confirmation = Some(request.amount);
                effects.push(Effect::PhaseChanged(self.machine.phase().clone()));
                effects.push(Effect::BalanceChanged(balance));
                effects.push(Effect::ConfirmationShown {
                    amount: request.amount,
                });
                effects.extend(self.reset_form());
                effects.push(Effect::Notify(Notice::success(SUCCESS_MESSAGE)));
            }
            Err(err) => {
                let error = err.into_payment_error();
                warn!(method = %request.method, amount = request.amount, "top-up failed: {error}");
                let message = match error {
                    PaymentError::Declined { .. } => DECLINED_MESSAGE,
                    PaymentError::Fault(_) => FAULT_MESSAGE,
                };
                self.machine.complete(Err(error));
                effects.push(Effect::PhaseChanged(self.machine.phase().clone()));
                effects.push(Effect::Notify(Notice::error(message)));
            }
        }

        self.machine.return_to_idle();
        effects.push(Effect::PhaseChanged(self.machine.phase().clone()));
        effects.push(Effect::SubmitEnabled(self.can_submit()));
        effects
    }

    pub fn on_dismiss(&mut self) -> Vec<Effect> {
        match self.confirmation.take() {
            Some(_) => vec![Effect::ConfirmationHidden],
            None => Vec::new(),
        }
    }

    /// Runs a whole attempt against `gateway`: submit, await the simulated call,
    /// settle. Returns every effect produced along the way.
    pub async fn submit<G>(&mut self, gateway: &G) -> Vec<Effect>
    where
        G: PaymentGateway + ?Sized,
    {
        let Submission {
            mut effects,
            request,
        } = self.on_submit();
        let Some(request) = request else {
            return effects;
        };
        let result = gateway.charge(&request).await;
        effects.extend(self.on_payment_resolved(result));
        effects
    }

    // ── Internals ──

    fn amount_effects(&self) -> Vec<Effect> {
        vec![
            Effect::PresetHighlighted(self.selector.active_preset()),
            Effect::CustomAmountText(self.selector.custom_text().to_owned()),
            Effect::TotalsChanged(self.totals()),
            Effect::SubmitEnabled(self.can_submit()),
        ]
    }

    fn reset_form(&mut self) -> Vec<Effect> {
        self.selector.reset();
        self.card = CardDetails::default();
        self.method = self.config.default_method;

        let mut effects = vec![
            Effect::PresetHighlighted(None),
            Effect::CustomAmountText(String::new()),
            Effect::MethodSelected(self.method),
            Effect::CardDetailsVisible(self.method == PaymentMethod::Card),
        ];
        effects.extend(
            [CardField::Number, CardField::Expiry, CardField::Cvv, CardField::Name]
                .into_iter()
                .map(|field| Effect::CardFieldText {
                    field,
                    text: String::new(),
                }),
        );
        effects.push(Effect::TotalsChanged(self.totals()));
        effects
    }
}

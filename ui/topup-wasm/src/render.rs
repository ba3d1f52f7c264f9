//! Applies controller effects to the DOM.

use vx_api_types::{CardField, PaymentMethod};
use vx_topup_core::Effect;
use vx_topup_core::format::format_idr;

use crate::dom::{self, Elements};
use crate::notify;

pub fn apply(els: &Elements, effects: &[Effect]) {
    for effect in effects {
        if let Ok(json) = serde_json::to_string(effect) {
            gloo_console::debug!(json);
        }
        apply_one(els, effect);
    }
}

fn apply_one(els: &Elements, effect: &Effect) {
    match effect {
        Effect::BalanceChanged(balance) => {
            dom::set_text(&els.current_balance, &format_idr(*balance));
        }
        Effect::TotalsChanged(totals) => {
            dom::set_text(&els.selected_amount, &format_idr(totals.subtotal));
            dom::set_text(&els.processing_fee, &format_idr(totals.fee));
            dom::set_text(&els.total_amount, &format_idr(totals.total));
        }
        Effect::PresetHighlighted(active) => {
            for button in &els.amount_buttons {
                let on = active.is_some() && dom::preset_value(button) == *active;
                dom::toggle_class(button, "selected", on);
            }
        }
        Effect::CustomAmountText(text) => dom::set_input_value(&els.custom_amount, text),
        Effect::MethodSelected(method) => select_method(els, *method),
        Effect::CardDetailsVisible(visible) => {
            dom::set_display(&els.card_details, if *visible { "block" } else { "none" });
        }
        Effect::CardFieldText { field, text } => {
            let input = match field {
                CardField::Number => &els.card_number,
                CardField::Expiry => &els.expiry_date,
                CardField::Cvv => &els.cvv,
                CardField::Name => &els.card_name,
            };
            dom::set_input_value(input, text);
        }
        Effect::SubmitEnabled(enabled) => els.add_funds_btn.set_disabled(!enabled),
        Effect::PhaseChanged(phase) => show_loading(els, phase.is_submitting()),
        Effect::ConfirmationShown { amount } => {
            dom::set_text(&els.added_amount, &format_idr(*amount));
            dom::set_display(&els.success_modal, "flex");
        }
        Effect::ConfirmationHidden => dom::set_display(&els.success_modal, "none"),
        Effect::Notify(notice) => notify::show(notice),
    }
}

fn select_method(els: &Elements, method: PaymentMethod) {
    for option in &els.payment_options {
        let checked = option.value() == method.as_str();
        if option.checked() != checked {
            option.set_checked(checked);
        }
    }
}

fn show_loading(els: &Elements, loading: bool) {
    dom::set_display(&els.btn_text, if loading { "none" } else { "inline" });
    dom::set_display(&els.btn_loading, if loading { "inline" } else { "none" });
}


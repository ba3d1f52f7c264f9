//! Event binding.
//!
//! Every listener forwards to a controller handler and renders the returned
//! effects. The gateway call is the only async step and runs via
//! `wasm_bindgen_futures::spawn_local`.

use vx_api_types::{CardField, PaymentMethod};
use vx_gateway::PaymentGateway;
use vx_topup_core::Effect;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, HtmlInputElement, KeyboardEvent, MouseEvent};

use crate::dom::{self, Elements};
use crate::render;
use crate::state::{self, PageController};

/// Helper: attach a listener and leak the closure for the page lifetime.
macro_rules! listen {
    ($target:expr, $event:expr, $ty:ty, $cb:expr) => {{
        let cb = Closure::wrap(Box::new($cb) as Box<dyn FnMut($ty)>);
        let target: &EventTarget = $target.as_ref();
        if let Err(err) =
            target.add_event_listener_with_callback($event, cb.as_ref().unchecked_ref())
        {
            gloo_console::error!("failed to bind", $event, err);
        }
        cb.forget();
    }};
}

/// Runs `f` against the controller and renders whatever it emits.
fn dispatch<F>(els: &Elements, f: F)
where
    F: FnOnce(&mut PageController) -> Vec<Effect>,
{
    if let Some(effects) = state::with_controller(f) {
        render::apply(els, &effects);
    }
}

/// Bind all UI event listeners. Call once after init.
pub fn bind_events(els: &Elements) {
    // ── Amount ──
    for button in &els.amount_buttons {
        let Some(value) = dom::preset_value(button) else {
            continue;
        };
        let els2 = els.clone();
        listen!(button, "click", MouseEvent, move |_: MouseEvent| {
            dispatch(&els2, |c| c.on_preset_selected(value));
        });
    }

    let els2 = els.clone();
    listen!(els.custom_amount, "input", Event, move |_: Event| {
        let text = els2.custom_amount.value();
        dispatch(&els2, |c| c.on_custom_amount_changed(&text));
    });

    // ── Payment method ──
    for option in &els.payment_options {
        let els2 = els.clone();
        let input = option.clone();
        listen!(option, "change", Event, move |_: Event| {
            match input.value().parse::<PaymentMethod>() {
                Ok(method) => dispatch(&els2, |c| c.on_method_changed(method)),
                Err(err) => gloo_console::warn!(err.to_string()),
            }
        });
    }

    // ── Card fields ──
    for (input, field) in [
        (&els.card_number, CardField::Number),
        (&els.expiry_date, CardField::Expiry),
        (&els.cvv, CardField::Cvv),
        (&els.card_name, CardField::Name),
    ] {
        let els2 = els.clone();
        let source = input.clone();
        listen!(input, "input", Event, move |_: Event| {
            let raw = source.value();
            dispatch(&els2, |c| c.on_card_field_changed(field, &raw));
        });
    }

    // ── Submit ──
    let els2 = els.clone();
    listen!(els.add_funds_btn, "click", MouseEvent, move |_: MouseEvent| {
        if !els2.add_funds_btn.disabled() {
            submit(&els2);
        }
    });

    // ── Confirmation modal ──
    let els2 = els.clone();
    listen!(els.close_modal_btn, "click", MouseEvent, move |_: MouseEvent| {
        dispatch(&els2, |c| c.on_dismiss());
    });

    let els2 = els.clone();
    listen!(els.success_modal, "click", MouseEvent, move |e: MouseEvent| {
        let modal: &EventTarget = els2.success_modal.as_ref();
        if e.target().as_ref() == Some(modal) {
            dispatch(&els2, |c| c.on_dismiss());
        }
    });

    let els2 = els.clone();
    let document = gloo_utils::document();
    listen!(document, "keydown", KeyboardEvent, move |e: KeyboardEvent| {
        if e.key() == "Escape" {
            dispatch(&els2, |c| c.on_dismiss());
        }
    });

    // ── Focus highlight ──
    for input in &els.text_inputs {
        bind_focus(input);
    }
}

fn bind_focus(input: &HtmlInputElement) {
    let Some(parent) = input.parent_element() else {
        return;
    };
    let on_focus = parent.clone();
    listen!(input, "focus", Event, move |_: Event| {
        dom::add_class(&on_focus, "focused");
    });
    listen!(input, "blur", Event, move |_: Event| {
        dom::remove_class(&parent, "focused");
    });
}

fn submit(els: &Elements) {
    let Some(gateway) = state::gateway() else {
        gloo_console::error!("payment gateway not installed");
        return;
    };
    let Some(submission) = state::with_controller(|c| c.on_submit()) else {
        return;
    };
    render::apply(els, &submission.effects);
    let Some(request) = submission.request else {
        return;
    };

    let els = els.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let result = gateway.charge(&request).await;
        dispatch(&els, |c| c.on_payment_resolved(result));
    });
}

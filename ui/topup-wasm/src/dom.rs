//! DOM element bindings.
//!
//! All add-funds elements are resolved once at startup. To add a new element,
//! add a field here and bind it in `Elements::bind()`.

use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlButtonElement, HtmlElement, HtmlInputElement};

// ── Helpers ──

pub fn by_id(id: &str) -> Option<Element> {
    gloo_utils::document().get_element_by_id(id)
}

pub fn by_id_as<T: JsCast>(id: &str) -> Option<T> {
    by_id(id)?.dyn_into::<T>().ok()
}

pub fn query_as<T: JsCast>(selector: &str) -> Option<T> {
    gloo_utils::document()
        .query_selector(selector)
        .ok()??
        .dyn_into::<T>()
        .ok()
}

/// Every match of `selector` that can be cast to `T`, in document order.
pub fn query_all<T: JsCast>(selector: &str) -> Vec<T> {
    let Ok(nodes) = gloo_utils::document().query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect()
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

/// Writes `val` only when it differs, so the caret does not jump while typing.
pub fn set_input_value(el: &HtmlInputElement, val: &str) {
    if el.value() != val {
        el.set_value(val);
    }
}

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn remove_class(el: &Element, cls: &str) {
    let _ = el.class_list().remove_1(cls);
}

pub fn toggle_class(el: &Element, cls: &str, on: bool) {
    if on {
        add_class(el, cls);
    } else {
        remove_class(el, cls);
    }
}

pub fn set_display(el: &HtmlElement, value: &str) {
    let _ = el.style().set_property("display", value);
}

// ── Elements struct ──

/// Every DOM reference the add-funds page uses. Cheap to clone, the fields are
/// handles to JS objects.
#[derive(Clone)]
pub struct Elements {
    // Amount
    pub amount_buttons: Vec<Element>,
    pub custom_amount: HtmlInputElement,

    // Payment method
    pub payment_options: Vec<HtmlInputElement>,
    pub card_details: HtmlElement,
    pub card_number: HtmlInputElement,
    pub expiry_date: HtmlInputElement,
    pub cvv: HtmlInputElement,
    pub card_name: HtmlInputElement,

    // Summary
    pub selected_amount: Element,
    pub processing_fee: Element,
    pub total_amount: Element,
    pub current_balance: Element,

    // Submit
    pub add_funds_btn: HtmlButtonElement,
    pub btn_text: HtmlElement,
    pub btn_loading: HtmlElement,

    // Confirmation modal
    pub success_modal: HtmlElement,
    pub close_modal_btn: HtmlElement,
    pub added_amount: Element,

    // Focus highlighting targets
    pub text_inputs: Vec<HtmlInputElement>,
}

/// `by_id_as` that fails `bind()` with the missing id.
macro_rules! require {
    ($ty:ty, $id:expr) => {
        by_id_as::<$ty>($id).ok_or_else(|| {
            JsValue::from_str(&format!("missing #{} ({})", $id, stringify!($ty)))
        })?
    };
}

macro_rules! require_query {
    ($selector:expr) => {
        query_as::<HtmlElement>($selector)
            .ok_or_else(|| JsValue::from_str(&format!("missing {}", $selector)))?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once after DOMContentLoaded.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            amount_buttons: query_all::<Element>(".amount-btn"),
            custom_amount: require!(HtmlInputElement, "customAmount"),

            payment_options: query_all::<HtmlInputElement>("input[name=\"payment\"]"),
            card_details: require!(HtmlElement, "cardDetails"),
            card_number: require!(HtmlInputElement, "cardNumber"),
            expiry_date: require!(HtmlInputElement, "expiryDate"),
            cvv: require!(HtmlInputElement, "cvv"),
            card_name: require!(HtmlInputElement, "cardName"),

            selected_amount: require!(Element, "selectedAmount"),
            processing_fee: require!(Element, "processingFee"),
            total_amount: require!(Element, "totalAmount"),
            current_balance: require!(Element, "currentBalance"),

            add_funds_btn: require!(HtmlButtonElement, "addFundsBtn"),
            btn_text: require_query!(".btn-text"),
            btn_loading: require_query!(".btn-loading"),

            success_modal: require!(HtmlElement, "successModal"),
            close_modal_btn: require!(HtmlElement, "closeModal"),
            added_amount: require!(Element, "addedAmount"),

            text_inputs: query_all::<HtmlInputElement>(
                "input[type=\"text\"], input[type=\"number\"]",
            ),
        })
    }

    /// Preset catalog taken from the `data-amount` attribute of each amount button.
    pub fn preset_values(&self) -> Vec<u64> {
        self.amount_buttons
            .iter()
            .filter_map(preset_value)
            .collect()
    }
}

pub fn preset_value(button: &Element) -> Option<u64> {
    button
        .get_attribute("data-amount")
        .and_then(|raw| raw.trim().parse::<u64>().ok())
}

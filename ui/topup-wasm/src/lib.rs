//! Voltrix add-funds page in Rust + WASM.
//!
//! Binds the static add-funds markup to the top-up controller. Each concern
//! lives in its own module.

pub mod config;
pub mod dom;
pub mod events;
pub mod notify;
pub mod render;
pub mod state;
pub mod timers;

use wasm_bindgen::prelude::*;

/// WASM entry point, called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    init()
}

fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;

    let raw = dom::by_id("topupConfig").and_then(|el| el.text_content());
    let config = config::PageConfig::parse(raw.as_deref())
        .map_err(|err| JsValue::from_str(&format!("{err:#}")))?
        .with_page_presets(els.preset_values());

    let slot = state::LocalStorageSlot::new(config.form.balance_key.clone());
    let controller = state::PageController::open(config.form, slot)
        .map_err(|err| JsValue::from_str(&format!("failed to load balance: {err:#}")))?;
    let gateway = state::PageGateway::new(&config.gateway, timers::GlooDelay);

    let effects = controller.initial_effects();
    state::install(controller, gateway);
    render::apply(&els, &effects);

    events::bind_events(&els);

    gloo_console::log!("add-funds page ready");
    Ok(())
}

//! Global page state.
//!
//! Uses `RefCell`-wrapped `thread_local!` storage (WASM is single-threaded).
//! The controller is never borrowed across an await point: submission is split
//! into `on_submit` and `on_payment_resolved` around the gateway call.

use anyhow::{Result, anyhow};
use std::cell::RefCell;
use std::rc::Rc;
use vx_gateway::SimulatedGateway;
use vx_storage::BalanceSlot;
use vx_topup_core::TopUpController;

use crate::timers::GlooDelay;

pub type PageController = TopUpController<LocalStorageSlot>;
pub type PageGateway = SimulatedGateway<GlooDelay>;

thread_local! {
    static CONTROLLER: RefCell<Option<PageController>> = const { RefCell::new(None) };
    static GATEWAY: RefCell<Option<Rc<PageGateway>>> = const { RefCell::new(None) };
}

pub fn install(controller: PageController, gateway: PageGateway) {
    CONTROLLER.with(|c| *c.borrow_mut() = Some(controller));
    GATEWAY.with(|g| *g.borrow_mut() = Some(Rc::new(gateway)));
}

/// Run a closure with the controller. `None` before `install`.
pub fn with_controller<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut PageController) -> R,
{
    CONTROLLER.with(|c| c.borrow_mut().as_mut().map(f))
}

pub fn gateway() -> Option<Rc<PageGateway>> {
    GATEWAY.with(|g| g.borrow().clone())
}

// ── localStorage ──

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Balance slot backed by a single `localStorage` key. Browsers without
/// storage behave like an empty, read-only slot.
#[derive(Debug, Clone)]
pub struct LocalStorageSlot {
    key: String,
}

impl LocalStorageSlot {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl BalanceSlot for LocalStorageSlot {
    fn load(&self) -> Result<Option<String>> {
        let Some(storage) = storage() else {
            return Ok(None);
        };
        storage
            .get_item(&self.key)
            .map_err(|err| anyhow!("localStorage read of {} failed: {err:?}", self.key))
    }

    fn store(&self, value: &str) -> Result<()> {
        let storage = storage().ok_or_else(|| anyhow!("localStorage unavailable"))?;
        storage
            .set_item(&self.key, value)
            .map_err(|err| anyhow!("localStorage write of {} failed: {err:?}", self.key))
    }
}

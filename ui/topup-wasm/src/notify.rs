//! Toast notifications.

use gloo_timers::callback::Timeout;
use vx_api_types::{Notice, Severity};
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

const SLIDE_IN_MS: u32 = 100;
const VISIBLE_MS: u32 = 3000;
const SLIDE_OUT_MS: u32 = 300;

fn background(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "#10b981",
        Severity::Error => "#ef4444",
    }
}

/// Appends a toast to `<body>`, slides it in, and removes it after a few seconds.
pub fn show(notice: &Notice) {
    let document = gloo_utils::document();
    let Some(body) = document.body() else {
        return;
    };
    let Some(toast) = document
        .create_element("div")
        .ok()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };

    toast.set_class_name(&format!("notification {}", notice.severity.as_str()));
    toast.set_text_content(Some(&notice.message));
    let style = toast.style();
    for (prop, value) in [
        ("position", "fixed"),
        ("top", "20px"),
        ("right", "20px"),
        ("padding", "16px 24px"),
        ("border-radius", "8px"),
        ("color", "white"),
        ("font-weight", "500"),
        ("z-index", "1001"),
        ("transform", "translateX(100%)"),
        ("transition", "transform 0.3s ease"),
        ("background", background(notice.severity)),
    ] {
        let _ = style.set_property(prop, value);
    }
    if body.append_child(&toast).is_err() {
        return;
    }

    let entering = toast.clone();
    Timeout::new(SLIDE_IN_MS, move || {
        let _ = entering.style().set_property("transform", "translateX(0)");
    })
    .forget();

    Timeout::new(VISIBLE_MS, move || {
        let _ = toast.style().set_property("transform", "translateX(100%)");
        Timeout::new(SLIDE_OUT_MS, move || toast.remove()).forget();
    })
    .forget();
}

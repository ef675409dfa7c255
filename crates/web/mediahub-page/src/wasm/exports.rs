//! Functions exported to the page's JavaScript
//!
//! The names match the inline handlers used by the templates, e.g.
//! `onclick="openModal('videoPlayerModal', '/uploads/ep1.mp4')"`.

use std::rc::Rc;

use once_cell::unsync::OnceCell;
use tracing::{debug, error, warn};
use wasm_bindgen::prelude::wasm_bindgen;
use web_sys::Element;

use super::logging::init_logging;
use super::page::BrowserPage;
use super::upload::FetchUploadClient;
use crate::config::PageConfig;
use crate::error::PageResult;
use crate::runtime::PageRuntime;

/// Id of the optional `<script type="application/json">` holding config overrides
pub const CONFIG_ELEMENT_ID: &str = "mediahub-config";

type BrowserRuntime = PageRuntime<BrowserPage, FetchUploadClient>;

thread_local! {
    static RUNTIME: OnceCell<BrowserRuntime> = const { OnceCell::new() };
}

fn build_runtime() -> PageResult<BrowserRuntime> {
    let page = BrowserPage::current()?;

    let (config, config_error) = match page.text_of(CONFIG_ELEMENT_ID) {
        Some(json) => match PageConfig::from_json(&json) {
            Ok(config) => (config, None),
            Err(e) => (PageConfig::default(), Some(e)),
        },
        None => (PageConfig::default(), None),
    };

    init_logging(&config.log_filter);
    if let Some(e) = config_error {
        warn!("Ignoring #{}: {}", CONFIG_ELEMENT_ID, e);
    }

    Ok(PageRuntime::new(
        Rc::new(page),
        Rc::new(FetchUploadClient::new()),
        config,
    ))
}

fn with_runtime<T>(operation: &str, f: impl FnOnce(&BrowserRuntime) -> T) -> Option<T> {
    RUNTIME.with(|cell| match cell.get_or_try_init(build_runtime) {
        Ok(runtime) => Some(f(runtime)),
        Err(e) => {
            web_sys::console::error_1(&format!("{}: page runtime unavailable: {}", operation, e).into());
            None
        }
    })
}

fn report(operation: &str, result: PageResult<()>) {
    if let Err(e) = result {
        error!(operation, "{}", e);
    }
}

fn run_ready(runtime: &BrowserRuntime) {
    if let Err(e) = runtime.on_ready(&mut rand::thread_rng()) {
        error!("Page initialisation failed: {}", e);
    }
}

/// Module entry point: runs the page-ready routine, waiting for
/// `DOMContentLoaded` when the document is still loading.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    with_runtime("start", |runtime| {
        if runtime.page().is_loading() {
            let deferred = runtime.clone();
            report(
                "start",
                runtime
                    .page()
                    .on_dom_content_loaded(move || run_ready(&deferred)),
            );
        } else {
            run_ready(runtime);
        }
    });
}

#[wasm_bindgen(js_name = openModal)]
pub fn open_modal(id: &str, video_source: Option<String>) {
    with_runtime("openModal", |runtime| {
        report("openModal", runtime.open_modal(id, video_source.as_deref()))
    });
}

#[wasm_bindgen(js_name = closeModal)]
pub fn close_modal(id: &str) {
    with_runtime("closeModal", |runtime| {
        report("closeModal", runtime.close_modal(id))
    });
}

#[wasm_bindgen(js_name = togglePassword)]
pub fn toggle_password(button: Element) {
    with_runtime("togglePassword", |runtime| {
        report(
            "togglePassword",
            runtime.toggle_password(&button).map(|_| ()),
        )
    });
}

/// Wire one more drop zone. Returns whether the zone is active.
#[wasm_bindgen(js_name = setupDropZone)]
pub fn setup_drop_zone(zone_id: &str, input_id: &str) -> bool {
    with_runtime("setupDropZone", |runtime| {
        match runtime.setup_drop_zone(zone_id, input_id) {
            Ok(_) => true,
            Err(e) if e.is_markup() => {
                debug!(zone = zone_id, "Drop zone skipped: {}", e);
                false
            }
            Err(e) => {
                error!(zone = zone_id, "Drop zone setup failed: {}", e);
                false
            }
        }
    })
    .unwrap_or(false)
}

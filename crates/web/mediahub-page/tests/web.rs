//! Browser tests for `BrowserPage`, run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]

use mediahub_page::wasm::BrowserPage;
use mediahub_page::{
    ModalState, Page, PageConfig, PasswordMode, close_modal, modal_state, open_modal,
    toggle_password,
};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn mount(page: &BrowserPage, html: &str) -> web_sys::Element {
    let host = page.create_element("div").unwrap();
    host.set_inner_html(html);
    let body = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
        .unwrap();
    body.append_child(&host).unwrap();
    host
}

#[wasm_bindgen_test]
fn test_modal_roundtrip() {
    let page = BrowserPage::current().unwrap();
    let config = PageConfig::default();
    mount(&page, r#"<div id="testModal" class="modal"><div>content</div></div>"#);
    let modal = page.element_by_id("testModal").unwrap();

    open_modal(&page, &config, "testModal", None).unwrap();
    assert_eq!(modal_state(&page, &modal), ModalState::Shown);

    close_modal(&page, &config, "testModal").unwrap();
    assert_eq!(modal_state(&page, &modal), ModalState::Hidden);
}

#[wasm_bindgen_test]
fn test_password_toggle_in_dom() {
    let page = BrowserPage::current().unwrap();
    let config = PageConfig::default();
    let host = mount(
        &page,
        r#"<input id="pw" type="password"><button id="pwToggle"><i class="fa fa-eye"></i></button>"#,
    );
    let button = page.element_by_id("pwToggle").unwrap();

    assert_eq!(
        toggle_password(&page, &config, &button).unwrap(),
        PasswordMode::Plain
    );
    let input = page.element_by_id("pw").unwrap();
    assert_eq!(input.get_attribute("type").as_deref(), Some("text"));

    toggle_password(&page, &config, &button).unwrap();
    assert_eq!(input.get_attribute("type").as_deref(), Some("password"));
    host.remove();
}

#[wasm_bindgen_test]
fn test_styles_and_classes() {
    let page = BrowserPage::current().unwrap();
    let node = page.create_element("div").unwrap();

    page.add_class(&node, "star").unwrap();
    page.set_style(&node, "width", "2px").unwrap();

    assert!(page.has_class(&node, "star"));
    assert_eq!(page.style(&node, "width").as_deref(), Some("2px"));
    assert_eq!(page.style(&node, "height"), None);
}

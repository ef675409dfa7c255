//! `Page` implementation over the browser document

use futures::future::LocalBoxFuture;
use tracing::{error, warn};
use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Document, DragEvent, Element, Event, EventTarget, FileList, HtmlElement,
    HtmlInputElement, HtmlMediaElement, Window,
};

use crate::error::{PageError, PageResult};
use crate::page::{EventHandler, EventKind, FileSelection, Page, PageEvent};

/// Convert a JavaScript exception into a page error
pub(crate) fn js_error(operation: &str, value: JsValue) -> PageError {
    PageError::dom(format!("{} failed: {:?}", operation, value))
}

impl FileSelection for FileList {
    fn file_count(&self) -> usize {
        self.length() as usize
    }
}

/// The live browser document
#[derive(Debug, Clone)]
pub struct BrowserPage {
    window: Window,
    document: Document,
}

impl BrowserPage {
    /// Bind to the current window and document
    pub fn current() -> PageResult<Self> {
        let window = web_sys::window().ok_or_else(|| PageError::dom("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| PageError::dom("window has no document"))?;
        Ok(Self { window, document })
    }

    /// Whether the document is still being parsed
    pub fn is_loading(&self) -> bool {
        self.document.ready_state() == "loading"
    }

    /// Run `callback` once the document has been parsed
    pub fn on_dom_content_loaded<F: FnOnce() + 'static>(&self, callback: F) -> PageResult<()> {
        let callback = Closure::once_into_js(callback);
        self.document
            .add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())
            .map_err(|e| js_error("addEventListener", e))
    }

    /// Text content of an element, used for inline JSON configuration
    pub fn text_of(&self, id: &str) -> Option<String> {
        self.document
            .get_element_by_id(id)
            .and_then(|element| element.text_content())
    }

    fn html(element: &Element) -> PageResult<&HtmlElement> {
        element
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| PageError::dom(format!("<{}> is not an HTML element", element.tag_name())))
    }

    fn media(element: &Element) -> PageResult<&HtmlMediaElement> {
        element
            .dyn_ref::<HtmlMediaElement>()
            .ok_or_else(|| PageError::dom(format!("<{}> is not a media element", element.tag_name())))
    }

    fn attach(
        target: &EventTarget,
        kind: EventKind,
        mut handler: EventHandler<Element, FileList>,
    ) -> PageResult<()> {
        let callback = Closure::wrap(Box::new(move |event: Event| {
            let target = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok());
            let files = match kind {
                EventKind::Drop => event
                    .dyn_ref::<DragEvent>()
                    .and_then(|drag| drag.data_transfer())
                    .and_then(|transfer| transfer.files()),
                _ => None,
            };

            let page_event = PageEvent::new(target, files);
            handler(&page_event);
            if page_event.default_prevented() {
                event.prevent_default();
            }
        }) as Box<dyn FnMut(Event)>);

        target
            .add_event_listener_with_callback(kind.as_str(), callback.as_ref().unchecked_ref())
            .map_err(|e| js_error("addEventListener", e))?;
        // Listeners stay registered for the lifetime of the page
        callback.forget();
        Ok(())
    }
}

impl Page for BrowserPage {
    type Element = Element;
    type Files = FileList;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn create_element(&self, tag: &str) -> PageResult<Element> {
        self.document
            .create_element(tag)
            .map_err(|e| js_error("createElement", e))
    }

    fn append_child(&self, parent: &Element, child: &Element) -> PageResult<()> {
        parent
            .append_child(child)
            .map(|_| ())
            .map_err(|e| js_error("appendChild", e))
    }

    fn element_id(&self, element: &Element) -> String {
        element.id()
    }

    fn has_class(&self, element: &Element, class: &str) -> bool {
        element.class_list().contains(class)
    }

    fn add_class(&self, element: &Element, class: &str) -> PageResult<()> {
        element
            .class_list()
            .add_1(class)
            .map_err(|e| js_error("classList.add", e))
    }

    fn remove_class(&self, element: &Element, class: &str) -> PageResult<()> {
        element
            .class_list()
            .remove_1(class)
            .map_err(|e| js_error("classList.remove", e))
    }

    fn style(&self, element: &Element, property: &str) -> Option<String> {
        element
            .dyn_ref::<HtmlElement>()
            .and_then(|html| html.style().get_property_value(property).ok())
            .filter(|value| !value.is_empty())
    }

    fn set_style(&self, element: &Element, property: &str, value: &str) -> PageResult<()> {
        Self::html(element)?
            .style()
            .set_property(property, value)
            .map_err(|e| js_error("style.setProperty", e))
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn set_attribute(&self, element: &Element, name: &str, value: &str) -> PageResult<()> {
        element
            .set_attribute(name, value)
            .map_err(|e| js_error("setAttribute", e))
    }

    fn previous_element_sibling(&self, element: &Element) -> Option<Element> {
        element.previous_element_sibling()
    }

    fn first_descendant_by_tag(&self, element: &Element, tag: &str) -> Option<Element> {
        element.query_selector(tag).ok().flatten()
    }

    fn set_media_source(&self, media: &Element, source: &str) -> PageResult<()> {
        Self::media(media)?.set_src(source);
        Ok(())
    }

    fn clear_media_source(&self, media: &Element) -> PageResult<()> {
        let media = Self::media(media)?;
        media
            .remove_attribute("src")
            .map_err(|e| js_error("removeAttribute", e))?;
        media.load();
        Ok(())
    }

    fn play_media(&self, media: &Element) -> PageResult<()> {
        let playback: js_sys::Promise = Self::media(media)?
            .play()
            .map_err(|e| js_error("play", e))?;
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(playback).await {
                warn!("Video playback was refused: {:?}", e);
            }
        });
        Ok(())
    }

    fn pause_media(&self, media: &Element) -> PageResult<()> {
        Self::media(media)?
            .pause()
            .map_err(|e| js_error("pause", e))
    }

    fn open_file_dialog(&self, input: &Element) -> PageResult<()> {
        Self::html(input)?.click();
        Ok(())
    }

    fn selected_files(&self, input: &Element) -> Option<FileList> {
        input
            .dyn_ref::<HtmlInputElement>()
            .and_then(|input| input.files())
    }

    fn assign_files(&self, input: &Element, files: &FileList) -> PageResult<()> {
        let input = input
            .dyn_ref::<HtmlInputElement>()
            .ok_or_else(|| PageError::dom("files can only be assigned to an <input>"))?;
        input.set_files(Some(files));
        Ok(())
    }

    fn listen(
        &self,
        element: &Element,
        kind: EventKind,
        handler: EventHandler<Element, FileList>,
    ) -> PageResult<()> {
        Self::attach(element.as_ref(), kind, handler)
    }

    fn listen_window(
        &self,
        kind: EventKind,
        handler: EventHandler<Element, FileList>,
    ) -> PageResult<()> {
        Self::attach(self.window.as_ref(), kind, handler)
    }

    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }

    fn reload(&self) {
        if let Err(e) = self.window.location().reload() {
            error!("Page reload failed: {:?}", e);
        }
    }

    fn alert(&self, message: &str) {
        if let Err(e) = self.window.alert_with_message(message) {
            error!("Alert failed: {:?}", e);
        }
    }
}

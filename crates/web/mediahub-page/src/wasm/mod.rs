//! Browser bindings: the live document, the fetch uploader, console logging
//! and the functions exported to JavaScript

mod exports;
mod logging;
mod page;
mod upload;

pub use exports::{CONFIG_ELEMENT_ID, close_modal, open_modal, setup_drop_zone, start, toggle_password};
pub use logging::{ConsoleMakeWriter, ConsoleWriter, init_logging};
pub use page::BrowserPage;
pub use upload::FetchUploadClient;

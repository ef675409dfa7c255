//! Browser runtime for the mediahub pages
//!
//! This crate drives the small amount of client-side behavior the server
//! rendered pages need:
//!
//! - a decorative, randomly generated star background
//! - modal dialogs, including a video player modal that starts and stops playback
//! - show/hide toggles for password fields
//! - drag-and-drop and click-to-browse upload zones that post files to the
//!   server and reload the page when the upload is accepted
//!
//! Every controller is written against the [`Page`] trait. On `wasm32` the
//! trait is implemented by [`wasm::BrowserPage`] and the crate exports
//! `openModal`, `closeModal`, `togglePassword` and `setupDropZone` to
//! JavaScript. Everywhere else [`MemoryPage`] provides a headless document,
//! and [`native::ReqwestUploadClient`] can stand in for the browser's `fetch`.
//!
//! # Examples
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use mediahub_page::{MemoryPage, Page, PageConfig, PageRuntime};
//! # #[cfg(not(target_arch = "wasm32"))]
//! # fn main() {
//! use mediahub_page::native::ReqwestUploadClient;
//!
//! let page = Rc::new(MemoryPage::new());
//! let modal = page.add("div", "videoPlayerModal");
//! page.add_class(&modal, "modal").unwrap();
//!
//! let runtime = PageRuntime::new(
//!     Rc::clone(&page),
//!     Rc::new(ReqwestUploadClient::new()),
//!     PageConfig::default(),
//! );
//! runtime.on_ready(&mut rand::thread_rng()).unwrap();
//! runtime.open_modal("videoPlayerModal", None).unwrap();
//!
//! assert_eq!(page.style(&modal, "display").as_deref(), Some("flex"));
//! # }
//! # #[cfg(target_arch = "wasm32")]
//! # fn main() {}
//! ```

pub mod background;
pub mod config;
pub mod error;
pub mod memory;
pub mod modal;
pub mod page;
pub mod password;
pub mod runtime;
pub mod upload;

#[cfg(not(target_arch = "wasm32"))]
pub mod native;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use background::{Star, populate_background};
pub use config::{DropZoneBinding, PageConfig};
pub use error::{PageError, PageResult, UploadError, UploadResult};
pub use memory::{MediaState, MemoryPage, NodeId};
pub use modal::{ModalState, close_modal, install_backdrop_dismiss, modal_state, open_modal};
pub use page::{EventHandler, EventKind, FileSelection, Page, PageEvent};
pub use password::{PasswordMode, toggle_password};
pub use runtime::PageRuntime;
pub use upload::{
    DropZone, UploadClient, UploadFile, UploadOutcome, UploadResponse, setup_drop_zone,
    start_upload, submit_files,
};

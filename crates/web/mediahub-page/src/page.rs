//! Host document abstraction
//!
//! The controllers never touch `web-sys` directly. They drive a [`Page`],
//! which is implemented by the browser document on wasm32 and by
//! [`MemoryPage`](crate::memory::MemoryPage) everywhere else.

use std::cell::Cell;
use std::fmt;

use futures::future::LocalBoxFuture;

use crate::error::PageResult;

/// DOM events the runtime listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    DragOver,
    DragLeave,
    Drop,
    Change,
}

impl EventKind {
    /// Name used with `addEventListener`
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::DragOver => "dragover",
            EventKind::DragLeave => "dragleave",
            EventKind::Drop => "drop",
            EventKind::Change => "change",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of user-selected files
pub trait FileSelection {
    /// Number of files in the selection
    fn file_count(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.file_count() == 0
    }
}

/// An event delivered to a listener
///
/// Listeners run synchronously, so a handler that calls
/// [`prevent_default`](Self::prevent_default) is seen by the host before the
/// browser applies its default action.
pub struct PageEvent<E, F> {
    target: Option<E>,
    files: Option<F>,
    default_prevented: Cell<bool>,
}

impl<E, F> PageEvent<E, F> {
    pub fn new(target: Option<E>, files: Option<F>) -> Self {
        Self {
            target,
            files,
            default_prevented: Cell::new(false),
        }
    }

    /// The element the event was dispatched to
    pub fn target(&self) -> Option<&E> {
        self.target.as_ref()
    }

    /// Files carried by a drop event
    pub fn files(&self) -> Option<&F> {
        self.files.as_ref()
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

impl<E: fmt::Debug, F> fmt::Debug for PageEvent<E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageEvent")
            .field("target", &self.target)
            .field("has_files", &self.files.is_some())
            .field("default_prevented", &self.default_prevented.get())
            .finish()
    }
}

/// Listener callback registered on a [`Page`]
pub type EventHandler<E, F> = Box<dyn FnMut(&PageEvent<E, F>)>;

/// The slice of the DOM the runtime needs
pub trait Page {
    /// Handle to an element
    type Element: Clone + fmt::Debug + 'static;

    /// A file list as produced by a file input or a drop
    type Files: FileSelection + Clone + 'static;

    /// Look up an element by id
    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Create a detached element
    fn create_element(&self, tag: &str) -> PageResult<Self::Element>;

    /// Append `child` as the last child of `parent`
    fn append_child(&self, parent: &Self::Element, child: &Self::Element) -> PageResult<()>;

    /// The element's `id`, empty when unset
    fn element_id(&self, element: &Self::Element) -> String;

    fn has_class(&self, element: &Self::Element, class: &str) -> bool;

    fn add_class(&self, element: &Self::Element, class: &str) -> PageResult<()>;

    fn remove_class(&self, element: &Self::Element, class: &str) -> PageResult<()>;

    /// Read an inline style property
    fn style(&self, element: &Self::Element, property: &str) -> Option<String>;

    /// Set an inline style property
    fn set_style(&self, element: &Self::Element, property: &str, value: &str) -> PageResult<()>;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    fn set_attribute(&self, element: &Self::Element, name: &str, value: &str) -> PageResult<()>;

    /// The element sibling immediately before `element`
    fn previous_element_sibling(&self, element: &Self::Element) -> Option<Self::Element>;

    /// First descendant of `element` with the given tag name
    fn first_descendant_by_tag(&self, element: &Self::Element, tag: &str) -> Option<Self::Element>;

    /// Point a media element at `source`
    fn set_media_source(&self, media: &Self::Element, source: &str) -> PageResult<()>;

    /// Drop a media element's source so it stops buffering
    fn clear_media_source(&self, media: &Self::Element) -> PageResult<()>;

    fn play_media(&self, media: &Self::Element) -> PageResult<()>;

    fn pause_media(&self, media: &Self::Element) -> PageResult<()>;

    /// Open the native file picker of a file input
    fn open_file_dialog(&self, input: &Self::Element) -> PageResult<()>;

    /// Files currently held by a file input
    fn selected_files(&self, input: &Self::Element) -> Option<Self::Files>;

    /// Replace the files held by a file input
    fn assign_files(&self, input: &Self::Element, files: &Self::Files) -> PageResult<()>;

    /// Register a listener on an element for the lifetime of the page
    fn listen(
        &self,
        element: &Self::Element,
        kind: EventKind,
        handler: EventHandler<Self::Element, Self::Files>,
    ) -> PageResult<()>;

    /// Register a listener on the window for the lifetime of the page
    fn listen_window(
        &self,
        kind: EventKind,
        handler: EventHandler<Self::Element, Self::Files>,
    ) -> PageResult<()>;

    /// Run a task on the page's event loop
    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>);

    /// Reload the current document
    fn reload(&self);

    /// Show a blocking alert
    fn alert(&self, message: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_names() {
        assert_eq!(EventKind::DragOver.as_str(), "dragover");
        assert_eq!(EventKind::DragLeave.to_string(), "dragleave");
        assert_eq!(EventKind::Change.as_str(), "change");
    }

    #[test]
    fn test_prevent_default() {
        let event: PageEvent<u32, Vec<u8>> = PageEvent::new(Some(7), None);
        assert!(!event.default_prevented());
        event.prevent_default();
        assert!(event.default_prevented());
        assert_eq!(event.target(), Some(&7));
        assert!(event.files().is_none());
    }
}

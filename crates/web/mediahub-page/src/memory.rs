//! In-memory document
//!
//! `MemoryPage` implements [`Page`] without a browser. It keeps a small
//! element tree, dispatches events with bubbling, and records everything the
//! runtime does to the outside world (reloads, alerts, file dialogs, media
//! playback) so headless callers can inspect it. Spawned tasks are queued and
//! only run when [`MemoryPage::run_pending`] is awaited.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::error::{PageError, PageResult};
use crate::page::{EventHandler, EventKind, Page, PageEvent};
use crate::upload::UploadFile;

/// Handle to an element of a [`MemoryPage`]
///
/// An id is only valid for the page that created it. Passing an id from
/// another page to any accessor panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Playback state of a media element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaState {
    pub source: Option<String>,
    pub playing: bool,
}

type MemoryFiles = Vec<UploadFile>;
type SharedHandler = Rc<RefCell<EventHandler<NodeId, MemoryFiles>>>;

#[derive(Default)]
struct MemoryNode {
    tag: String,
    id: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    listeners: Vec<(EventKind, SharedHandler)>,
    files: Option<MemoryFiles>,
    media: MediaState,
    dialog_opens: usize,
}

/// A headless document
pub struct MemoryPage {
    nodes: RefCell<Vec<MemoryNode>>,
    window_listeners: RefCell<Vec<(EventKind, SharedHandler)>>,
    tasks: RefCell<VecDeque<LocalBoxFuture<'static, ()>>>,
    reloads: Cell<usize>,
    alerts: RefCell<Vec<String>>,
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPage {
    /// Create a document holding an empty `<body>`
    pub fn new() -> Self {
        let body = MemoryNode {
            tag: "body".to_string(),
            ..Default::default()
        };

        Self {
            nodes: RefCell::new(vec![body]),
            window_listeners: RefCell::new(Vec::new()),
            tasks: RefCell::new(VecDeque::new()),
            reloads: Cell::new(0),
            alerts: RefCell::new(Vec::new()),
        }
    }

    pub fn body(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a new element with the given id (empty for none) under `parent`
    pub fn insert(&self, parent: NodeId, tag: &str, id: &str) -> NodeId {
        let child = self.new_node(tag);
        {
            let mut nodes = self.nodes.borrow_mut();
            nodes[child.0].id = id.to_string();
            nodes[child.0].parent = Some(parent);
            nodes[parent.0].children.push(child);
        }
        child
    }

    /// Append a new element with the given id under `<body>`
    pub fn add(&self, tag: &str, id: &str) -> NodeId {
        self.insert(self.body(), tag, id)
    }

    fn new_node(&self, tag: &str) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(MemoryNode {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        });
        NodeId(nodes.len() - 1)
    }

    fn is_connected(&self, node: NodeId) -> bool {
        let nodes = self.nodes.borrow();
        let mut current = node;
        loop {
            if current == self.body() {
                return true;
            }
            match nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn tag(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.0].tag.clone()
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.borrow()[node.0].children.clone()
    }

    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.nodes.borrow()[node.0].classes.clone()
    }

    pub fn media(&self, node: NodeId) -> MediaState {
        self.nodes.borrow()[node.0].media.clone()
    }

    /// How many times the file picker of `node` was opened
    pub fn dialog_opens(&self, node: NodeId) -> usize {
        self.nodes.borrow()[node.0].dialog_opens
    }

    pub fn listener_count(&self, node: NodeId) -> usize {
        self.nodes.borrow()[node.0].listeners.len()
    }

    pub fn window_listener_count(&self) -> usize {
        self.window_listeners.borrow().len()
    }

    pub fn reload_count(&self) -> usize {
        self.reloads.get()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Run queued tasks, including ones they spawn, until the queue is empty
    pub async fn run_pending(&self) {
        loop {
            let task = self.tasks.borrow_mut().pop_front();
            match task {
                Some(task) => task.await,
                None => break,
            }
        }
    }

    /// Dispatch an event at `target`, bubbling up to the window.
    ///
    /// Returns whether a listener prevented the default action.
    pub fn dispatch(&self, target: NodeId, kind: EventKind, files: Option<MemoryFiles>) -> bool {
        let event = PageEvent::new(Some(target), files);

        let mut handlers = Vec::new();
        {
            let nodes = self.nodes.borrow();
            let mut current = Some(target);
            while let Some(node) = current {
                handlers.extend(
                    nodes[node.0]
                        .listeners
                        .iter()
                        .filter(|(k, _)| *k == kind)
                        .map(|(_, h)| Rc::clone(h)),
                );
                current = nodes[node.0].parent;
            }
        }
        handlers.extend(
            self.window_listeners
                .borrow()
                .iter()
                .filter(|(k, _)| *k == kind)
                .map(|(_, h)| Rc::clone(h)),
        );

        for handler in handlers {
            let mut handler = handler.borrow_mut();
            (*handler)(&event);
        }

        event.default_prevented()
    }

    pub fn click(&self, target: NodeId) -> bool {
        self.dispatch(target, EventKind::Click, None)
    }

    pub fn drag_over(&self, target: NodeId) -> bool {
        self.dispatch(target, EventKind::DragOver, None)
    }

    pub fn drag_leave(&self, target: NodeId) -> bool {
        self.dispatch(target, EventKind::DragLeave, None)
    }

    /// Drop `files` on `target`
    pub fn drop_files(&self, target: NodeId, files: MemoryFiles) -> bool {
        self.dispatch(target, EventKind::Drop, Some(files))
    }

    /// Simulate picking `files` in the dialog of a file input
    pub fn choose_files(&self, input: NodeId, files: MemoryFiles) -> bool {
        self.nodes.borrow_mut()[input.0].files = Some(files);
        self.dispatch(input, EventKind::Change, None)
    }
}

/// Class tokens follow `DOMTokenList`: non-empty and without whitespace
fn check_class_token(class: &str) -> PageResult<()> {
    if class.is_empty() || class.contains(char::is_whitespace) {
        return Err(PageError::dom(format!("invalid class token {:?}", class)));
    }
    Ok(())
}

impl Page for MemoryPage {
    type Element = NodeId;
    type Files = MemoryFiles;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        let candidates: Vec<NodeId> = self
            .nodes
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, node)| node.id == id)
            .map(|(index, _)| NodeId(index))
            .collect();
        candidates
            .into_iter()
            .find(|node| self.is_connected(*node))
    }

    fn create_element(&self, tag: &str) -> PageResult<NodeId> {
        if tag.is_empty() {
            return Err(PageError::dom("cannot create an element without a tag"));
        }
        Ok(self.new_node(tag))
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> PageResult<()> {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(old_parent) = nodes[child.0].parent {
            nodes[old_parent.0].children.retain(|c| c != child);
        }
        nodes[child.0].parent = Some(*parent);
        nodes[parent.0].children.push(*child);
        Ok(())
    }

    fn element_id(&self, element: &NodeId) -> String {
        self.nodes.borrow()[element.0].id.clone()
    }

    fn has_class(&self, element: &NodeId, class: &str) -> bool {
        self.nodes.borrow()[element.0]
            .classes
            .iter()
            .any(|c| c == class)
    }

    fn add_class(&self, element: &NodeId, class: &str) -> PageResult<()> {
        check_class_token(class)?;
        let mut nodes = self.nodes.borrow_mut();
        let classes = &mut nodes[element.0].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
        Ok(())
    }

    fn remove_class(&self, element: &NodeId, class: &str) -> PageResult<()> {
        check_class_token(class)?;
        self.nodes.borrow_mut()[element.0]
            .classes
            .retain(|c| c != class);
        Ok(())
    }

    fn style(&self, element: &NodeId, property: &str) -> Option<String> {
        self.nodes.borrow()[element.0]
            .styles
            .get(property)
            .cloned()
    }

    fn set_style(&self, element: &NodeId, property: &str, value: &str) -> PageResult<()> {
        self.nodes.borrow_mut()[element.0]
            .styles
            .insert(property.to_string(), value.to_string());
        Ok(())
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        let nodes = self.nodes.borrow();
        let node = &nodes[element.0];
        match name {
            "id" if !node.id.is_empty() => Some(node.id.clone()),
            "id" => None,
            "class" => Some(node.classes.join(" ")),
            _ => node.attributes.get(name).cloned(),
        }
    }

    fn set_attribute(&self, element: &NodeId, name: &str, value: &str) -> PageResult<()> {
        let mut nodes = self.nodes.borrow_mut();
        let node = &mut nodes[element.0];
        match name {
            "id" => node.id = value.to_string(),
            "class" => {
                node.classes = value.split_whitespace().map(str::to_string).collect();
            }
            _ => {
                node.attributes.insert(name.to_string(), value.to_string());
            }
        }
        Ok(())
    }

    fn previous_element_sibling(&self, element: &NodeId) -> Option<NodeId> {
        let nodes = self.nodes.borrow();
        let parent = nodes[element.0].parent?;
        let siblings = &nodes[parent.0].children;
        let index = siblings.iter().position(|c| c == element)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    fn first_descendant_by_tag(&self, element: &NodeId, tag: &str) -> Option<NodeId> {
        let nodes = self.nodes.borrow();
        let tag = tag.to_ascii_lowercase();
        let mut stack: Vec<NodeId> = nodes[element.0].children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            if nodes[node.0].tag == tag {
                return Some(node);
            }
            stack.extend(nodes[node.0].children.iter().rev().copied());
        }
        None
    }

    fn set_media_source(&self, media: &NodeId, source: &str) -> PageResult<()> {
        self.nodes.borrow_mut()[media.0].media.source = Some(source.to_string());
        Ok(())
    }

    fn clear_media_source(&self, media: &NodeId) -> PageResult<()> {
        self.nodes.borrow_mut()[media.0].media.source = None;
        Ok(())
    }

    fn play_media(&self, media: &NodeId) -> PageResult<()> {
        self.nodes.borrow_mut()[media.0].media.playing = true;
        Ok(())
    }

    fn pause_media(&self, media: &NodeId) -> PageResult<()> {
        self.nodes.borrow_mut()[media.0].media.playing = false;
        Ok(())
    }

    fn open_file_dialog(&self, input: &NodeId) -> PageResult<()> {
        self.nodes.borrow_mut()[input.0].dialog_opens += 1;
        Ok(())
    }

    fn selected_files(&self, input: &NodeId) -> Option<MemoryFiles> {
        self.nodes.borrow()[input.0].files.clone()
    }

    fn assign_files(&self, input: &NodeId, files: &MemoryFiles) -> PageResult<()> {
        self.nodes.borrow_mut()[input.0].files = Some(files.clone());
        Ok(())
    }

    fn listen(
        &self,
        element: &NodeId,
        kind: EventKind,
        handler: EventHandler<NodeId, MemoryFiles>,
    ) -> PageResult<()> {
        self.nodes.borrow_mut()[element.0]
            .listeners
            .push((kind, Rc::new(RefCell::new(handler))));
        Ok(())
    }

    fn listen_window(
        &self,
        kind: EventKind,
        handler: EventHandler<NodeId, MemoryFiles>,
    ) -> PageResult<()> {
        self.window_listeners
            .borrow_mut()
            .push((kind, Rc::new(RefCell::new(handler))));
        Ok(())
    }

    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
        self.tasks.borrow_mut().push_back(task);
    }

    fn reload(&self) {
        self.reloads.set(self.reloads.get() + 1);
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_id() {
        let page = MemoryPage::new();
        let modal = page.add("div", "loginModal");

        assert_eq!(page.element_by_id("loginModal"), Some(modal));
        assert_eq!(page.element_by_id("missing"), None);
        assert_eq!(page.element_by_id(""), None);
    }

    #[test]
    fn test_detached_elements_are_not_found() {
        let page = MemoryPage::new();
        let detached = page.create_element("div").unwrap();
        page.set_attribute(&detached, "id", "floating").unwrap();

        assert_eq!(page.element_by_id("floating"), None);

        page.append_child(&page.body(), &detached).unwrap();
        assert_eq!(page.element_by_id("floating"), Some(detached));
    }

    #[test]
    fn test_invalid_class_tokens_are_rejected() {
        let page = MemoryPage::new();
        let node = page.add("div", "zone");

        assert!(page.add_class(&node, "drag over").is_err());
        assert!(page.add_class(&node, "").is_err());
        assert!(page.remove_class(&node, "drag over").is_err());
        assert!(page.classes(node).is_empty());
    }

    #[test]
    #[should_panic]
    fn test_foreign_node_id_panics() {
        let small = MemoryPage::new();
        let large = MemoryPage::new();
        large.add("div", "a");
        let foreign = large.add("div", "b");

        small.tag(foreign);
    }

    #[test]
    fn test_siblings_and_descendants() {
        let page = MemoryPage::new();
        let form = page.add("form", "login");
        let input = page.insert(form, "input", "password");
        let button = page.insert(form, "button", "");
        let span = page.insert(button, "span", "");
        let icon = page.insert(span, "I", "");

        assert_eq!(page.previous_element_sibling(&button), Some(input));
        assert_eq!(page.previous_element_sibling(&input), None);
        assert_eq!(page.first_descendant_by_tag(&button, "i"), Some(icon));
        assert_eq!(page.first_descendant_by_tag(&form, "video"), None);
    }

    #[test]
    fn test_class_attribute_roundtrip() {
        let page = MemoryPage::new();
        let node = page.add("i", "");
        page.set_attribute(&node, "class", "fa fa-eye").unwrap();
        page.add_class(&node, "fa-eye").unwrap();

        assert_eq!(page.classes(node), vec!["fa", "fa-eye"]);
        assert_eq!(page.attribute(&node, "class").as_deref(), Some("fa fa-eye"));

        page.remove_class(&node, "fa-eye").unwrap();
        assert!(!page.has_class(&node, "fa-eye"));
    }

    #[test]
    fn test_events_bubble_to_window() {
        let page = MemoryPage::new();
        let outer = page.add("div", "outer");
        let inner = page.insert(outer, "span", "");
        let seen = Rc::new(RefCell::new(Vec::new()));

        let log = Rc::clone(&seen);
        page.listen(
            &outer,
            EventKind::Click,
            Box::new(move |_| log.borrow_mut().push("outer")),
        )
        .unwrap();
        let log = Rc::clone(&seen);
        page.listen_window(
            EventKind::Click,
            Box::new(move |event| {
                assert_eq!(event.target().copied(), Some(inner));
                log.borrow_mut().push("window");
                event.prevent_default();
            }),
        )
        .unwrap();

        assert!(page.click(inner));
        assert_eq!(*seen.borrow(), vec!["outer", "window"]);
        assert!(!page.drag_over(inner));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test]
    async fn test_tasks_run_on_demand() {
        let page = MemoryPage::new();
        page.spawn_local(Box::pin(async {}));
        assert_eq!(page.pending_tasks(), 1);

        page.run_pending().await;
        assert_eq!(page.pending_tasks(), 0);
    }
}

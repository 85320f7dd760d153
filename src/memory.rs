//! Headless document.
//!
//! [`MemoryDocument`] implements [`Dom`] without a browser. Mutations under a
//! subscribed scope are queued like a `MutationObserver` queue and delivered
//! only when [`MemoryDocument::flush_mutations`] runs, which stands in for the
//! event loop turn that would deliver them in a page.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::{self, LocalBoxFuture};
use umbra_detect::snapshot::{ElementSnapshot, PageSnapshot};
use umbra_detect::{PageError, PageView, Selector, StyleSheet};

use crate::dom::{Dom, MutationFilter, Subscription};
use crate::error::DomError;

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

/// Handle to a node of a [`MemoryDocument`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

type Handler = Rc<RefCell<Box<dyn FnMut()>>>;

#[derive(Default)]
struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    click_handlers: Vec<Handler>,
}

struct Subscriber {
    scope: NodeId,
    active: Rc<Cell<bool>>,
    callback: Handler,
}

#[derive(Default)]
struct Inner {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    hostname: String,
    sheets: Vec<Result<StyleSheet, PageError>>,
    subscribers: Vec<Subscriber>,
    /// Parents that gained children since the last flush.
    pending: Vec<NodeId>,
    delivered: usize,
    /// `DOMContentLoaded` has fired.
    loaded: bool,
    load_waiters: Vec<oneshot::Sender<()>>,
}

impl Inner {
    fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.nodes.get(id.0).ok_or_else(|| DomError::operation("lookup", format!("unknown node {}", id.0)))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.nodes
            .get_mut(id.0)
            .ok_or_else(|| DomError::operation("lookup", format!("unknown node {}", id.0)))
    }

    fn push(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Node { tag: tag.to_ascii_lowercase(), ..Node::default() });
        NodeId(self.nodes.len() - 1)
    }

    /// Attached nodes in document order.
    fn attached(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.nodes.get(id.0) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    fn child_with_tag(&self, parent: Option<NodeId>, tag: &str) -> Option<NodeId> {
        let parent = self.nodes.get(parent?.0)?;
        parent
            .children
            .iter()
            .copied()
            .find(|child| self.nodes.get(child.0).is_some_and(|n| n.tag == tag))
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.nodes.get(node.0).and_then(|n| n.parent) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }
}

/// In-memory document. Clones share the same tree.
#[derive(Clone, Default)]
pub struct MemoryDocument {
    inner: Rc<RefCell<Inner>>,
}

impl MemoryDocument {
    /// `<html>` with an empty `<head>` and `<body>`.
    #[must_use]
    pub fn new(hostname: &str) -> Self {
        let doc = Self::without_body(hostname);
        doc.ensure_body();
        doc.finish_loading();
        doc
    }

    /// `<html>` with only a `<head>`, as seen before the parser reaches `<body>`.
    #[must_use]
    pub fn without_body(hostname: &str) -> Self {
        let doc = Self::default();
        {
            let mut inner = doc.inner.borrow_mut();
            inner.hostname = hostname.to_owned();
            let root = inner.push("html");
            let head = inner.push("head");
            inner.root = Some(root);
            inner.nodes[head.0].parent = Some(root);
            inner.nodes[root.0].children.push(head);
        }
        doc
    }

    /// Build a document from a captured snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: PageSnapshot) -> Self {
        let doc = Self::default();
        {
            let mut inner = doc.inner.borrow_mut();
            inner.hostname = snapshot.hostname;
            inner.sheets = snapshot
                .stylesheets
                .into_iter()
                .map(|sheet| {
                    if sheet.cross_origin {
                        Err(PageError::CrossOrigin { href: sheet.href.unwrap_or_default() })
                    } else {
                        Ok(StyleSheet { href: sheet.href, media_conditions: sheet.media })
                    }
                })
                .collect();
            if let Some(root) = snapshot.root {
                let id = build(&mut inner, root, None);
                inner.root = Some(id);
            }
            inner.loaded = true;
        }
        doc
    }

    /// Append a `<body>` to `<html>` if there is none.
    pub fn ensure_body(&self) -> Option<NodeId> {
        let mut inner = self.inner.borrow_mut();
        if let Some(body) = inner.child_with_tag(inner.root, "body") {
            return Some(body);
        }
        let root = inner.root?;
        let body = inner.push("body");
        inner.nodes[body.0].parent = Some(root);
        inner.nodes[root.0].children.push(body);
        Some(body)
    }

    /// Fire `DOMContentLoaded`, waking every [`Dom::content_loaded`] waiter.
    /// Does not add a `<body>`.
    pub fn finish_loading(&self) {
        let waiters = {
            let mut inner = self.inner.borrow_mut();
            inner.loaded = true;
            std::mem::take(&mut inner.load_waiters)
        };
        for waiter in waiters {
            if waiter.send(()).is_err() {
                log::debug!("load waiter dropped before DOMContentLoaded");
            }
        }
    }

    /// Add a stylesheet as seen by the page.
    pub fn push_stylesheet(&self, sheet: Result<StyleSheet, PageError>) {
        self.inner.borrow_mut().sheets.push(sheet);
    }

    /// Create `tag` and append it to `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Operation`] if `parent` does not exist.
    pub fn append_new(&self, parent: &NodeId, tag: &str) -> Result<NodeId, DomError> {
        let child = self.create_element(tag)?;
        self.append_child(parent, &child)?;
        Ok(child)
    }

    /// Deliver queued mutations to live subscribers, one callback per
    /// subscriber per batch. Returns the number of callbacks run.
    pub fn flush_mutations(&self) -> usize {
        let callbacks: Vec<Handler> = {
            let mut inner = self.inner.borrow_mut();
            let pending = std::mem::take(&mut inner.pending);
            if pending.is_empty() {
                return 0;
            }
            inner.subscribers.retain(|s| s.active.get());
            inner
                .subscribers
                .iter()
                .filter(|s| pending.iter().any(|target| inner.is_inclusive_ancestor(s.scope, *target)))
                .map(|s| Rc::clone(&s.callback))
                .collect()
        };
        for callback in &callbacks {
            (callback.borrow_mut())();
        }
        self.inner.borrow_mut().delivered += callbacks.len();
        callbacks.len()
    }

    /// Subscriptions that have not been cancelled.
    #[must_use]
    pub fn live_subscriptions(&self) -> usize {
        self.inner.borrow().subscribers.iter().filter(|s| s.active.get()).count()
    }

    /// Total callbacks delivered so far.
    #[must_use]
    pub fn delivered_batches(&self) -> usize {
        self.inner.borrow().delivered
    }

    /// Fire click handlers of `element`.
    pub fn click(&self, element: &NodeId) {
        let handlers: Vec<Handler> = match self.inner.borrow().node(*element) {
            Ok(node) => node.click_handlers.clone(),
            Err(_) => return,
        };
        for handler in &handlers {
            (handler.borrow_mut())();
        }
    }

    #[must_use]
    pub fn text(&self, element: &NodeId) -> String {
        self.inner.borrow().node(*element).map(|n| n.text.clone()).unwrap_or_default()
    }

    /// Attached elements carrying `id`.
    #[must_use]
    pub fn count_with_id(&self, id: &str) -> usize {
        let inner = self.inner.borrow();
        inner
            .attached()
            .into_iter()
            .filter(|node| inner.nodes[node.0].attributes.get("id").is_some_and(|v| v == id))
            .count()
    }
}

fn build(inner: &mut Inner, element: ElementSnapshot, parent: Option<NodeId>) -> NodeId {
    let id = inner.push(&element.tag);
    {
        let node = &mut inner.nodes[id.0];
        node.attributes = element.attributes;
        node.styles = element.styles;
        node.parent = parent;
    }
    for child in element.children {
        let child_id = build(inner, child, Some(id));
        inner.nodes[id.0].children.push(child_id);
    }
    id
}

impl PageView for MemoryDocument {
    type Element = NodeId;

    fn root(&self) -> Option<NodeId> {
        self.inner.borrow().root
    }

    fn body(&self) -> Option<NodeId> {
        let inner = self.inner.borrow();
        inner.child_with_tag(inner.root, "body")
    }

    fn tag_name(&self, element: &NodeId) -> String {
        self.inner.borrow().node(*element).map(|n| n.tag.clone()).unwrap_or_default()
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.inner.borrow().node(*element).map(|n| n.attributes.get(name).cloned()).unwrap_or_default()
    }

    fn computed_style(&self, element: &NodeId, property: &str) -> Result<String, PageError> {
        let inner = self.inner.borrow();
        let node = inner.node(*element).map_err(|e| PageError::Unavailable(e.to_string()))?;
        Ok(node.styles.get(property).cloned().unwrap_or_default())
    }

    fn query_all(&self, selector: &Selector) -> Result<Vec<NodeId>, PageError> {
        let attached = self.inner.borrow().attached();
        Ok(attached.into_iter().filter(|id| selector.matches(self, id)).collect())
    }

    fn stylesheets(&self) -> Vec<Result<StyleSheet, PageError>> {
        self.inner.borrow().sheets.clone()
    }

    fn hostname(&self) -> String {
        self.inner.borrow().hostname.clone()
    }
}

/// Subscription handle of a [`MemoryDocument`].
#[derive(Debug)]
pub struct MemorySubscription {
    active: Rc<Cell<bool>>,
}

impl Subscription for MemorySubscription {
    fn cancel(&mut self) {
        self.active.set(false);
    }
}

impl Drop for MemorySubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl Dom for MemoryDocument {
    type Subscription = MemorySubscription;

    fn head(&self) -> Option<NodeId> {
        let inner = self.inner.borrow();
        inner.child_with_tag(inner.root, "head")
    }

    fn content_loaded(&self) -> LocalBoxFuture<'static, ()> {
        let mut inner = self.inner.borrow_mut();
        if inner.loaded {
            return Box::pin(future::ready(()));
        }
        let (sender, receiver) = oneshot::channel();
        inner.load_waiters.push(sender);
        Box::pin(async move {
            if receiver.await.is_err() {
                log::debug!("document dropped before DOMContentLoaded");
            }
        })
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let inner = self.inner.borrow();
        inner
            .attached()
            .into_iter()
            .find(|node| inner.nodes[node.0].attributes.get("id").is_some_and(|v| v == id))
    }

    fn create_element(&self, tag: &str) -> Result<NodeId, DomError> {
        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(DomError::operation("createElement", format!("invalid tag `{tag}`")));
        }
        Ok(self.inner.borrow_mut().push(tag))
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        let mut inner = self.inner.borrow_mut();
        inner.node(*child)?;
        if inner.is_inclusive_ancestor(*child, *parent) {
            return Err(DomError::operation("appendChild", "child is an ancestor of parent"));
        }
        if let Some(old_parent) = inner.node(*child)?.parent {
            inner.node_mut(old_parent)?.children.retain(|c| c != child);
        }
        inner.node_mut(*parent)?.children.push(*child);
        inner.node_mut(*child)?.parent = Some(*parent);
        inner.pending.push(*parent);
        Ok(())
    }

    fn set_attribute(&self, element: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.inner
            .borrow_mut()
            .node_mut(*element)?
            .attributes
            .insert(name.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_attribute(&self, element: &NodeId, name: &str) -> Result<(), DomError> {
        self.inner.borrow_mut().node_mut(*element)?.attributes.remove(name);
        Ok(())
    }

    fn add_class(&self, element: &NodeId, class: &str) -> Result<(), DomError> {
        if class.is_empty() || class.contains(char::is_whitespace) {
            return Err(DomError::operation("classList.add", format!("invalid token `{class}`")));
        }
        let mut inner = self.inner.borrow_mut();
        let node = inner.node_mut(*element)?;
        let mut tokens: Vec<String> = node
            .attributes
            .get("class")
            .map(|raw| raw.split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default();
        if !tokens.iter().any(|t| t == class) {
            tokens.push(class.to_owned());
        }
        node.attributes.insert("class".to_owned(), tokens.join(" "));
        Ok(())
    }

    fn set_style(&self, element: &NodeId, property: &str, value: &str) -> Result<(), DomError> {
        self.inner
            .borrow_mut()
            .node_mut(*element)?
            .styles
            .insert(property.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_style(&self, element: &NodeId, property: &str) -> Result<(), DomError> {
        self.inner.borrow_mut().node_mut(*element)?.styles.remove(property);
        Ok(())
    }

    fn inline_style(&self, element: &NodeId, property: &str) -> Option<String> {
        self.inner.borrow().node(*element).map(|n| n.styles.get(property).cloned()).unwrap_or_default()
    }

    fn set_text(&self, element: &NodeId, text: &str) -> Result<(), DomError> {
        text.clone_into(&mut self.inner.borrow_mut().node_mut(*element)?.text);
        Ok(())
    }

    fn on_click(&self, element: &NodeId, handler: Box<dyn FnMut()>) -> Result<(), DomError> {
        self.inner
            .borrow_mut()
            .node_mut(*element)?
            .click_handlers
            .push(Rc::new(RefCell::new(handler)));
        Ok(())
    }

    fn subscribe(
        &self,
        scope: &NodeId,
        filter: MutationFilter,
        callback: Box<dyn FnMut()>,
    ) -> Result<MemorySubscription, DomError> {
        let MutationFilter::AddedDescendants = filter;
        let mut inner = self.inner.borrow_mut();
        inner.node(*scope)?;
        let active = Rc::new(Cell::new(true));
        inner.subscribers.push(Subscriber {
            scope: *scope,
            active: Rc::clone(&active),
            callback: Rc::new(RefCell::new(callback)),
        });
        Ok(MemorySubscription { active })
    }
}

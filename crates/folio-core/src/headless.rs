#![forbid(unsafe_code)]

//! In-memory document implementing [`Dom`].
//!
//! Enough of a DOM to run every page behavior without a browser: a tree of
//! elements with tags, ids, classes, attributes, a display flag, text, and
//! hand-set layout numbers. Tests build a page, drive the controller, and then
//! inspect the resulting element state.
//!
//! Node 0 is `<html>`, node 1 is `<head>`, node 2 is `<body>`.

use std::collections::BTreeMap;

use crate::dom::{BoxMetrics, Dom, ScrollBehavior, Selector, Viewport};
use crate::error::Result;

/// Handle into a [`HeadlessDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Element description used to build a headless page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlessElement {
    tag: String,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    hidden: bool,
    text: String,
    metrics: BoxMetrics,
}

impl HeadlessElement {
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        if !self.classes.iter().any(|c| c == class) {
            self.classes.push(class.to_owned());
        }
        self
    }

    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_owned(), value.to_owned());
        self
    }

    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_owned();
        self
    }

    #[must_use]
    pub fn metrics(mut self, metrics: BoxMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Document-space layout (`offsetTop`/`clientHeight`).
    #[must_use]
    pub fn offset(mut self, top: f64, height: f64) -> Self {
        self.metrics.offset_top = top;
        self.metrics.client_height = height;
        self
    }

    /// Viewport-space layout (`getBoundingClientRect`).
    #[must_use]
    pub fn rect(mut self, top: f64, height: f64) -> Self {
        self.metrics.rect_top = top;
        self.metrics.rect_height = height;
        self
    }
}

#[derive(Debug, Clone)]
struct Node {
    element: HeadlessElement,
    parent: Option<NodeId>,
}

/// In-memory document.
#[derive(Debug, Clone)]
pub struct HeadlessDom {
    nodes: Vec<Node>,
    viewport: Viewport,
    styles: Vec<String>,
    scrolls: Vec<(NodeId, ScrollBehavior)>,
}

impl Default for HeadlessDom {
    fn default() -> Self {
        Self::new(Viewport {
            scroll_y: 0.0,
            inner_height: 800.0,
        })
    }
}

impl HeadlessDom {
    pub const HTML: NodeId = NodeId(0);
    pub const HEAD: NodeId = NodeId(1);
    pub const BODY: NodeId = NodeId(2);

    /// Empty document: `<html><head></head><body></body></html>`.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            viewport,
            styles: Vec::new(),
            scrolls: Vec::new(),
        };
        dom.push(HeadlessElement::new("html"), None);
        dom.push(HeadlessElement::new("head"), Some(Self::HTML));
        dom.push(HeadlessElement::new("body"), Some(Self::HTML));
        dom
    }

    fn push(&mut self, element: HeadlessElement, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { element, parent });
        id
    }

    /// Append an element under `parent`. Nodes are kept in creation order,
    /// which is the document order as long as children are appended after
    /// their parents and siblings in order.
    pub fn append(&mut self, parent: NodeId, element: HeadlessElement) -> NodeId {
        self.push(element, Some(parent))
    }

    /// Append under `<body>`.
    pub fn append_to_body(&mut self, element: HeadlessElement) -> NodeId {
        self.append(Self::BODY, element)
    }

    pub fn set_scroll_y(&mut self, scroll_y: f64) {
        self.viewport.scroll_y = scroll_y;
    }

    pub fn set_inner_height(&mut self, inner_height: f64) {
        self.viewport.inner_height = inner_height;
    }

    /// Move an element in viewport space.
    pub fn set_rect(&mut self, node: NodeId, top: f64, height: f64) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.element.metrics.rect_top = top;
            n.element.metrics.rect_height = height;
        }
    }

    #[must_use]
    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.nodes
            .get(node.0)
            .map(|n| n.element.classes.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_hidden(&self, node: NodeId) -> bool {
        self.nodes.get(node.0).is_some_and(|n| n.element.hidden)
    }

    #[must_use]
    pub fn text_of(&self, node: NodeId) -> &str {
        self.nodes
            .get(node.0)
            .map_or("", |n| n.element.text.as_str())
    }

    /// Injected `<style>` blocks, oldest first.
    #[must_use]
    pub fn styles(&self) -> &[String] {
        &self.styles
    }

    /// Every `scroll_into_view` call, oldest first.
    #[must_use]
    pub fn scrolls(&self) -> &[(NodeId, ScrollBehavior)] {
        &self.scrolls
    }

    fn element(&self, node: &NodeId) -> Option<&HeadlessElement> {
        self.nodes.get(node.0).map(|n| &n.element)
    }

    fn element_mut(&mut self, node: &NodeId) -> Option<&mut HeadlessElement> {
        self.nodes.get_mut(node.0).map(|n| &mut n.element)
    }

    fn has_ancestor_class(&self, node: NodeId, class: &str) -> bool {
        let mut cursor = self.nodes.get(node.0).and_then(|n| n.parent);
        while let Some(id) = cursor {
            let Some(n) = self.nodes.get(id.0) else {
                return false;
            };
            if n.element.classes.iter().any(|c| c == class) {
                return true;
            }
            cursor = n.parent;
        }
        false
    }

    fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        let Some(el) = self.element(&id) else {
            return false;
        };
        let has = |class: &str| el.classes.iter().any(|c| c == class);
        match selector {
            Selector::Id(want) => el.attrs.get("id").is_some_and(|v| v == want),
            Selector::Class(class) => has(class.as_str()),
            Selector::Tag(tag) => el.tag.eq_ignore_ascii_case(tag),
            Selector::AnyClass(classes) => classes.iter().any(|c| has(c.as_str())),
            Selector::Descendant {
                ancestor_class,
                tag,
            } => el.tag.eq_ignore_ascii_case(tag) && self.has_ancestor_class(id, ancestor_class),
            Selector::HashAnchors => {
                el.tag == "a" && el.attrs.get("href").is_some_and(|h| h.starts_with('#'))
            }
        }
    }
}

impl Dom for HeadlessDom {
    type Node = NodeId;

    fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        (0..self.nodes.len())
            .map(NodeId)
            .filter(|id| self.matches(*id, selector))
            .collect()
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.query(&Selector::id(id))
    }

    fn root(&self) -> Option<NodeId> {
        Some(Self::HTML)
    }

    fn body(&self) -> Option<NodeId> {
        Some(Self::BODY)
    }

    fn attr(&self, node: &NodeId, name: &str) -> Option<String> {
        self.element(node).and_then(|el| el.attrs.get(name).cloned())
    }

    fn set_attr(&mut self, node: &NodeId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(node) {
            el.attrs.insert(name.to_owned(), value.to_owned());
        }
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|el| el.classes.iter().any(|c| c == class))
    }

    fn set_class(&mut self, node: &NodeId, class: &str, on: bool) {
        let Some(el) = self.element_mut(node) else {
            return;
        };
        let present = el.classes.iter().any(|c| c == class);
        if on && !present {
            el.classes.push(class.to_owned());
        } else if !on && present {
            el.classes.retain(|c| c != class);
        }
    }

    fn set_visible(&mut self, node: &NodeId, visible: bool) {
        if let Some(el) = self.element_mut(node) {
            el.hidden = !visible;
        }
    }

    fn set_text(&mut self, node: &NodeId, text: &str) {
        if let Some(el) = self.element_mut(node) {
            el.text = text.to_owned();
        }
    }

    fn metrics(&self, node: &NodeId) -> BoxMetrics {
        self.element(node).map(|el| el.metrics).unwrap_or_default()
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn scroll_into_view(&mut self, node: &NodeId, behavior: ScrollBehavior) {
        self.scrolls.push((*node, behavior));
    }

    fn inject_style(&mut self, css: &str) -> Result<()> {
        self.styles.push(css.to_owned());
        Ok(())
    }
}

#![forbid(unsafe_code)]

//! Document abstraction used by every page behavior.
//!
//! The [`Dom`] trait is the only seam between the interaction logic and a
//! real browser. `folio-web` implements it over `web_sys::Element`;
//! [`crate::headless::HeadlessDom`] implements it in memory.
//!
//! Element lookups are expressed as a [`Selector`] rather than a raw CSS
//! string so an in-memory document can match them without a CSS engine.

use serde::{Deserialize, Serialize};

use crate::error::Result;

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

/// The handful of element queries the page needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Selector {
    /// `#id`
    Id(String),
    /// `.class`
    Class(String),
    /// `tag`
    Tag(String),
    /// `.a, .b, ...` (union, document order)
    AnyClass(Vec<String>),
    /// `.ancestor tag`
    Descendant { ancestor_class: String, tag: String },
    /// `a[href^="#"]`
    HashAnchors,
}

impl Selector {
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    pub fn class(class: impl Into<String>) -> Self {
        Self::Class(class.into())
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag(tag.into())
    }

    /// Render as a CSS selector for `querySelectorAll`.
    #[must_use]
    pub fn to_css(&self) -> String {
        match self {
            Self::Id(id) => format!("#{id}"),
            Self::Class(class) => format!(".{class}"),
            Self::Tag(tag) => tag.clone(),
            Self::AnyClass(classes) => classes
                .iter()
                .map(|c| format!(".{c}"))
                .collect::<Vec<_>>()
                .join(", "),
            Self::Descendant {
                ancestor_class,
                tag,
            } => format!(".{ancestor_class} {tag}"),
            Self::HashAnchors => r##"a[href^="#"]"##.to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Layout numbers read from one element, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxMetrics {
    /// `offsetTop`: distance from the offset parent's top (document space
    /// for top-level sections).
    pub offset_top: f64,
    /// `clientHeight`.
    pub client_height: f64,
    /// `getBoundingClientRect().top`: viewport space.
    pub rect_top: f64,
    /// `getBoundingClientRect().height`.
    pub rect_height: f64,
}

impl BoxMetrics {
    /// Vertical center in viewport space.
    #[must_use]
    pub fn rect_center(&self) -> f64 {
        self.rect_top + self.rect_height / 2.0
    }
}

/// Window scroll position and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// `window.scrollY`.
    pub scroll_y: f64,
    /// `window.innerHeight`.
    pub inner_height: f64,
}

/// How `scroll_into_view` should move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
}

// ---------------------------------------------------------------------------
// Dom
// ---------------------------------------------------------------------------

/// Minimal document surface the page behaviors read and write.
///
/// Writes are infallible from the caller's point of view: an implementation
/// that hits a host error logs and carries on, matching the page's
/// "feature does nothing this time" failure mode.
pub trait Dom {
    /// Element handle. Equality is element identity.
    type Node: Clone + PartialEq + core::fmt::Debug;

    /// All matches, in document order.
    fn query_all(&self, selector: &Selector) -> Vec<Self::Node>;

    /// First match.
    fn query(&self, selector: &Selector) -> Option<Self::Node> {
        self.query_all(selector).into_iter().next()
    }

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// The `<html>` element.
    fn root(&self) -> Option<Self::Node>;

    /// The `<body>` element.
    fn body(&self) -> Option<Self::Node>;

    fn attr(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_attr(&mut self, node: &Self::Node, name: &str, value: &str);

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// Add (`on`) or remove a class.
    fn set_class(&mut self, node: &Self::Node, class: &str, on: bool);

    /// `style.display = ""` when visible, `"none"` when hidden.
    fn set_visible(&mut self, node: &Self::Node, visible: bool);

    fn set_text(&mut self, node: &Self::Node, text: &str);

    fn metrics(&self, node: &Self::Node) -> BoxMetrics;

    fn viewport(&self) -> Viewport;

    fn scroll_into_view(&mut self, node: &Self::Node, behavior: ScrollBehavior);

    /// Append a `<style>` block to `<head>`.
    fn inject_style(&mut self, css: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_rendering() {
        assert_eq!(Selector::id("lang-toggle").to_css(), "#lang-toggle");
        assert_eq!(Selector::class("hamburger").to_css(), ".hamburger");
        assert_eq!(Selector::tag("section").to_css(), "section");
        assert_eq!(
            Selector::AnyClass(vec!["section".into(), "project-card".into()]).to_css(),
            ".section, .project-card"
        );
        assert_eq!(
            Selector::Descendant {
                ancestor_class: "nav-links".into(),
                tag: "a".into()
            }
            .to_css(),
            ".nav-links a"
        );
        assert_eq!(Selector::HashAnchors.to_css(), "a[href^=\"#\"]");
    }

    #[test]
    fn selector_serde_shape() {
        let sel: Selector = serde_json::from_str(r#"{"kind":"class","value":"x"}"#).unwrap();
        assert_eq!(sel, Selector::class("x"));
        let sel: Selector = serde_json::from_str(r#"{"kind":"hash_anchors"}"#).unwrap();
        assert_eq!(sel, Selector::HashAnchors);
    }

    #[test]
    fn rect_center() {
        let m = BoxMetrics {
            rect_top: 100.0,
            rect_height: 50.0,
            ..BoxMetrics::default()
        };
        assert_eq!(m.rect_center(), 125.0);
    }
}

#![forbid(unsafe_code)]

//! View-state projection.
//!
//! Each `project_*` function is a pure map from page state to a [`Patch`]:
//! an ordered list of [`DomOp`]s. Applying a patch is idempotent, so handlers
//! can re-project full state on every event instead of tracking deltas.
//!
//! # Invariants
//!
//! 1. **Order matters**: ops apply in sequence; "clear all, then set one"
//!    patches rely on it.
//! 2. **Absent targets are no-ops**: a target that matches nothing leaves the
//!    document untouched.
//! 3. **Conditional copies**: [`DomOp::CopyAttr`] only writes when the source
//!    attribute exists and is non-empty.

use crate::config::PageConfig;
use crate::dom::{Dom, Selector};
use crate::lang::Lang;

/// Elements an op applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// `<html>`
    Root,
    /// `<body>`
    Body,
    /// Every match of the selector.
    All(Selector),
    /// The `n`th match of the selector.
    Nth(Selector, usize),
}

/// A single idempotent document edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomOp {
    SetAttr {
        target: Target,
        name: String,
        value: String,
    },
    SetClass {
        target: Target,
        class: String,
        on: bool,
    },
    SetVisible {
        target: Target,
        visible: bool,
    },
    SetText {
        target: Target,
        text: String,
    },
    /// Copy attribute `from` into `to` on each target that has a non-empty
    /// `from`.
    CopyAttr {
        target: Target,
        from: String,
        to: String,
    },
}

/// Ordered list of edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patch {
    ops: Vec<DomOp>,
}

impl Patch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: DomOp) {
        self.ops.push(op);
    }

    /// Append all ops of `other`.
    pub fn extend(&mut self, other: Patch) {
        self.ops.extend(other.ops);
    }

    #[must_use]
    pub fn ops(&self) -> &[DomOp] {
        &self.ops
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Apply every op in order.
    pub fn apply<D: Dom + ?Sized>(&self, dom: &mut D) {
        for op in &self.ops {
            apply_op(dom, op);
        }
    }
}

fn resolve<D: Dom + ?Sized>(dom: &D, target: &Target) -> Vec<D::Node> {
    match target {
        Target::Root => dom.root().into_iter().collect(),
        Target::Body => dom.body().into_iter().collect(),
        Target::All(selector) => dom.query_all(selector),
        Target::Nth(selector, n) => dom
            .query_all(selector)
            .into_iter()
            .nth(*n)
            .into_iter()
            .collect(),
    }
}

fn apply_op<D: Dom + ?Sized>(dom: &mut D, op: &DomOp) {
    match op {
        DomOp::SetAttr {
            target,
            name,
            value,
        } => {
            for node in resolve(dom, target) {
                dom.set_attr(&node, name, value);
            }
        }
        DomOp::SetClass { target, class, on } => {
            for node in resolve(dom, target) {
                dom.set_class(&node, class, *on);
            }
        }
        DomOp::SetVisible { target, visible } => {
            for node in resolve(dom, target) {
                dom.set_visible(&node, *visible);
            }
        }
        DomOp::SetText { target, text } => {
            for node in resolve(dom, target) {
                dom.set_text(&node, text);
            }
        }
        DomOp::CopyAttr { target, from, to } => {
            for node in resolve(dom, target) {
                if let Some(value) = dom.attr(&node, from).filter(|v| !v.is_empty()) {
                    dom.set_attr(&node, to, &value);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Projectors
// ---------------------------------------------------------------------------

/// Direction, `lang` attribute, body class, toggle label, tagged element
/// visibility, and glitch text for `lang`.
#[must_use]
pub fn project_language(config: &PageConfig, lang: Lang) -> Patch {
    let classes = &config.classes;
    let mut patch = Patch::new();
    patch.push(DomOp::SetAttr {
        target: Target::Root,
        name: "dir".into(),
        value: lang.direction().as_attr().into(),
    });
    patch.push(DomOp::SetAttr {
        target: Target::Root,
        name: "lang".into(),
        value: lang.tag().into(),
    });
    patch.push(DomOp::SetClass {
        target: Target::Body,
        class: classes.rtl_mode.clone(),
        on: lang.is_rtl(),
    });
    patch.push(DomOp::SetText {
        target: Target::All(config.selectors.lang_toggle.clone()),
        text: lang.toggle_label().into(),
    });
    for tagged in Lang::ALL {
        patch.push(DomOp::SetVisible {
            target: Target::All(Selector::Class(classes.lang_class(tagged))),
            visible: tagged == lang,
        });
    }
    patch.push(DomOp::CopyAttr {
        target: Target::All(config.selectors.glitch_text.clone()),
        from: classes.glitch_alt_attr(lang),
        to: classes.glitch_attr.clone(),
    });
    patch
}

/// Clear every nav link, then activate the ones matching `current`.
/// `hrefs[i]` is the `href` of the `i`th nav link.
#[must_use]
pub fn project_nav(
    config: &PageConfig,
    hrefs: &[Option<String>],
    current: Option<&str>,
) -> Patch {
    let selector = &config.selectors.nav_links;
    let active = &config.classes.active;
    let mut patch = Patch::new();
    patch.push(DomOp::SetClass {
        target: Target::All(selector.clone()),
        class: active.clone(),
        on: false,
    });
    for (idx, href) in hrefs.iter().enumerate() {
        if crate::nav::link_matches(href.as_deref(), current) {
            patch.push(DomOp::SetClass {
                target: Target::Nth(selector.clone(), idx),
                class: active.clone(),
                on: true,
            });
        }
    }
    patch
}

/// Clear focus from every timeline item, then focus `focused`.
#[must_use]
pub fn project_timeline(config: &PageConfig, focused: Option<usize>) -> Patch {
    let selector = &config.selectors.timeline_items;
    let focus = &config.classes.focus;
    let mut patch = Patch::new();
    patch.push(DomOp::SetClass {
        target: Target::All(selector.clone()),
        class: focus.clone(),
        on: false,
    });
    if let Some(idx) = focused {
        patch.push(DomOp::SetClass {
            target: Target::Nth(selector.clone(), idx),
            class: focus.clone(),
            on: true,
        });
    }
    patch
}

/// Panel and hamburger classes for the menu state.
#[must_use]
pub fn project_menu(config: &PageConfig, open: bool) -> Patch {
    let mut patch = Patch::new();
    patch.push(DomOp::SetClass {
        target: Target::All(config.selectors.nav_panel.clone()),
        class: config.classes.active.clone(),
        on: open,
    });
    patch.push(DomOp::SetClass {
        target: Target::All(config.selectors.hamburger.clone()),
        class: config.classes.menu_toggle.clone(),
        on: open,
    });
    patch
}

/// Mark every reveal candidate as pending.
#[must_use]
pub fn project_reveal_pending(config: &PageConfig) -> Patch {
    let mut patch = Patch::new();
    patch.push(DomOp::SetClass {
        target: Target::All(config.selectors.reveal.clone()),
        class: config.classes.reveal.clone(),
        on: true,
    });
    patch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessDom, HeadlessElement};
    use pretty_assertions::assert_eq;

    #[test]
    fn language_patch_for_hebrew() {
        let cfg = PageConfig::default();
        let patch = project_language(&cfg, Lang::He);
        assert_eq!(
            patch.ops()[..4].to_vec(),
            vec![
                DomOp::SetAttr {
                    target: Target::Root,
                    name: "dir".into(),
                    value: "rtl".into()
                },
                DomOp::SetAttr {
                    target: Target::Root,
                    name: "lang".into(),
                    value: "he".into()
                },
                DomOp::SetClass {
                    target: Target::Body,
                    class: "rtl-mode".into(),
                    on: true
                },
                DomOp::SetText {
                    target: Target::All(Selector::id("lang-toggle")),
                    text: "EN".into()
                },
            ]
        );
        assert!(patch.ops().contains(&DomOp::SetVisible {
            target: Target::All(Selector::class("lang-en")),
            visible: false
        }));
        assert!(patch.ops().contains(&DomOp::SetVisible {
            target: Target::All(Selector::class("lang-he")),
            visible: true
        }));
    }

    #[test]
    fn nav_patch_clears_before_setting() {
        let cfg = PageConfig::default();
        let hrefs = vec![Some("#hero".into()), None, Some("#about".into())];
        let patch = project_nav(&cfg, &hrefs, Some("about"));
        assert_eq!(patch.len(), 2);
        assert_eq!(
            patch.ops()[1],
            DomOp::SetClass {
                target: Target::Nth(cfg.selectors.nav_links.clone(), 2),
                class: "active".into(),
                on: true
            }
        );
        assert_eq!(project_nav(&cfg, &hrefs, None).len(), 1);
    }

    #[test]
    fn copy_attr_skips_missing_or_empty_source() {
        let mut dom = HeadlessDom::default();
        let a = dom.append_to_body(
            HeadlessElement::new("h1")
                .class("glitch-text")
                .attr("data-text", "old")
                .attr("data-text-en", "Hello"),
        );
        let b = dom.append_to_body(
            HeadlessElement::new("h1")
                .class("glitch-text")
                .attr("data-text", "keep")
                .attr("data-text-en", ""),
        );
        let c = dom.append_to_body(
            HeadlessElement::new("h1")
                .class("glitch-text")
                .attr("data-text", "keep"),
        );
        project_language(&PageConfig::default(), Lang::En).apply(&mut dom);
        assert_eq!(dom.attr(&a, "data-text").as_deref(), Some("Hello"));
        assert_eq!(dom.attr(&b, "data-text").as_deref(), Some("keep"));
        assert_eq!(dom.attr(&c, "data-text").as_deref(), Some("keep"));
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let cfg = PageConfig::default();
        let mut dom = HeadlessDom::default();
        dom.append_to_body(HeadlessElement::new("p").class("lang-en"));
        dom.append_to_body(HeadlessElement::new("ul").class("nav-links"));
        let mut patch = project_language(&cfg, Lang::En);
        patch.extend(project_menu(&cfg, true));
        patch.apply(&mut dom);
        let once = format!("{dom:?}");
        patch.apply(&mut dom);
        assert_eq!(format!("{dom:?}"), once);
    }

    #[test]
    fn nth_out_of_range_is_noop() {
        let cfg = PageConfig::default();
        let mut dom = HeadlessDom::default();
        let before = format!("{dom:?}");
        project_timeline(&cfg, Some(5)).apply(&mut dom);
        assert_eq!(format!("{dom:?}"), before);
    }
}

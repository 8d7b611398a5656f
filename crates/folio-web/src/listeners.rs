#![forbid(unsafe_code)]

//! Browser listener plan derived from the controller's handler table.
//!
//! Platform-independent so the mapping from [`folio_core::HANDLERS`] to DOM
//! listeners is testable natively. No JS/WASM types here.

use folio_core::{ClickSource, EventKind, HANDLERS, PageConfig, Selector};

/// Where a listener is installed.
#[derive(Debug, Clone, PartialEq)]
pub enum ListenerTarget {
    /// `window`
    Window,
    /// One listener per match.
    EachMatch(Selector),
    /// The first match only; absent element means no listener.
    FirstMatch(Selector),
    /// One `IntersectionObserver` watching the controller's reveal
    /// candidates.
    Observer { threshold: f64 },
}

/// One listener to install.
#[derive(Debug, Clone, PartialEq)]
pub struct ListenerSpec {
    pub kind: EventKind,
    /// DOM event name (`"scroll"`, `"click"`), or `"intersection"` for
    /// observers.
    pub dom_event: &'static str,
    pub target: ListenerTarget,
}

/// Listeners needed for every non-`Ready` event kind in the handler table,
/// one per kind, in table order. `Ready` is delivered by the mount itself.
#[must_use]
pub fn listener_plan(config: &PageConfig) -> Vec<ListenerSpec> {
    let mut kinds: Vec<EventKind> = Vec::new();
    for binding in HANDLERS {
        if binding.event != EventKind::Ready && !kinds.contains(&binding.event) {
            kinds.push(binding.event);
        }
    }

    let selectors = &config.selectors;
    kinds
        .into_iter()
        .filter_map(|kind| {
            let (dom_event, target) = match kind {
                EventKind::Scroll => ("scroll", ListenerTarget::Window),
                EventKind::Click(ClickSource::Anchor) => {
                    ("click", ListenerTarget::EachMatch(selectors.anchors.clone()))
                }
                EventKind::Click(ClickSource::Hamburger) => {
                    ("click", ListenerTarget::FirstMatch(selectors.hamburger.clone()))
                }
                EventKind::Click(ClickSource::LangToggle) => (
                    "click",
                    ListenerTarget::FirstMatch(selectors.lang_toggle.clone()),
                ),
                EventKind::Intersection => (
                    "intersection",
                    ListenerTarget::Observer {
                        threshold: config.reveal_threshold,
                    },
                ),
                EventKind::Ready => return None,
            };
            Some(ListenerSpec {
                kind,
                dom_event,
                target,
            })
        })
        .collect()
}

#![forbid(unsafe_code)]

//! Page interaction controller.
//!
//! [`PageController`] owns the page's transient state and reacts to
//! [`PageEvent`]s. Which behaviors run for which event is spelled out in the
//! [`HANDLERS`] table; hosts enumerate the table to decide which browser
//! listeners to install, and [`PageController::dispatch`] walks it to run
//! the behaviors in order.
//!
//! # Invariants
//!
//! 1. **One language**: `PageState::lang` is always `He` or `En` and every
//!    language-dependent element is re-projected from it on each change.
//! 2. **At most one focus**: `PageState::focused_item` names zero or one
//!    timeline item, and the document carries the focus class on that item
//!    only.
//! 3. **Reveal is terminal**: once an index is revealed the tracker never
//!    clears it.
//! 4. **Ready once**: a second `Ready` event is ignored, so the menu style
//!    is injected exactly once.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Anchor target missing | `href="#nope"` or `href="#"` | `FallThrough`, default kept |
//! | Toggle/hamburger missing | Markup without them | Patches match nothing |
//! | Storage refuses write | Private mode, quota | Logged; language still changes |
//! | Style injection fails | No `<head>` | Logged; menu still toggles |

#[cfg(feature = "tracing")]
use tracing::{debug, trace, warn};

use crate::anchor::{AnchorOutcome, fragment_id};
use crate::config::PageConfig;
use crate::dom::Dom;
use crate::lang::Lang;
use crate::menu::{MenuState, mobile_menu_css};
use crate::nav::{SectionProbe, current_section};
use crate::reveal::{IntersectionSample, RevealTracker};
use crate::storage::{PreferenceStore, load_language, save_language};
use crate::timeline::{FocusBand, compute_focus};
use crate::view;

// ---------------------------------------------------------------------------
// Handler table
// ---------------------------------------------------------------------------

/// Which control a click came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickSource {
    /// An in-page anchor (`a[href^="#"]`).
    Anchor,
    Hamburger,
    LangToggle,
}

/// Event categories the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Document structure is ready.
    Ready,
    /// Window scrolled.
    Scroll,
    Click(ClickSource),
    /// Intersection observer callback for reveal candidates.
    Intersection,
}

/// A single page behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Behavior {
    InjectMenuStyle,
    TagRevealCandidates,
    FocusTimeline,
    ApplyLanguage,
    HighlightNav,
    SmoothScroll,
    ToggleMenu,
    ToggleLanguage,
    Reveal,
}

/// One row of the handler table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub event: EventKind,
    pub behavior: Behavior,
}

const fn bind(event: EventKind, behavior: Behavior) -> Binding {
    Binding { event, behavior }
}

/// Every behavior of the page, grouped by triggering event, in run order.
pub const HANDLERS: &[Binding] = &[
    bind(EventKind::Ready, Behavior::InjectMenuStyle),
    bind(EventKind::Ready, Behavior::TagRevealCandidates),
    bind(EventKind::Ready, Behavior::FocusTimeline),
    bind(EventKind::Ready, Behavior::ApplyLanguage),
    bind(EventKind::Scroll, Behavior::HighlightNav),
    bind(EventKind::Scroll, Behavior::FocusTimeline),
    bind(EventKind::Click(ClickSource::Anchor), Behavior::SmoothScroll),
    bind(EventKind::Click(ClickSource::Hamburger), Behavior::ToggleMenu),
    bind(EventKind::Click(ClickSource::LangToggle), Behavior::ToggleLanguage),
    bind(EventKind::Intersection, Behavior::Reveal),
];

/// Behaviors bound to `kind`, in run order.
pub fn behaviors_for(kind: EventKind) -> impl Iterator<Item = Behavior> {
    HANDLERS
        .iter()
        .filter(move |b| b.event == kind)
        .map(|b| b.behavior)
}

// ---------------------------------------------------------------------------
// Events and state
// ---------------------------------------------------------------------------

/// An event delivered by the host. `N` is the host's element handle.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent<N> {
    Ready,
    Scroll,
    /// Click on `node`, which the host attached as `source`.
    Click { source: ClickSource, node: N },
    Intersection(Vec<IntersectionSample>),
}

impl<N> PageEvent<N> {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Ready => EventKind::Ready,
            Self::Scroll => EventKind::Scroll,
            Self::Click { source, .. } => EventKind::Click(*source),
            Self::Intersection(_) => EventKind::Intersection,
        }
    }
}

/// Result of dispatching one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dispatch {
    /// The host must call `preventDefault()` on the originating event.
    pub prevent_default: bool,
    /// Behaviors that ran.
    pub behaviors_run: usize,
}

/// Transient UI state, scoped to the page's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    pub lang: Lang,
    /// Id of the section the nav bar highlights. `None` until the first
    /// scroll, and whenever no section qualifies.
    pub active_section: Option<String>,
    /// Index of the focused timeline item.
    pub focused_item: Option<usize>,
    pub menu: MenuState,
    pub reveal: RevealTracker,
    pub ready: bool,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Owns the page state, the document, and the preference store.
#[derive(Debug)]
pub struct PageController<D: Dom, S: PreferenceStore> {
    config: PageConfig,
    dom: D,
    store: S,
    state: PageState,
    /// Reveal candidates as matched at construction. Sample indices refer
    /// to positions in this list.
    reveal_nodes: Vec<D::Node>,
}

impl<D: Dom, S: PreferenceStore> PageController<D, S> {
    /// Build a controller. Reads the stored language and counts reveal
    /// candidates; the document is not touched until `Ready`.
    pub fn new(config: PageConfig, dom: D, store: S) -> Self {
        let lang = load_language(&store, &config.storage_key, config.default_lang);
        let reveal_nodes = dom.query_all(&config.selectors.reveal);
        let state = PageState {
            lang,
            active_section: None,
            focused_item: None,
            menu: MenuState::default(),
            reveal: RevealTracker::new(reveal_nodes.len(), config.reveal_threshold),
            ready: false,
        };
        Self {
            config,
            dom,
            store,
            state,
            reveal_nodes,
        }
    }

    #[must_use]
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &PageState {
        &self.state
    }

    #[must_use]
    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Elements the reveal tracker follows, in the order sample indices use.
    #[must_use]
    pub fn reveal_candidates(&self) -> &[D::Node] {
        &self.reveal_nodes
    }

    #[must_use]
    pub fn language(&self) -> Lang {
        self.state.lang
    }

    /// Run every behavior bound to the event's kind.
    pub fn dispatch(&mut self, event: PageEvent<D::Node>) -> Dispatch {
        let kind = event.kind();
        if kind == EventKind::Ready {
            if self.state.ready {
                #[cfg(feature = "tracing")]
                debug!("duplicate ready event ignored");
                return Dispatch::default();
            }
            self.state.ready = true;
        }

        let mut outcome = Dispatch::default();
        for behavior in behaviors_for(kind) {
            #[cfg(feature = "tracing")]
            trace!(?kind, ?behavior, "run behavior");
            outcome.behaviors_run += 1;
            if self.run(behavior, &event) {
                outcome.prevent_default = true;
            }
        }
        outcome
    }

    /// Returns whether the originating event's default must be prevented.
    fn run(&mut self, behavior: Behavior, event: &PageEvent<D::Node>) -> bool {
        match behavior {
            Behavior::InjectMenuStyle => {
                self.inject_menu_style();
                false
            }
            Behavior::TagRevealCandidates => {
                view::project_reveal_pending(&self.config).apply(&mut self.dom);
                false
            }
            Behavior::FocusTimeline => {
                self.update_timeline_focus();
                false
            }
            Behavior::ApplyLanguage => {
                self.set_language(self.state.lang);
                false
            }
            Behavior::HighlightNav => {
                self.highlight_nav();
                false
            }
            Behavior::SmoothScroll => match event {
                PageEvent::Click { node, .. } => self.follow_anchor(node).prevents_default(),
                _ => false,
            },
            Behavior::ToggleMenu => {
                self.toggle_menu();
                false
            }
            Behavior::ToggleLanguage => {
                self.toggle_language();
                false
            }
            Behavior::Reveal => {
                if let PageEvent::Intersection(samples) = event {
                    self.reveal(samples);
                }
                false
            }
        }
    }

    fn inject_menu_style(&mut self) {
        let css = mobile_menu_css(
            &self.config.selectors.nav_panel.to_css(),
            &self.config.classes.active,
            self.config.menu_breakpoint_px,
            self.config.menu_top_px,
        );
        if let Err(_err) = self.dom.inject_style(&css) {
            #[cfg(feature = "tracing")]
            warn!(error = %_err, "mobile menu style not injected");
        }
    }

    /// Switch to `lang`, persist it, and re-project every language-dependent
    /// element.
    pub fn set_language(&mut self, lang: Lang) {
        self.state.lang = lang;
        save_language(&mut self.store, &self.config.storage_key, lang);
        view::project_language(&self.config, lang).apply(&mut self.dom);
        #[cfg(feature = "tracing")]
        debug!(lang = %lang, "language applied");
    }

    /// Flip between the two languages. Returns the new language.
    pub fn toggle_language(&mut self) -> Lang {
        let next = self.state.lang.other();
        self.set_language(next);
        next
    }

    /// Flip the mobile menu. Returns whether it is now open.
    pub fn toggle_menu(&mut self) -> bool {
        let open = self.state.menu.toggle();
        view::project_menu(&self.config, open).apply(&mut self.dom);
        open
    }

    #[must_use]
    pub fn is_menu_open(&self) -> bool {
        self.state.menu.is_open()
    }

    /// Scroll to the element an anchor points at, closing the menu.
    pub fn follow_anchor(&mut self, anchor: &D::Node) -> AnchorOutcome {
        let Some(href) = self.dom.attr(anchor, "href") else {
            return AnchorOutcome::FallThrough;
        };
        let Some(target) = fragment_id(&href).and_then(|id| self.dom.element_by_id(id)) else {
            #[cfg(feature = "tracing")]
            trace!(href = %href, "anchor target missing");
            return AnchorOutcome::FallThrough;
        };
        self.dom.scroll_into_view(&target, self.config.scroll_behavior);
        if self.state.menu.close() {
            view::project_menu(&self.config, false).apply(&mut self.dom);
        }
        AnchorOutcome::Scrolled
    }

    /// Recompute the current section and re-project nav link highlights.
    pub fn highlight_nav(&mut self) -> Option<&str> {
        let sections: Vec<SectionProbe> = self
            .dom
            .query_all(&self.config.selectors.sections)
            .iter()
            .map(|node| {
                let metrics = self.dom.metrics(node);
                SectionProbe {
                    id: self.dom.attr(node, "id"),
                    offset_top: metrics.offset_top,
                    client_height: metrics.client_height,
                }
            })
            .collect();
        let scroll_y = self.dom.viewport().scroll_y;
        let current = current_section(scroll_y, &sections, self.config.nav_threshold_fraction)
            .map(str::to_owned);

        let hrefs: Vec<Option<String>> = self
            .dom
            .query_all(&self.config.selectors.nav_links)
            .iter()
            .map(|link| self.dom.attr(link, "href"))
            .collect();
        view::project_nav(&self.config, &hrefs, current.as_deref()).apply(&mut self.dom);

        self.state.active_section = current;
        self.state.active_section.as_deref()
    }

    /// Recompute the focused timeline item and re-project focus classes.
    pub fn update_timeline_focus(&mut self) -> Option<usize> {
        let items: Vec<_> = self
            .dom
            .query_all(&self.config.selectors.timeline_items)
            .iter()
            .map(|node| self.dom.metrics(node))
            .collect();
        let band = FocusBand {
            start: self.config.focus_band_start,
            end: self.config.focus_band_end,
        };
        let result = compute_focus(&items, self.dom.viewport().inner_height, band);
        view::project_timeline(&self.config, result.focused).apply(&mut self.dom);

        #[cfg(feature = "tracing")]
        if result.focused != self.state.focused_item {
            debug!(focused = ?result.focused, closest = ?result.closest, "timeline focus changed");
        }
        self.state.focused_item = result.focused;
        result.focused
    }

    /// Promote newly visible candidates to revealed.
    pub fn reveal(&mut self, samples: &[IntersectionSample]) -> Vec<usize> {
        let newly = self.state.reveal.observe(samples);
        for &idx in &newly {
            if let Some(node) = self.reveal_nodes.get(idx) {
                self.dom.set_class(node, &self.config.classes.active, true);
                self.dom.set_class(node, &self.config.classes.reveal, true);
            }
        }
        newly
    }
}

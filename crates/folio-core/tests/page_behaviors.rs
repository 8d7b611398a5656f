//! End-to-end behavior tests driving `PageController<HeadlessDom>` through
//! the same events the browser shell delivers.

use folio_core::{
    ClickSource, Dom, HeadlessDom, HeadlessElement, IntersectionSample, Lang, MemoryStore, NodeId,
    PageConfig, PageController, PageEvent, PreferenceStore, ScrollBehavior, Selector,
};
use pretty_assertions::assert_eq;
use tracing::Level;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(Level::DEBUG)
        .try_init();
}

struct Page {
    dom: HeadlessDom,
    nav_panel: NodeId,
    nav_links: Vec<NodeId>,
    orphan_link: NodeId,
    hamburger: NodeId,
    toggle: NodeId,
    sections: Vec<NodeId>,
    he_text: NodeId,
    en_text: NodeId,
    glitch: NodeId,
    cards: Vec<NodeId>,
    timeline: Vec<NodeId>,
}

/// Portfolio markup: nav with three links (+ one broken), three sections,
/// bilingual text, a glitch heading, two project cards, three timeline items.
fn portfolio() -> Page {
    init_tracing();
    let mut dom = HeadlessDom::default();
    let header = dom.append_to_body(HeadlessElement::new("header"));
    let nav_panel = dom.append(header, HeadlessElement::new("ul").class("nav-links"));
    let nav_links = ["#hero", "#about", "#projects"]
        .iter()
        .map(|href| dom.append(nav_panel, HeadlessElement::new("a").attr("href", href)))
        .collect();
    let orphan_link = dom.append(nav_panel, HeadlessElement::new("a").attr("href", "#missing"));
    let hamburger = dom.append(header, HeadlessElement::new("div").class("hamburger"));
    let toggle = dom.append(header, HeadlessElement::new("button").id("lang-toggle"));

    let hero = dom.append_to_body(HeadlessElement::new("section").id("hero").offset(0.0, 600.0));
    let glitch = dom.append(
        hero,
        HeadlessElement::new("h1")
            .class("glitch-text")
            .attr("data-text", "")
            .attr("data-text-he", "שלום")
            .attr("data-text-en", "Hello"),
    );
    let he_text = dom.append(hero, HeadlessElement::new("p").class("lang-he"));
    let en_text = dom.append(hero, HeadlessElement::new("p").class("lang-en"));
    let about = dom.append_to_body(
        HeadlessElement::new("section")
            .id("about")
            .class("section")
            .offset(600.0, 900.0),
    );
    let timeline = [100.0, 380.0, 900.0]
        .iter()
        .map(|top| {
            dom.append(
                about,
                HeadlessElement::new("div")
                    .class("timeline-item")
                    .rect(*top, 100.0),
            )
        })
        .collect();
    let projects = dom.append_to_body(
        HeadlessElement::new("section")
            .id("projects")
            .class("section")
            .offset(1500.0, 300.0),
    );
    let cards = (0..2)
        .map(|_| dom.append(projects, HeadlessElement::new("div").class("project-card")))
        .collect();

    Page {
        dom,
        nav_panel,
        nav_links,
        orphan_link,
        hamburger,
        toggle,
        sections: vec![hero, about, projects],
        he_text,
        en_text,
        glitch,
        cards,
        timeline,
    }
}

fn mount(page: &Page, store: MemoryStore) -> PageController<HeadlessDom, MemoryStore> {
    let mut c = PageController::new(PageConfig::default(), page.dom.clone(), store);
    c.dispatch(PageEvent::Ready);
    c
}

fn active_links(c: &PageController<HeadlessDom, MemoryStore>, page: &Page) -> Vec<NodeId> {
    page.nav_links
        .iter()
        .copied()
        .filter(|n| c.dom().has_class(n, "active"))
        .collect()
}

// ── Language ────────────────────────────────────────────────────────────

#[test]
fn first_visit_defaults_to_hebrew() {
    let page = portfolio();
    let c = mount(&page, MemoryStore::new());
    let dom = c.dom();
    assert_eq!(c.language(), Lang::He);
    assert_eq!(dom.attr(&HeadlessDom::HTML, "dir").as_deref(), Some("rtl"));
    assert_eq!(dom.attr(&HeadlessDom::HTML, "lang").as_deref(), Some("he"));
    assert!(dom.has_class(&HeadlessDom::BODY, "rtl-mode"));
    assert_eq!(dom.text_of(page.toggle), "EN");
    assert!(!dom.is_hidden(page.he_text));
    assert!(dom.is_hidden(page.en_text));
    assert_eq!(dom.attr(&page.glitch, "data-text").as_deref(), Some("שלום"));
    assert_eq!(c.store().value("preferredLang"), Some("he"));
}

#[test]
fn stored_english_is_restored() {
    let page = portfolio();
    let c = mount(&page, MemoryStore::with("preferredLang", "en"));
    assert_eq!(c.language(), Lang::En);
    assert_eq!(c.dom().attr(&HeadlessDom::HTML, "dir").as_deref(), Some("ltr"));
    assert!(!c.dom().has_class(&HeadlessDom::BODY, "rtl-mode"));
    assert_eq!(c.dom().text_of(page.toggle), "HE");
    assert!(c.dom().is_hidden(page.he_text));
    assert!(!c.dom().is_hidden(page.en_text));
}

#[test]
fn toggle_click_switches_and_persists() {
    let page = portfolio();
    let mut c = mount(&page, MemoryStore::new());
    c.dispatch(PageEvent::Click {
        source: ClickSource::LangToggle,
        node: page.toggle,
    });
    assert_eq!(c.language(), Lang::En);
    assert_eq!(c.store().get("preferredLang").unwrap().as_deref(), Some("en"));
    assert_eq!(c.dom().attr(&page.glitch, "data-text").as_deref(), Some("Hello"));
    assert_eq!(c.dom().text_of(page.toggle), "HE");
}

#[test]
fn toggling_twice_restores_everything() {
    let page = portfolio();
    let mut c = mount(&page, MemoryStore::new());
    let before = format!("{:?}", c.dom());
    let stored_before = c.store().clone();
    c.toggle_language();
    c.toggle_language();
    assert_eq!(format!("{:?}", c.dom()), before);
    assert_eq!(c.store(), &stored_before);
}

#[test]
fn page_without_toggle_still_applies_language() {
    let mut dom = HeadlessDom::default();
    let en = dom.append_to_body(HeadlessElement::new("span").class("lang-en"));
    let mut c = PageController::new(PageConfig::default(), dom, MemoryStore::new());
    c.dispatch(PageEvent::Ready);
    assert!(c.dom().is_hidden(en));
    assert_eq!(c.dom().attr(&HeadlessDom::HTML, "dir").as_deref(), Some("rtl"));
}

// ── Smooth scroll ───────────────────────────────────────────────────────

#[test]
fn anchor_with_target_scrolls_and_prevents_default() {
    let page = portfolio();
    let mut c = mount(&page, MemoryStore::new());
    let out = c.dispatch(PageEvent::Click {
        source: ClickSource::Anchor,
        node: page.nav_links[1],
    });
    assert!(out.prevent_default);
    assert_eq!(c.dom().scrolls(), &[(page.sections[1], ScrollBehavior::Smooth)]);
}

#[test]
fn configured_instant_scroll_is_used() {
    let page = portfolio();
    let config = PageConfig::from_json(r#"{"scroll_behavior":"instant"}"#).unwrap();
    let mut c = PageController::new(config, page.dom.clone(), MemoryStore::new());
    c.dispatch(PageEvent::Ready);
    c.dispatch(PageEvent::Click {
        source: ClickSource::Anchor,
        node: page.nav_links[2],
    });
    assert_eq!(c.dom().scrolls(), &[(page.sections[2], ScrollBehavior::Instant)]);
}

#[test]
fn anchor_without_target_falls_through() {
    let page = portfolio();
    let mut c = mount(&page, MemoryStore::new());
    let out = c.dispatch(PageEvent::Click {
        source: ClickSource::Anchor,
        node: page.orphan_link,
    });
    assert!(!out.prevent_default);
    assert!(c.dom().scrolls().is_empty());
}

#[test]
fn navigation_closes_open_menu() {
    let page = portfolio();
    let mut c = mount(&page, MemoryStore::new());
    assert!(c.toggle_menu());
    c.dispatch(PageEvent::Click {
        source: ClickSource::Anchor,
        node: page.nav_links[2],
    });
    assert!(!c.is_menu_open());
    assert!(!c.dom().has_class(&page.nav_panel, "active"));
    assert!(!c.dom().has_class(&page.hamburger, "toggle"));
}

#[test]
fn failed_navigation_leaves_menu_open() {
    let page = portfolio();
    let mut c = mount(&page, MemoryStore::new());
    c.toggle_menu();
    c.follow_anchor(&page.orphan_link);
    assert!(c.is_menu_open());
}

// ── Mobile menu ─────────────────────────────────────────────────────────

#[test]
fn hamburger_toggles_on_then_off() {
    let page = portfolio();
    let mut c = mount(&page, MemoryStore::new());
    let click = || PageEvent::Click {
        source: ClickSource::Hamburger,
        node: page.hamburger,
    };
    c.dispatch(click());
    assert!(c.dom().has_class(&page.nav_panel, "active"));
    assert!(c.dom().has_class(&page.hamburger, "toggle"));
    c.dispatch(click());
    assert!(!c.dom().has_class(&page.nav_panel, "active"));
    assert!(!c.dom().has_class(&page.hamburger, "toggle"));
}

#[test]
fn menu_style_injected_once_at_ready() {
    let page = portfolio();
    let mut c = mount(&page, MemoryStore::new());
    c.dispatch(PageEvent::Ready);
    assert_eq!(c.dom().styles().len(), 1);
    assert!(c.dom().styles()[0].contains("max-width: 768px"));
    assert!(c.dom().styles()[0].contains(".nav-links.active"));
}

// ── Nav highlight ───────────────────────────────────────────────────────

#[test]
fn no_highlight_before_first_scroll() {
    let page = portfolio();
    let c = mount(&page, MemoryStore::new());
    assert!(active_links(&c, &page).is_empty());
    assert_eq!(c.state().active_section, None);
}

#[test]
fn scrolling_moves_highlight() {
    let page = portfolio();
    let mut c = mount(&page, MemoryStore::new());

    c.dispatch(PageEvent::Scroll);
    assert_eq!(active_links(&c, &page), vec![page.nav_links[0]]);

    // about threshold: 600 - 300 = 300
    c.dom_mut().set_scroll_y(300.0);
    c.dispatch(PageEvent::Scroll);
    assert_eq!(active_links(&c, &page), vec![page.nav_links[1]]);
    assert_eq!(c.state().active_section.as_deref(), Some("about"));

    // projects threshold: 1500 - 100 = 1400
    c.dom_mut().set_scroll_y(1450.0);
    c.dispatch(PageEvent::Scroll);
    assert_eq!(active_links(&c, &page), vec![page.nav_links[2]]);
}

#[test]
fn nothing_highlighted_when_no_section_qualifies() {
    let mut dom = HeadlessDom::default();
    let nav = dom.append_to_body(HeadlessElement::new("nav").class("nav-links"));
    let link = dom.append(nav, HeadlessElement::new("a").attr("href", "#late"));
    dom.append_to_body(HeadlessElement::new("section").id("late").offset(2000.0, 300.0));
    let mut c = PageController::new(PageConfig::default(), dom, MemoryStore::new());
    c.dispatch(PageEvent::Ready);
    c.dispatch(PageEvent::Scroll);
    assert!(!c.dom().has_class(&link, "active"));
}

// ── Reveal ──────────────────────────────────────────────────────────────

#[test]
fn candidates_are_tagged_pending_at_ready() {
    let page = portfolio();
    let c = mount(&page, MemoryStore::new());
    let reveal = c.dom().query_all(&Selector::AnyClass(vec![
        "section".into(),
        "project-card".into(),
    ]));
    assert_eq!(reveal.len(), 4);
    for node in reveal {
        assert!(c.dom().has_class(&node, "reveal"));
        assert!(!c.dom().has_class(&node, "active"));
    }
}

#[test]
fn intersection_reveals_once_and_sticks() {
    let page = portfolio();
    let mut c = mount(&page, MemoryStore::new());
    // Candidate order: about, projects, card0, card1.
    c.dispatch(PageEvent::Intersection(vec![
        IntersectionSample::new(2, 0.10, true),
        IntersectionSample::new(3, 0.20, true),
    ]));
    assert!(!c.dom().has_class(&page.cards[0], "active"));
    assert!(c.dom().has_class(&page.cards[1], "active"));

    c.dispatch(PageEvent::Intersection(vec![IntersectionSample::new(3, 0.0, false)]));
    assert!(c.dom().has_class(&page.cards[1], "active"));
    assert!(c.state().reveal.is_revealed(3));
}

#[test]
fn reveal_targets_the_observed_element_after_markup_changes() {
    init_tracing();
    let mut dom = HeadlessDom::default();
    let banner = dom.append_to_body(HeadlessElement::new("div"));
    let card = dom.append_to_body(HeadlessElement::new("div").class("project-card"));
    let mut c = PageController::new(PageConfig::default(), dom, MemoryStore::new());
    c.dispatch(PageEvent::Ready);
    assert_eq!(c.reveal_candidates(), &[card]);

    // A late class change puts the banner first in the selector's matches.
    c.dom_mut().set_class(&banner, "section", true);
    c.dispatch(PageEvent::Intersection(vec![IntersectionSample::new(0, 0.5, true)]));
    assert!(c.dom().has_class(&card, "active"));
    assert!(!c.dom().has_class(&banner, "active"));
}

// ── Timeline ────────────────────────────────────────────────────────────

#[test]
fn timeline_focus_at_startup_and_on_scroll() {
    let page = portfolio();
    let mut c = mount(&page, MemoryStore::new());
    // Centers 150, 430, 950; viewport center 400 → item 1.
    assert_eq!(c.state().focused_item, Some(1));
    assert!(c.dom().has_class(&page.timeline[1], "active-focus"));

    // Scroll everything up by 300: centers -150, 130, 650. Closest is 650,
    // outside the (200, 600) band.
    for (node, top) in page.timeline.iter().zip([-200.0, 80.0, 600.0]) {
        c.dom_mut().set_rect(*node, top, 100.0);
    }
    c.dispatch(PageEvent::Scroll);
    assert_eq!(c.state().focused_item, None);
    for node in &page.timeline {
        assert!(!c.dom().has_class(node, "active-focus"));
    }
}

#[test]
fn focus_moves_to_single_item() {
    let page = portfolio();
    let mut c = mount(&page, MemoryStore::new());
    for (node, top) in page.timeline.iter().zip([-600.0, -320.0, 330.0]) {
        c.dom_mut().set_rect(*node, top, 100.0);
    }
    c.dispatch(PageEvent::Scroll);
    let focused: Vec<_> = page
        .timeline
        .iter()
        .filter(|n| c.dom().has_class(n, "active-focus"))
        .collect();
    assert_eq!(focused, vec![&page.timeline[2]]);
}

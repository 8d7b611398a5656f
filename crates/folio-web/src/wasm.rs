#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the portfolio page.
//!
//! This module wraps [`folio_core::PageController`] over [`WebDom`] and
//! installs the listeners from [`crate::listeners::listener_plan`]. Only
//! compiled on `wasm32` targets.

use std::cell::RefCell;
use std::rc::Rc;

use folio_core::{
    ClickSource, Dispatch, Dom, EventKind, FolioError, IntersectionSample, Lang, PageConfig,
    PageController, PageEvent,
};
use js_sys::Array;
use tracing::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Element, EventTarget, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit,
};

#[cfg(all(feature = "autostart", not(test)))]
use crate::console::console_error;
use crate::console::{init_logging, install_panic_hook};
use crate::listeners::{ListenerSpec, ListenerTarget, listener_plan};
use crate::web_dom::{WebDom, WebStorage, host_err};

type WebController = PageController<WebDom, WebStorage>;
type Shared = Rc<RefCell<WebController>>;

thread_local! {
    static MOUNTED: RefCell<Option<Shared>> = const { RefCell::new(None) };
}

fn to_js(err: FolioError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Deliver an event, dropping it if the controller is already borrowed
/// (an event fired synchronously from inside another handler).
fn deliver(controller: &Shared, event: PageEvent<Element>) -> Dispatch {
    match controller.try_borrow_mut() {
        Ok(mut c) => c.dispatch(event),
        Err(_) => {
            debug!("re-entrant event dropped");
            Dispatch::default()
        }
    }
}

/// Handle to the mounted page.
#[wasm_bindgen]
pub struct PortfolioPage {
    inner: Shared,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
    autostart();
}

#[cfg(all(feature = "autostart", not(test)))]
fn autostart() {
    if let Err(err) = mount_when_ready() {
        console_error(&format!("portfolio page autostart failed: {err}"));
    }
}

#[cfg(any(not(feature = "autostart"), test))]
fn autostart() {}

fn document_loading(dom: &WebDom) -> bool {
    dom.document().ready_state() == "loading"
}

/// Mount the page: read the stored language, apply initial state, and
/// install every listener. `config_json` overrides any subset of the
/// default configuration. Mounting twice returns the existing page.
///
/// Fails while the document is still loading, since listeners would miss
/// elements parsed later.
#[wasm_bindgen]
pub fn mount(config_json: Option<String>) -> Result<PortfolioPage, JsValue> {
    install_panic_hook();
    if let Some(existing) = MOUNTED.with(|m| m.borrow().clone()) {
        warn!("page already mounted; configuration ignored");
        return Ok(PortfolioPage { inner: existing });
    }
    let config = PageConfig::from_optional_json(config_json.as_deref()).map_err(to_js)?;
    if document_loading(&WebDom::from_global().map_err(to_js)?) {
        return Err(to_js(FolioError::DocumentLoading));
    }
    mount_with(config).map_err(to_js)
}

#[cfg(all(feature = "autostart", not(test)))]
fn mount_when_ready() -> Result<(), FolioError> {
    let dom = WebDom::from_global()?;
    if !document_loading(&dom) {
        return mount_with(PageConfig::default()).map(|_| ());
    }
    let on_ready = Closure::once_into_js(|| {
        if MOUNTED.with(|m| m.borrow().is_some()) {
            return;
        }
        if let Err(err) = mount_with(PageConfig::default()) {
            console_error(&format!("portfolio page mount failed: {err}"));
        }
    });
    dom.document()
        .add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())
        .map_err(host_err)
}

fn mount_with(config: PageConfig) -> Result<PortfolioPage, FolioError> {
    let controller = build(config)?;
    MOUNTED.with(|m| *m.borrow_mut() = Some(Rc::clone(&controller)));
    Ok(PortfolioPage { inner: controller })
}

/// Create a controller over the live document, apply initial state, and
/// install its listeners.
fn build(config: PageConfig) -> Result<Shared, FolioError> {
    init_logging(&config.log_level);
    let dom = WebDom::from_global()?;
    let store = WebStorage::from_window(dom.window());
    if !store.is_persistent() {
        info!("language preference will not survive reload");
    }

    let controller: Shared = Rc::new(RefCell::new(PageController::new(config, dom, store)));
    controller.borrow_mut().dispatch(PageEvent::Ready);

    let plan = listener_plan(controller.borrow().config());
    for spec in &plan {
        attach(&controller, spec)?;
    }
    debug!(listeners = plan.len(), "page mounted");
    Ok(controller)
}

fn attach(controller: &Shared, spec: &ListenerSpec) -> Result<(), FolioError> {
    match (&spec.target, spec.kind) {
        (ListenerTarget::Window, EventKind::Scroll) => {
            let window: EventTarget = controller.borrow().dom().window().clone().into();
            let ctl = Rc::clone(controller);
            let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event| {
                deliver(&ctl, PageEvent::Scroll);
            });
            window
                .add_event_listener_with_callback(
                    spec.dom_event,
                    callback.as_ref().unchecked_ref(),
                )
                .map_err(host_err)?;
            callback.forget();
            Ok(())
        }
        (ListenerTarget::EachMatch(selector), EventKind::Click(source)) => {
            let nodes = controller.borrow().dom().query_all(selector);
            for node in nodes {
                listen_click(controller, spec.dom_event, source, node)?;
            }
            Ok(())
        }
        (ListenerTarget::FirstMatch(selector), EventKind::Click(source)) => {
            let first = controller.borrow().dom().query(selector);
            match first {
                Some(node) => listen_click(controller, spec.dom_event, source, node),
                None => {
                    debug!(selector = %selector.to_css(), "control absent, no listener");
                    Ok(())
                }
            }
        }
        (ListenerTarget::Observer { threshold }, EventKind::Intersection) => {
            observe(controller, *threshold)
        }
        (target, kind) => {
            warn!(?target, ?kind, "unsupported listener target");
            Ok(())
        }
    }
}

fn listen_click(
    controller: &Shared,
    dom_event: &str,
    source: ClickSource,
    node: Element,
) -> Result<(), FolioError> {
    let ctl = Rc::clone(controller);
    let target = node.clone();
    let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        let outcome = deliver(
            &ctl,
            PageEvent::Click {
                source,
                node: target.clone(),
            },
        );
        if outcome.prevent_default {
            event.prevent_default();
        }
    });
    node.add_event_listener_with_callback(dom_event, callback.as_ref().unchecked_ref())
        .map_err(host_err)?;
    callback.forget();
    Ok(())
}

/// Observe the controller's reveal candidates. Entries are matched back to
/// the candidate list by element identity.
fn observe(controller: &Shared, threshold: f64) -> Result<(), FolioError> {
    let candidates = controller.borrow().reveal_candidates().to_vec();
    if candidates.is_empty() {
        return Ok(());
    }

    let ctl = Rc::clone(controller);
    let targets = candidates.clone();
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, _observer: IntersectionObserver| {
            let samples: Vec<IntersectionSample> = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                .filter_map(|entry| {
                    let target = entry.target();
                    let index = targets.iter().position(|c| *c == target)?;
                    Some(IntersectionSample::new(
                        index,
                        entry.intersection_ratio(),
                        entry.is_intersecting(),
                    ))
                })
                .collect();
            if !samples.is_empty() {
                deliver(&ctl, PageEvent::Intersection(samples));
            }
        },
    );

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(threshold));
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
        .map_err(host_err)?;
    for candidate in &candidates {
        observer.observe(candidate);
    }
    callback.forget();
    Ok(())
}

#[wasm_bindgen]
impl PortfolioPage {
    /// Active language tag (`"he"` or `"en"`).
    pub fn language(&self) -> String {
        self.inner.borrow().language().tag().to_owned()
    }

    /// Switch to `tag` (`"he"` or `"en"`).
    #[wasm_bindgen(js_name = setLanguage)]
    pub fn set_language(&self, tag: &str) -> Result<(), JsValue> {
        let lang = Lang::from_tag(tag)
            .ok_or_else(|| JsValue::from_str(&format!("unknown language: {tag}")))?;
        self.inner.borrow_mut().set_language(lang);
        Ok(())
    }

    /// Flip the language. Returns the new tag.
    #[wasm_bindgen(js_name = toggleLanguage)]
    pub fn toggle_language(&self) -> String {
        self.inner.borrow_mut().toggle_language().tag().to_owned()
    }

    #[wasm_bindgen(js_name = isMenuOpen)]
    pub fn is_menu_open(&self) -> bool {
        self.inner.borrow().is_menu_open()
    }

    /// Flip the mobile menu. Returns whether it is now open.
    #[wasm_bindgen(js_name = toggleMenu)]
    pub fn toggle_menu(&self) -> bool {
        self.inner.borrow_mut().toggle_menu()
    }

    /// Index of the focused timeline item, or `undefined`.
    #[wasm_bindgen(js_name = focusedTimelineItem)]
    pub fn focused_timeline_item(&self) -> Option<u32> {
        self.inner
            .borrow()
            .state()
            .focused_item
            .and_then(|idx| u32::try_from(idx).ok())
    }

    /// Id of the highlighted section, or `undefined`.
    #[wasm_bindgen(js_name = activeSection)]
    pub fn active_section(&self) -> Option<String> {
        self.inner.borrow().state().active_section.clone()
    }

    /// Re-run the scroll behaviors, e.g. after the host changed layout.
    pub fn refresh(&self) {
        deliver(&self.inner, PageEvent::Scroll);
    }
}

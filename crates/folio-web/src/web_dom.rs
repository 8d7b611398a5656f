#![forbid(unsafe_code)]

//! `folio_core::Dom` and `PreferenceStore` over the browser document.
//!
//! Only compiled on `wasm32` targets. Host call failures are logged and
//! swallowed, except where the trait returns `Result`.

use folio_core::{BoxMetrics, Dom, FolioError, MemoryStore, PreferenceStore, Selector, Viewport};
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    CssStyleDeclaration, Document, Element, HtmlElement, ScrollIntoViewOptions, Storage,
    SvgElement, Window,
};

pub(crate) fn host_err(err: JsValue) -> FolioError {
    FolioError::Host(format!("{err:?}"))
}

fn storage_err(err: JsValue) -> FolioError {
    FolioError::Storage(format!("{err:?}"))
}

/// Inline style of an HTML or SVG element.
fn inline_style(node: &Element) -> Option<CssStyleDeclaration> {
    if let Some(el) = node.dyn_ref::<HtmlElement>() {
        return Some(el.style());
    }
    node.dyn_ref::<SvgElement>().map(SvgElement::style)
}

/// The live browser document.
#[derive(Debug, Clone)]
pub struct WebDom {
    window: Window,
    document: Document,
}

impl WebDom {
    /// Bind to the global `window` and `document`.
    pub fn from_global() -> Result<Self, FolioError> {
        let window = web_sys::window().ok_or(FolioError::MissingElement("window"))?;
        let document = window
            .document()
            .ok_or(FolioError::MissingElement("document"))?;
        Ok(Self { window, document })
    }

    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn query_all(&self, selector: &Selector) -> Vec<Element> {
        let css = selector.to_css();
        match self.document.query_selector_all(&css) {
            Ok(list) => (0..list.length())
                .filter_map(|i| list.item(i))
                .filter_map(|node| node.dyn_into::<Element>().ok())
                .collect(),
            Err(err) => {
                warn!(selector = %css, error = ?err, "query failed");
                Vec::new()
            }
        }
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn root(&self) -> Option<Element> {
        self.document.document_element()
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn attr(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attr(&mut self, node: &Element, name: &str, value: &str) {
        if let Err(err) = node.set_attribute(name, value) {
            warn!(name, error = ?err, "set_attribute failed");
        }
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn set_class(&mut self, node: &Element, class: &str, on: bool) {
        let list = node.class_list();
        let result = if on {
            list.add_1(class)
        } else {
            list.remove_1(class)
        };
        if let Err(err) = result {
            warn!(class, on, error = ?err, "class update failed");
        }
    }

    fn set_visible(&mut self, node: &Element, visible: bool) {
        let Some(style) = inline_style(node) else {
            warn!(tag = %node.tag_name(), "element has no inline style");
            return;
        };
        let display = if visible { "" } else { "none" };
        if let Err(err) = style.set_property("display", display) {
            warn!(error = ?err, "display update failed");
        }
    }

    fn set_text(&mut self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn metrics(&self, node: &Element) -> BoxMetrics {
        let rect = node.get_bounding_client_rect();
        let offset_top = node.dyn_ref::<HtmlElement>().map_or(0, HtmlElement::offset_top);
        BoxMetrics {
            offset_top: f64::from(offset_top),
            client_height: f64::from(node.client_height()),
            rect_top: rect.top(),
            rect_height: rect.height(),
        }
    }

    fn viewport(&self) -> Viewport {
        Viewport {
            scroll_y: self.window.scroll_y().unwrap_or(0.0),
            inner_height: self
                .window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0),
        }
    }

    fn scroll_into_view(&mut self, node: &Element, behavior: folio_core::ScrollBehavior) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(match behavior {
            folio_core::ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
            folio_core::ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
        });
        node.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn inject_style(&mut self, css: &str) -> Result<(), FolioError> {
        let head = self
            .document
            .head()
            .ok_or(FolioError::MissingElement("head"))?;
        let style = self.document.create_element("style").map_err(host_err)?;
        style.set_text_content(Some(css));
        head.append_child(&style).map_err(host_err)?;
        Ok(())
    }
}

/// `localStorage`, or an in-memory stand-in when the browser refuses access
/// (privacy modes, sandboxed frames).
#[derive(Debug, Clone)]
pub struct WebStorage {
    storage: Option<Storage>,
    fallback: MemoryStore,
}

impl WebStorage {
    #[must_use]
    pub fn from_window(window: &Window) -> Self {
        let storage = match window.local_storage() {
            Ok(storage) => storage,
            Err(err) => {
                warn!(error = ?err, "localStorage unavailable, using memory");
                None
            }
        };
        Self {
            storage,
            fallback: MemoryStore::new(),
        }
    }

    /// Whether values survive a reload.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.storage.is_some()
    }
}

impl PreferenceStore for WebStorage {
    fn get(&self, key: &str) -> Result<Option<String>, FolioError> {
        match &self.storage {
            Some(storage) => storage.get_item(key).map_err(storage_err),
            None => self.fallback.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), FolioError> {
        match &self.storage {
            Some(storage) => storage.set_item(key, value).map_err(storage_err),
            None => self.fallback.set(key, value),
        }
    }
}

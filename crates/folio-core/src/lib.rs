#![forbid(unsafe_code)]

//! Host-independent interaction logic for the portfolio page.
//!
//! # Role
//! `folio-core` owns every behavior of the page script: smooth anchor
//! navigation, active nav highlighting, reveal-on-intersection, timeline
//! focus, the mobile menu, and the Hebrew/English toggle. Nothing here touches
//! `web-sys`; all reads and writes go through the [`dom::Dom`] trait.
//!
//! # How it fits
//! - [`controller::PageController`] owns the [`controller::PageState`] and
//!   dispatches [`controller::PageEvent`]s through the [`controller::HANDLERS`]
//!   table.
//! - Pure projectors in [`view`] turn state into a [`view::Patch`], which is
//!   applied to any `Dom`.
//! - [`headless::HeadlessDom`] is an in-memory document used by tests and by
//!   hosts that want to simulate the page.
//! - `folio-web` implements `Dom` over the browser document and wires the
//!   listeners.

pub mod anchor;
pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod headless;
pub mod lang;
pub mod menu;
pub mod nav;
pub mod reveal;
pub mod storage;
pub mod timeline;
pub mod view;

pub use config::PageConfig;
pub use controller::{
    Behavior, Binding, ClickSource, Dispatch, EventKind, HANDLERS, PageController, PageEvent,
    PageState,
};
pub use dom::{BoxMetrics, Dom, ScrollBehavior, Selector, Viewport};
pub use error::{FolioError, Result};
pub use headless::{HeadlessDom, HeadlessElement, NodeId};
pub use lang::{Lang, TextDirection};
pub use reveal::IntersectionSample;
pub use storage::{MemoryStore, PreferenceStore};

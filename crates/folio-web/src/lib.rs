#![forbid(unsafe_code)]

//! WASM shell for the portfolio page.
//!
//! This crate wraps [`folio_core::PageController`] for the browser:
//! [`WebDom`] implements `folio_core::Dom` over `web_sys`, [`WebStorage`]
//! backs the language preference with `localStorage`, and [`mount`] installs
//! the listeners named by the controller's handler table.
//!
//! With the default `autostart` feature the page mounts itself once the
//! document is ready. Hosts that need a custom configuration disable the
//! feature and call `mount(configJson)` from JavaScript.

pub mod listeners;

#[cfg(target_arch = "wasm32")]
mod console;
#[cfg(target_arch = "wasm32")]
mod wasm;
#[cfg(target_arch = "wasm32")]
mod web_dom;

#[cfg(target_arch = "wasm32")]
pub use wasm::{PortfolioPage, mount};
#[cfg(target_arch = "wasm32")]
pub use web_dom::{WebDom, WebStorage};

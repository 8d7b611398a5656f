#![forbid(unsafe_code)]

//! Mobile menu state and the layout rule injected for its open state.

/// Open/closed state of the navigation panel. Closed by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuState {
    open: bool,
}

impl MenuState {
    #[must_use]
    pub const fn is_open(self) -> bool {
        self.open
    }

    /// Flip and return the new state.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Close; returns whether the menu was open.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }
}

/// Stylesheet for the open panel on narrow viewports. `panel_selector` is the
/// panel's CSS selector; the open state appends `.{active_class}` to it.
#[must_use]
pub fn mobile_menu_css(
    panel_selector: &str,
    active_class: &str,
    breakpoint_px: u32,
    top_px: u32,
) -> String {
    format!(
        "@media screen and (max-width: {breakpoint_px}px) {{
    {panel_selector}.{active_class} {{
        display: flex;
        flex-direction: column;
        position: absolute;
        top: {top_px}px;
        right: 0;
        width: 100%;
        background: rgba(10, 10, 18, 0.95);
        backdrop-filter: blur(10px);
        padding: 2rem;
        align-items: center;
        border-bottom: 1px solid var(--glass-border);
    }}
}}
"
    )
}

#![forbid(unsafe_code)]

//! In-page anchor resolution for smooth-scroll navigation.

/// What the host should do with the click after the controller handled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorOutcome {
    /// Target found and scrolled to; the default jump must be suppressed.
    Scrolled,
    /// No target; let the browser handle the click.
    FallThrough,
}

impl AnchorOutcome {
    #[must_use]
    pub const fn prevents_default(self) -> bool {
        matches!(self, Self::Scrolled)
    }
}

/// Element id referenced by an in-page `href` (`"#about"` → `"about"`).
///
/// `None` for hrefs that are not fragments or whose fragment is empty.
#[must_use]
pub fn fragment_id(href: &str) -> Option<&str> {
    let id = href.trim().strip_prefix('#')?;
    (!id.is_empty()).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragments() {
        assert_eq!(fragment_id("#about"), Some("about"));
        assert_eq!(fragment_id(" #projects "), Some("projects"));
        assert_eq!(fragment_id("#"), None);
        assert_eq!(fragment_id("/index.html#about"), None);
        assert_eq!(fragment_id(""), None);
    }

    #[test]
    fn only_scrolled_prevents_default() {
        assert!(AnchorOutcome::Scrolled.prevents_default());
        assert!(!AnchorOutcome::FallThrough.prevents_default());
    }
}

#![forbid(unsafe_code)]

//! Active-section tracking for the navigation bar.
//!
//! # Invariants
//!
//! 1. **Last qualifying wins**: sections are scanned in document order and
//!    every qualifying section overrides the previous one, so the result is
//!    the last section whose threshold the scroll position has crossed.
//! 2. **No match, no highlight**: when no section qualifies the current
//!    section is `None` and no link matches.

/// Layout of one section as read at scroll time.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionProbe {
    /// Section `id`; sections without one never become current.
    pub id: Option<String>,
    pub offset_top: f64,
    pub client_height: f64,
}

impl SectionProbe {
    pub fn new(id: impl Into<String>, offset_top: f64, client_height: f64) -> Self {
        Self {
            id: Some(id.into()),
            offset_top,
            client_height,
        }
    }

    /// Scroll position at which this section becomes current.
    #[must_use]
    pub fn threshold(&self, fraction: f64) -> f64 {
        self.offset_top - self.client_height * fraction
    }
}

/// Id of the current section for `scroll_y`.
#[must_use]
pub fn current_section(scroll_y: f64, sections: &[SectionProbe], fraction: f64) -> Option<&str> {
    let mut current = None;
    for section in sections {
        let Some(id) = section.id.as_deref().filter(|id| !id.is_empty()) else {
            continue;
        };
        if scroll_y >= section.threshold(fraction) {
            current = Some(id);
        }
    }
    current
}

/// Whether a nav link's `href` points at `section_id`. Textual containment,
/// so `"#about"` and `"index.html#about"` both match `"about"`.
#[must_use]
pub fn link_matches(href: Option<&str>, section_id: Option<&str>) -> bool {
    match (href, section_id) {
        (Some(href), Some(id)) if !id.is_empty() => href.contains(id),
        _ => false,
    }
}

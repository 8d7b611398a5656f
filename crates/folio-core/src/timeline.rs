#![forbid(unsafe_code)]

//! Timeline focus: the item nearest the viewport center is emphasized while
//! it sits inside the middle band of the screen.
//!
//! # Invariants
//!
//! 1. **At most one**: the result names a single item or none.
//! 2. **No fallback**: only the closest item is a candidate. If its center is
//!    outside the band nothing is focused, even when another item is inside.
//! 3. **First wins ties**: distances are compared with strict `<`.

use crate::dom::BoxMetrics;

/// Vertical band, as fractions of viewport height, in which focus applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusBand {
    pub start: f64,
    pub end: f64,
}

impl Default for FocusBand {
    fn default() -> Self {
        Self {
            start: 0.25,
            end: 0.75,
        }
    }
}

impl FocusBand {
    /// Strict containment of a viewport-space `y` for a viewport of
    /// `inner_height`.
    #[must_use]
    pub fn contains(&self, y: f64, inner_height: f64) -> bool {
        y > inner_height * self.start && y < inner_height * self.end
    }
}

/// One focus computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FocusResult {
    /// Index of the item nearest the viewport center.
    pub closest: Option<usize>,
    /// Index of the item to focus (closest, and inside the band).
    pub focused: Option<usize>,
}

/// Compute focus for items laid out as `items` in a viewport of
/// `inner_height`.
#[must_use]
pub fn compute_focus(items: &[BoxMetrics], inner_height: f64, band: FocusBand) -> FocusResult {
    let viewport_center = inner_height / 2.0;

    let mut closest = None;
    let mut min_distance = f64::INFINITY;
    for (idx, item) in items.iter().enumerate() {
        let distance = (viewport_center - item.rect_center()).abs();
        if distance < min_distance {
            min_distance = distance;
            closest = Some(idx);
        }
    }

    let focused = closest.filter(|&idx| band.contains(items[idx].rect_center(), inner_height));
    FocusResult { closest, focused }
}

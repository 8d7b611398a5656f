#![forbid(unsafe_code)]

//! Reveal-on-intersection bookkeeping.
//!
//! The browser's `IntersectionObserver` reports samples; [`RevealTracker`]
//! turns them into one-way reveal transitions. A revealed block stays
//! revealed for the rest of the page's life even though it keeps being
//! observed.

/// One intersection observation for a reveal candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionSample {
    /// Position of the candidate in the list captured when the page was
    /// built.
    pub index: usize,
    /// Visible fraction of the element's area.
    pub ratio: f64,
    pub is_intersecting: bool,
}

impl IntersectionSample {
    #[must_use]
    pub const fn new(index: usize, ratio: f64, is_intersecting: bool) -> Self {
        Self {
            index,
            ratio,
            is_intersecting,
        }
    }
}

/// Reveal flags for every candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealTracker {
    revealed: Vec<bool>,
    threshold: f64,
}

impl RevealTracker {
    #[must_use]
    pub fn new(candidates: usize, threshold: f64) -> Self {
        Self {
            revealed: vec![false; candidates],
            threshold,
        }
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.revealed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.revealed.is_empty()
    }

    #[must_use]
    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.revealed.iter().filter(|r| **r).count()
    }

    /// Apply samples and return the indices revealed by this batch, in
    /// sample order. Samples for unknown indices are ignored.
    pub fn observe(&mut self, samples: &[IntersectionSample]) -> Vec<usize> {
        let mut newly = Vec::new();
        for sample in samples {
            if !sample.is_intersecting || sample.ratio < self.threshold {
                continue;
            }
            match self.revealed.get_mut(sample.index) {
                Some(flag) if !*flag => {
                    *flag = true;
                    newly.push(sample.index);
                }
                _ => {}
            }
        }
        newly
    }
}

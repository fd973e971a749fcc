//! Scroll trigger for infinite loading.

use crate::pagination::LoadOutcome;
use crate::pagination::LoadState;

/// Default distance in pixels from the viewport bottom at which the next
/// page is requested.
pub const DEFAULT_SCROLL_THRESHOLD: f64 = 300.0;

/// Positions reported by a viewport scroll event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollGeometry {
    /// Bottom edge of the table, relative to the viewport top.
    pub table_bottom: f64,
    /// Height of the viewport.
    pub viewport_height: f64,
}

impl ScrollGeometry {
    /// Creates a geometry snapshot.
    pub fn new(table_bottom: f64, viewport_height: f64) -> Self {
        Self {
            table_bottom,
            viewport_height,
        }
    }
}

/// Result of handling a scroll event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOutcome {
    /// The table bottom is still far from the viewport bottom.
    NotNearBottom,
    /// A page is already in flight.
    Busy,
    /// The source has no more rows.
    Exhausted,
    /// The table has been torn down.
    Discarded,
    /// The next page was requested and merged.
    Loaded(LoadOutcome),
}

/// Decides whether a scroll event should request the next page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTrigger {
    threshold: f64,
}

impl Default for ScrollTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_THRESHOLD)
    }
}

impl ScrollTrigger {
    /// Creates a trigger with the given pixel threshold.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// The pixel threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns `true` if the table bottom is within the threshold of the
    /// viewport bottom.
    pub fn is_near_bottom(&self, geometry: ScrollGeometry) -> bool {
        geometry.table_bottom < geometry.viewport_height + self.threshold
    }

    /// Admission check against the current load state.
    ///
    /// Returns the outcome to report when no request may be issued.
    pub fn admit(&self, load_state: LoadState) -> Option<ScrollOutcome> {
        match load_state {
            LoadState::Loading => Some(ScrollOutcome::Busy),
            LoadState::Exhausted => Some(ScrollOutcome::Exhausted),
            LoadState::Idle => None,
        }
    }

    /// Full check for a scroll event: admission first, then geometry.
    pub fn check(&self, load_state: LoadState, geometry: ScrollGeometry) -> Option<ScrollOutcome> {
        if let Some(rejected) = self.admit(load_state) {
            return Some(rejected);
        }
        if !self.is_near_bottom(geometry) {
            return Some(ScrollOutcome::NotNearBottom);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_bottom() {
        let trigger = ScrollTrigger::default();
        assert!(trigger.is_near_bottom(ScrollGeometry::new(1000.0, 800.0)));
        assert!(!trigger.is_near_bottom(ScrollGeometry::new(1100.0, 800.0)));
        assert!(!trigger.is_near_bottom(ScrollGeometry::new(1200.0, 800.0)));
        assert!(trigger.is_near_bottom(ScrollGeometry::new(-50.0, 800.0)));
    }

    #[test]
    fn test_custom_threshold() {
        let trigger = ScrollTrigger::new(0.0);
        assert!(!trigger.is_near_bottom(ScrollGeometry::new(800.0, 800.0)));
        assert!(trigger.is_near_bottom(ScrollGeometry::new(799.0, 800.0)));
    }

    #[test]
    fn test_admission() {
        let trigger = ScrollTrigger::default();
        let near = ScrollGeometry::new(0.0, 800.0);
        let far = ScrollGeometry::new(5000.0, 800.0);

        assert_eq!(trigger.check(LoadState::Idle, near), None);
        assert_eq!(
            trigger.check(LoadState::Idle, far),
            Some(ScrollOutcome::NotNearBottom)
        );
        assert_eq!(
            trigger.check(LoadState::Loading, near),
            Some(ScrollOutcome::Busy)
        );
        assert_eq!(
            trigger.check(LoadState::Exhausted, near),
            Some(ScrollOutcome::Exhausted)
        );
    }
}

//! Growth Stage Estimation
//!
//! Maps a calendar month onto a normalized [0, 1] position inside a crop's
//! active growing window. Windows whose start month is after their end month
//! (winter crops such as wheat, Nov -> Apr) wrap across year-end.

use serde::Serialize;

use crate::crops::growth_window_for;
use crate::utils::clamp01;

/// Active growing window, inclusive months 1-12
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GrowthWindow {
    pub start_month: u32,
    pub end_month: u32,
}

impl GrowthWindow {
    /// Window used for crops without a table entry
    pub const FULL_YEAR: GrowthWindow = GrowthWindow::new(1, 12);

    pub const fn new(start_month: u32, end_month: u32) -> Self {
        Self { start_month, end_month }
    }

    /// Whether the window spans year-end (start > end)
    pub fn wraps(&self) -> bool {
        self.start_month > self.end_month
    }

    /// Whether `month` falls inside the window
    pub fn contains(&self, month: u32) -> bool {
        if self.wraps() {
            month >= self.start_month || month <= self.end_month
        } else {
            (self.start_month..=self.end_month).contains(&month)
        }
    }

    /// Normalized growth stage for `month`
    ///
    /// Non-wrapping: (month - start) / max(1, end - start), clamped.
    /// Wrapping: position inside a span of (12 - start + 1 + end) months,
    /// or 0 when the month lies outside the window.
    pub fn stage(&self, month: u32) -> f64 {
        let lo = self.start_month as i64;
        let hi = self.end_month as i64;
        let m = month as i64;

        let stage = if lo <= hi {
            (m - lo) as f64 / (hi - lo).max(1) as f64
        } else if m >= lo || m <= hi {
            let span = (12 - lo + 1) + hi;
            let idx = if m >= lo { m - lo } else { (12 - lo + 1) + m };
            idx as f64 / span.max(1) as f64
        } else {
            0.0
        };

        clamp01(stage)
    }
}

/// Growth stage for a normalized crop key and month (unknown keys use the full year)
pub fn estimate_growth_stage(crop: &str, month: u32) -> f64 {
    growth_window_for(crop).stage(month)
}

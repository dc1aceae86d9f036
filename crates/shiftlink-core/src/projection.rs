//! Projection of transfer state onto progress indicator attributes.
//!
//! Everything here is a pure function of its input: re-rendering the same signal
//! produces the same view, and out-of-order signals are rendered as given.

use serde::Serialize;

use crate::constants::{COMPLETED_LABEL, PROGRESS_RING_RADIUS};
use crate::models::ProgressSignal;

/// Colour state of the indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Neutral,
    Error,
    Success,
}

/// Attributes of a progress bar and its circular counterpart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressView {
    /// CSS width, e.g. `"55%"`
    pub width: String,
    pub aria_valuenow: u8,
    pub label: String,
    /// `"<filled> <circumference>"` for the ring indicator
    pub stroke_dasharray: String,
    pub tone: Tone,
}

impl ProgressView {
    pub fn project(signal: ProgressSignal) -> Self {
        let percent = signal.percent();
        Self {
            width: format!("{}%", percent),
            aria_valuenow: percent,
            label: format!("{}%", percent),
            stroke_dasharray: ring_dasharray(signal.fraction()),
            tone: Tone::Neutral,
        }
    }

    pub fn idle() -> Self {
        Self::project(ProgressSignal::new(0.0))
    }

    pub fn completed() -> Self {
        Self {
            label: COMPLETED_LABEL.to_string(),
            tone: Tone::Success,
            ..Self::project(ProgressSignal::new(1.0))
        }
    }

    /// Keep the bar where it stopped, turn it red and show `message`.
    pub fn failed(&self, message: impl Into<String>) -> Self {
        Self {
            label: message.into(),
            tone: Tone::Error,
            ..self.clone()
        }
    }
}

impl Default for ProgressView {
    fn default() -> Self {
        Self::idle()
    }
}

fn ring_dasharray(fraction: f64) -> String {
    let circumference = 2.0 * std::f64::consts::PI * PROGRESS_RING_RADIUS;
    format!("{:.2} {:.2}", circumference * fraction, circumference)
}

/// Human-readable size with SI prefixes: `512 B`, `30.72 kB`, `1.50 MB`.
pub fn file_size_si(bytes: u64) -> String {
    const PREFIXES: &[u8] = b"kMGTPEZY";

    let mut exponent = 0usize;
    let mut divisor = 1u64;
    while exponent < PREFIXES.len() && bytes / divisor >= 1000 {
        exponent += 1;
        match divisor.checked_mul(1000) {
            Some(d) => divisor = d,
            None => break,
        }
    }

    if exponent == 0 {
        return format!("{} B", bytes);
    }
    let value = bytes as f64 / divisor as f64;
    format!("{:.2} {}B", value, PREFIXES[exponent - 1] as char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_sequence_projects_to_width_and_label() {
        for (percent, expected) in [(0.0, "0%"), (10.0, "10%"), (55.0, "55%"), (100.0, "100%")] {
            let view = ProgressView::project(ProgressSignal::from_percent(percent));
            assert_eq!(view.width, expected);
            assert_eq!(view.label, expected);
            assert_eq!(view.aria_valuenow as f64, percent);
            assert_eq!(view.tone, Tone::Neutral);
        }
    }

    #[test]
    fn non_monotonic_input_renders_as_given() {
        let a = ProgressView::project(ProgressSignal::from_percent(60.0));
        let b = ProgressView::project(ProgressSignal::from_percent(40.0));
        assert_eq!(a.width, "60%");
        assert_eq!(b.width, "40%");
    }

    #[test]
    fn ring_is_full_when_complete() {
        let view = ProgressView::completed();
        assert_eq!(view.stroke_dasharray, "100.53 100.53");
        assert_eq!(view.label, "Completed");
        assert_eq!(view.tone, Tone::Success);
        assert_eq!(ProgressView::idle().stroke_dasharray, "0.00 100.53");
    }

    #[test]
    fn failure_keeps_width() {
        let view = ProgressView::project(ProgressSignal::from_percent(42.0)).failed("boom");
        assert_eq!(view.width, "42%");
        assert_eq!(view.label, "boom");
        assert_eq!(view.tone, Tone::Error);
    }

    #[test]
    fn si_sizes() {
        assert_eq!(file_size_si(0), "0 B");
        assert_eq!(file_size_si(512), "512 B");
        assert_eq!(file_size_si(999), "999 B");
        assert_eq!(file_size_si(1000), "1.00 kB");
        assert_eq!(file_size_si(30_720), "30.72 kB");
        assert_eq!(file_size_si(1_500_000), "1.50 MB");
        assert_eq!(file_size_si(2_000_000_000), "2.00 GB");
    }
}

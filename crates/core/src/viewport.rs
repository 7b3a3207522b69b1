//! Time viewport controller.
//!
//! Owns the visible time window within the data bounds. Every mutation
//! re-clamps so that the stored domain always satisfies:
//! `bounds.min <= start < end <= bounds.max` and
//! `MIN_SPAN_MS <= end - start <= bounds.span()`.
//! Windows that would overflow an edge are slid back inside, never
//! re-shrunk.

use serde::{Deserialize, Serialize};

use crate::model::{TimeBounds, TimeMs, DAY_MS, HOUR_MS};

/// Minimum visible span: one hour. Prevents degenerate zero-width windows.
pub const MIN_SPAN_MS: f64 = HOUR_MS;

/// Default initial window: the first two weeks of the data.
pub const DEFAULT_SPAN_MS: f64 = 14.0 * DAY_MS;

/// Exponential wheel-to-zoom response constant.
pub const WHEEL_ZOOM_K: f64 = 0.0015;

/// The currently visible time window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportDomain {
    pub start: TimeMs,
    pub end: TimeMs,
}

impl ViewportDomain {
    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    pub fn midpoint(&self) -> TimeMs {
        (self.start + self.end) / 2.0
    }

    /// Clamp this domain into `bounds`: span first (to
    /// `[MIN_SPAN_MS, bounds.span()]`, recentred on the current midpoint),
    /// then slide the window back inside the bounds without changing the
    /// span again.
    #[must_use]
    pub fn clamped(self, bounds: TimeBounds) -> Self {
        let full_span = bounds.span();
        // Data narrower than one hour caps the minimum at the full range.
        let min_span = MIN_SPAN_MS.min(full_span);
        let span = self.span().clamp(min_span, full_span);
        let mid = self.midpoint();
        let mut start = mid - span / 2.0;
        let mut end = mid + span / 2.0;
        if start < bounds.min {
            start = bounds.min;
            end = start + span;
        }
        if end > bounds.max {
            end = bounds.max;
            start = end - span;
        }
        // Bounds narrower than the minimum span degenerate to the full range.
        if start < bounds.min {
            start = bounds.min;
        }
        Self { start, end }
    }
}

/// Starting window on first data load: the first `DEFAULT_SPAN_MS` of the
/// bounds, or the full bounds when the data is narrower.
pub fn initial_domain(bounds: TimeBounds) -> ViewportDomain {
    let end = (bounds.min + DEFAULT_SPAN_MS).min(bounds.max);
    ViewportDomain {
        start: bounds.min,
        end,
    }
}

/// Bounds as the viewport consumes them: a single-instant data set (every
/// operation at one timestamp) widens to a `MIN_SPAN_MS` window centered
/// on that instant, so the time scale stays drawable and bars keep their
/// minimum width.
pub fn padded_bounds(bounds: TimeBounds) -> TimeBounds {
    if bounds.span() > 0.0 {
        bounds
    } else {
        TimeBounds {
            min: bounds.min - MIN_SPAN_MS / 2.0,
            max: bounds.max + MIN_SPAN_MS / 2.0,
        }
    }
}

/// The whole data range as a window ("Full" toolbar action).
pub fn full_domain(bounds: TimeBounds) -> ViewportDomain {
    ViewportDomain {
        start: bounds.min,
        end: bounds.max,
    }
}

/// Multiply the visible span by `1/factor` (factor > 1 zooms in),
/// recentred on `anchor` when given, else on the window midpoint.
///
/// Non-positive factors are a no-op — a wheel handler glitch must not
/// invert the window.
pub fn zoom_by(
    domain: ViewportDomain,
    bounds: TimeBounds,
    factor: f64,
    anchor: Option<TimeMs>,
) -> ViewportDomain {
    if !(factor > 0.0) || !factor.is_finite() {
        return domain;
    }
    let new_span = (domain.span() / factor).clamp(MIN_SPAN_MS.min(bounds.span()), bounds.span());
    let mid = anchor.unwrap_or_else(|| domain.midpoint());
    ViewportDomain {
        start: mid - new_span / 2.0,
        end: mid + new_span / 2.0,
    }
    .clamped(bounds)
}

/// Shift the window by a pixel delta. `px_per_ms` is the current scale
/// (`inner_width / domain.span()`); a positive drag delta moves the window
/// earlier in time, mirroring a grab-and-drag of the chart surface.
/// The span is never changed by panning.
pub fn pan_by(
    domain: ViewportDomain,
    bounds: TimeBounds,
    delta_px: f64,
    px_per_ms: f64,
) -> ViewportDomain {
    if !(px_per_ms > 0.0) || !delta_px.is_finite() {
        return domain;
    }
    let shift = -delta_px / px_per_ms;
    ViewportDomain {
        start: domain.start + shift,
        end: domain.end + shift,
    }
    .clamped(bounds)
}

/// Continuous wheel response: `exp(-delta_y * k)`. Smoothly exponential
/// rather than stepped, monotonic in scroll direction.
pub fn wheel_zoom_factor(delta_y: f64) -> f64 {
    (-delta_y * WHEEL_ZOOM_K).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> TimeBounds {
        // 100 days of data.
        TimeBounds {
            min: 0.0,
            max: 100.0 * DAY_MS,
        }
    }

    fn assert_valid(d: ViewportDomain, b: TimeBounds) {
        assert!(d.start >= b.min, "start {} < min {}", d.start, b.min);
        assert!(d.end <= b.max, "end {} > max {}", d.end, b.max);
        assert!(d.span() >= MIN_SPAN_MS - 1e-6);
        assert!(d.span() <= b.span() + 1e-6);
        assert!(d.start < d.end);
    }

    #[test]
    fn initial_window_caps_at_two_weeks() {
        let d = initial_domain(bounds());
        assert_eq!(d.start, 0.0);
        assert_eq!(d.end, 14.0 * DAY_MS);

        let narrow = TimeBounds {
            min: 0.0,
            max: 3.0 * DAY_MS,
        };
        let d = initial_domain(narrow);
        assert_eq!(d.end, 3.0 * DAY_MS);
    }

    #[test]
    fn degenerate_bounds_widen_to_the_minimum_span() {
        let b = padded_bounds(TimeBounds {
            min: 5.0 * HOUR_MS,
            max: 5.0 * HOUR_MS,
        });
        assert_eq!(b.span(), MIN_SPAN_MS);
        assert_eq!(b.min, 4.5 * HOUR_MS);
        assert_eq!(b.max, 5.5 * HOUR_MS);

        let regular = TimeBounds {
            min: 0.0,
            max: DAY_MS,
        };
        assert_eq!(padded_bounds(regular), regular);
    }

    #[test]
    fn zoom_in_halves_span() {
        let b = bounds();
        let d = initial_domain(b);
        let z = zoom_by(d, b, 2.0, None);
        assert!((z.span() - d.span() / 2.0).abs() < 1e-6);
        assert!((z.midpoint() - d.midpoint()).abs() < 1e-6);
        assert_valid(z, b);
    }

    #[test]
    fn zoom_out_clamps_to_full_span() {
        let b = bounds();
        let mut d = full_domain(b);
        d = zoom_by(d, b, 0.5, None);
        assert!((d.span() - b.span()).abs() < 1e-6);
        assert_valid(d, b);
    }

    #[test]
    fn zoom_in_clamps_to_min_span() {
        let b = bounds();
        let mut d = initial_domain(b);
        for _ in 0..64 {
            d = zoom_by(d, b, 4.0, None);
        }
        assert!((d.span() - MIN_SPAN_MS).abs() < 1e-6);
        assert_valid(d, b);
    }

    #[test]
    fn zoom_near_edge_slides_instead_of_shrinking() {
        let b = bounds();
        // Window hugging the right edge; zooming out must slide left.
        let d = ViewportDomain {
            start: 99.0 * DAY_MS,
            end: 100.0 * DAY_MS,
        };
        let z = zoom_by(d, b, 0.25, None);
        assert!((z.span() - 4.0 * DAY_MS).abs() < 1e-6);
        assert_eq!(z.end, b.max);
        assert_valid(z, b);
    }

    #[test]
    fn zoom_anchor_recentres() {
        let b = bounds();
        let d = ViewportDomain {
            start: 40.0 * DAY_MS,
            end: 60.0 * DAY_MS,
        };
        let z = zoom_by(d, b, 2.0, Some(50.0 * DAY_MS));
        assert!((z.midpoint() - 50.0 * DAY_MS).abs() < 1e-6);
    }

    #[test]
    fn non_positive_factor_is_noop() {
        let b = bounds();
        let d = initial_domain(b);
        assert_eq!(zoom_by(d, b, 0.0, None), d);
        assert_eq!(zoom_by(d, b, -2.0, None), d);
        assert_eq!(zoom_by(d, b, f64::NAN, None), d);
    }

    #[test]
    fn pan_shifts_without_changing_span() {
        let b = bounds();
        let d = ViewportDomain {
            start: 10.0 * DAY_MS,
            end: 20.0 * DAY_MS,
        };
        let px_per_ms = 1000.0 / d.span();
        // Drag 100 px to the left → window moves later in time.
        let p = pan_by(d, b, -100.0, px_per_ms);
        assert!((p.span() - d.span()).abs() < 1e-6);
        assert!(p.start > d.start);
        assert_valid(p, b);
    }

    #[test]
    fn pan_is_idempotent_at_the_left_edge() {
        let b = bounds();
        let d = ViewportDomain {
            start: 0.0,
            end: 10.0 * DAY_MS,
        };
        let p = pan_by(d, b, 500.0, 0.001);
        assert_eq!(p, d);
    }

    #[test]
    fn clamp_holds_over_random_walks() {
        let b = bounds();
        let mut d = initial_domain(b);
        // Deterministic pseudo-random event mix.
        let mut seed = 0x9e3779b9u32;
        for _ in 0..500 {
            seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
            let r = f64::from(seed >> 8) / f64::from(1u32 << 24);
            if seed & 1 == 0 {
                d = zoom_by(d, b, 0.1 + r * 4.0, None);
            } else {
                d = pan_by(d, b, (r - 0.5) * 2000.0, 800.0 / d.span());
            }
            assert_valid(d, b);
        }
    }

    #[test]
    fn wheel_factor_is_monotonic() {
        assert!(wheel_zoom_factor(-120.0) > 1.0); // wheel up → zoom in
        assert!(wheel_zoom_factor(120.0) < 1.0);
        assert_eq!(wheel_zoom_factor(0.0), 1.0);
        assert!(wheel_zoom_factor(-240.0) > wheel_zoom_factor(-120.0));
    }

    #[test]
    fn end_to_end_eight_hour_example() {
        // Two 4 h operations back to back → bounds 00:00..08:00.
        let b = TimeBounds {
            min: 0.0,
            max: 8.0 * HOUR_MS,
        };
        let d = initial_domain(b);
        assert_eq!(d, full_domain(b));
        let z = zoom_by(d, b, 2.0, None);
        assert!((z.start - 2.0 * HOUR_MS).abs() < 1e-6);
        assert!((z.end - 6.0 * HOUR_MS).abs() < 1e-6);
    }
}

use chrono::{DateTime, Utc};

use super::ticks::{format_tick, nice, tick_step, ticks};
use super::time_ticks::time_ticks;

/// Continuous linear map from a numeric domain onto a pixel range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Same scale with the domain extended to round numbers.
    pub fn nice(self, count: usize) -> Self {
        Self {
            domain: nice(self.domain, count),
            ..self
        }
    }

    /// A zero-width domain maps everything to the middle of the range.
    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / span * (r1 - r0)
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }

    /// Label for a tick produced by `ticks(count)`.
    pub fn format_tick(&self, value: f64, count: usize) -> String {
        format_tick(value, tick_step(self.domain.0, self.domain.1, count))
    }
}

/// Linear map from instants onto a pixel range, at millisecond resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    domain: (DateTime<Utc>, DateTime<Utc>),
    range: (f64, f64),
}

impl TimeScale {
    pub fn new(domain: (DateTime<Utc>, DateTime<Utc>), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn apply(&self, t: DateTime<Utc>) -> f64 {
        let linear = LinearScale::new(
            (
                self.domain.0.timestamp_millis() as f64,
                self.domain.1.timestamp_millis() as f64,
            ),
            self.range,
        );
        linear.apply(t.timestamp_millis() as f64)
    }

    pub fn ticks(&self, count: usize) -> Vec<DateTime<Utc>> {
        time_ticks(self.domain.0, self.domain.1, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn linear_maps_inverted_range() {
        let y = LinearScale::new((0.0, 100.0), (270.0, 20.0));
        assert_eq!(y.apply(0.0), 270.0);
        assert_eq!(y.apply(100.0), 20.0);
        assert_eq!(y.apply(50.0), 145.0);
    }

    #[test]
    fn linear_degenerate_domain_is_midpoint() {
        let y = LinearScale::new((5.0, 5.0), (0.0, 10.0));
        assert_eq!(y.apply(5.0), 5.0);
    }

    #[test]
    fn nice_keeps_range() {
        let y = LinearScale::new((0.0, 97.0), (270.0, 20.0)).nice(10);
        assert_eq!(y.domain(), (0.0, 100.0));
        assert_eq!(y.range(), (270.0, 20.0));
        assert_eq!(y.format_tick(20.0, 10), "20");
    }

    #[test]
    fn time_scale_maps_endpoints() {
        let a = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 3, 3, 0, 0, 0).unwrap();
        let mid = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
        let x = TimeScale::new((a, b), (40.0, 470.0));
        assert_eq!(x.apply(a), 40.0);
        assert_eq!(x.apply(b), 470.0);
        assert_eq!(x.apply(mid), 255.0);
    }
}

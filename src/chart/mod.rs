//! Time-series chart geometry.
//!
//! `render` turns dated samples into scales, axis ticks and a monotone path.
//! It is a pure computation: nothing here knows how pixels are drawn. The
//! `svg` module is one such drawing adapter.

pub mod curve;
pub mod scale;
pub mod svg;
pub mod ticks;
pub mod time_ticks;

use chrono::Duration;
use serde::Serialize;

use crate::models::Sample;
pub use curve::{monotone_x, to_path_data, PathSegment, Point};
pub use scale::{LinearScale, TimeScale};

/// Number of ticks requested on the time axis.
pub const X_TICK_COUNT: usize = 7;
/// Number of ticks requested on the value axis.
pub const Y_TICK_COUNT: usize = 10;
/// Label format for time ticks, e.g. "07 Mar".
pub const X_TICK_FORMAT: &str = "%d %b";

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Fixed-size drawing surface with inner margins for the axes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PlotArea {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
}

impl Default for PlotArea {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 300.0,
            margin: Margin {
                top: 20.0,
                right: 30.0,
                bottom: 30.0,
                left: 40.0,
            },
        }
    }
}

impl PlotArea {
    pub fn x_range(&self) -> (f64, f64) {
        (self.margin.left, self.width - self.margin.right)
    }

    /// Inverted so that larger values plot higher.
    pub fn y_range(&self) -> (f64, f64) {
        (self.height - self.margin.bottom, self.margin.top)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

/// Everything needed to draw one chart.
#[derive(Clone, Debug, PartialEq)]
pub struct Chart {
    pub area: PlotArea,
    pub x: TimeScale,
    pub y: LinearScale,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    /// Vertex positions, in timestamp order.
    pub points: Vec<Point>,
    pub path: Vec<PathSegment>,
}

impl Chart {
    pub fn path_data(&self) -> String {
        to_path_data(&self.path)
    }
}

/// Lay out `samples` on `area`.
///
/// Samples with a non-finite value are skipped. Returns `None` when nothing
/// drawable remains, which callers treat as "no chart" rather than an error.
/// The input is left untouched; ordering happens on a private copy.
pub fn render(samples: &[Sample], area: &PlotArea) -> Option<Chart> {
    let mut valid: Vec<Sample> = Vec::with_capacity(samples.len());
    for (index, sample) in samples.iter().enumerate() {
        if sample.is_valid() {
            valid.push(*sample);
        } else {
            tracing::warn!(index, value = sample.value, "skipping sample with non-finite value");
        }
    }
    if valid.is_empty() {
        return None;
    }
    valid.sort_by_key(|s| s.timestamp);

    let first = valid[0].timestamp;
    let last = valid[valid.len() - 1].timestamp;
    let x_domain = if first == last {
        let pad = Duration::days(1);
        (
            first.checked_sub_signed(pad).unwrap_or(first),
            last.checked_add_signed(pad).unwrap_or(last),
        )
    } else {
        (first, last)
    };
    let x = TimeScale::new(x_domain, area.x_range());

    let max = valid.iter().map(|s| s.value).fold(f64::NEG_INFINITY, f64::max);
    let upper = if max > 0.0 { max } else { 1.0 };
    let y = LinearScale::new((0.0, upper), area.y_range()).nice(Y_TICK_COUNT);

    let x_ticks = x
        .ticks(X_TICK_COUNT)
        .into_iter()
        .map(|t| Tick {
            position: x.apply(t),
            label: t.format(X_TICK_FORMAT).to_string(),
        })
        .collect();
    let y_ticks = y
        .ticks(Y_TICK_COUNT)
        .into_iter()
        .map(|v| Tick {
            position: y.apply(v),
            label: y.format_tick(v, Y_TICK_COUNT),
        })
        .collect();

    let points: Vec<Point> = valid
        .iter()
        .map(|s| Point::new(x.apply(s.timestamp), y.apply(s.value)))
        .collect();
    let path = monotone_x(&points);

    Some(Chart {
        area: *area,
        x,
        y,
        x_ticks,
        y_ticks,
        points,
        path,
    })
}

//! Monotone cubic interpolation in x (Steffen's method).
//!
//! Tangents are limited so that no segment leaves the vertical band spanned by
//! its two end points: the curve never overshoots between samples.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    CubicTo { c1: Point, c2: Point, to: Point },
}

fn sign(x: f64) -> f64 {
    if x < 0.0 {
        -1.0
    } else {
        1.0
    }
}

// Tangent at p1 from its two neighbours.
fn interior_slope(p0: Point, p1: Point, p2: Point) -> f64 {
    let h0 = p1.x - p0.x;
    let h1 = p2.x - p1.x;
    let d0 = if h0 != 0.0 { h0 } else if h1 < 0.0 { -0.0 } else { 0.0 };
    let d1 = if h1 != 0.0 { h1 } else if h0 < 0.0 { -0.0 } else { 0.0 };
    let s0 = (p1.y - p0.y) / d0;
    let s1 = (p2.y - p1.y) / d1;
    let p = (s0 * h1 + s1 * h0) / (h0 + h1);
    if s0.is_nan() || s1.is_nan() || p.is_nan() {
        return 0.0;
    }
    let t = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    if t.is_nan() {
        0.0
    } else {
        t
    }
}

// Tangent at an end point, from the segment and the known tangent `t`.
fn end_slope(p0: Point, p1: Point, t: f64) -> f64 {
    let h = p1.x - p0.x;
    if h != 0.0 {
        (3.0 * (p1.y - p0.y) / h - t) / 2.0
    } else {
        t
    }
}

fn cubic(p0: Point, p1: Point, t0: f64, t1: f64) -> PathSegment {
    let dx = (p1.x - p0.x) / 3.0;
    PathSegment::CubicTo {
        c1: Point::new(p0.x + dx, p0.y + dx * t0),
        c2: Point::new(p1.x - dx, p1.y - dx * t1),
        to: p1,
    }
}

/// Path through `points` in the given order. Consecutive duplicates are
/// collapsed; two points give a straight line.
pub fn monotone_x(points: &[Point]) -> Vec<PathSegment> {
    let mut pts: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if pts.last() != Some(p) {
            pts.push(*p);
        }
    }

    match pts.len() {
        0 => Vec::new(),
        1 => vec![PathSegment::MoveTo(pts[0])],
        2 => vec![PathSegment::MoveTo(pts[0]), PathSegment::LineTo(pts[1])],
        n => {
            let mut tangents = vec![0.0; n];
            for i in 1..n - 1 {
                tangents[i] = interior_slope(pts[i - 1], pts[i], pts[i + 1]);
            }
            tangents[0] = end_slope(pts[0], pts[1], tangents[1]);
            tangents[n - 1] = end_slope(pts[n - 2], pts[n - 1], tangents[n - 2]);

            let mut path = Vec::with_capacity(n);
            path.push(PathSegment::MoveTo(pts[0]));
            for i in 0..n - 1 {
                path.push(cubic(pts[i], pts[i + 1], tangents[i], tangents[i + 1]));
            }
            path
        }
    }
}

fn num(v: f64) -> String {
    // Three decimals is well below a pixel; trailing zeros dropped.
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// SVG path data (`d` attribute) for a segment list.
pub fn to_path_data(segments: &[PathSegment]) -> String {
    let mut out = String::new();
    for seg in segments {
        match seg {
            PathSegment::MoveTo(p) => out.push_str(&format!("M{},{}", num(p.x), num(p.y))),
            PathSegment::LineTo(p) => out.push_str(&format!("L{},{}", num(p.x), num(p.y))),
            PathSegment::CubicTo { c1, c2, to } => out.push_str(&format!(
                "C{},{},{},{},{},{}",
                num(c1.x),
                num(c1.y),
                num(c2.x),
                num(c2.y),
                num(to.x),
                num(to.y)
            )),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn within(v: f64, a: f64, b: f64) -> bool {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        v >= lo - 1e-9 && v <= hi + 1e-9
    }

    #[test]
    fn empty_and_single_point() {
        assert!(monotone_x(&[]).is_empty());
        let p = Point::new(1.0, 2.0);
        assert_eq!(monotone_x(&[p]), vec![PathSegment::MoveTo(p)]);
    }

    #[test]
    fn two_points_make_a_line() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 5.0);
        assert_eq!(monotone_x(&[a, b]), vec![PathSegment::MoveTo(a), PathSegment::LineTo(b)]);
        assert_eq!(to_path_data(&monotone_x(&[a, b])), "M0,0L10,5");
    }

    #[test]
    fn coincident_points_are_collapsed() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 5.0);
        assert_eq!(monotone_x(&[a, a, b, b]).len(), 2);
    }

    #[test]
    fn control_points_never_overshoot() {
        let pts: Vec<Point> = [10.0, 20.0, 15.0, 30.0, 25.0, 40.0, 35.0]
            .iter()
            .enumerate()
            .map(|(i, v)| Point::new(40.0 + i as f64 * 70.0, 270.0 - v * 5.0))
            .collect();
        let path = monotone_x(&pts);
        assert_eq!(path.len(), pts.len());
        let mut from = pts[0];
        for seg in &path[1..] {
            match seg {
                PathSegment::CubicTo { c1, c2, to } => {
                    assert!(within(c1.y, from.y, to.y), "{:?} -> {:?}", from, to);
                    assert!(within(c2.y, from.y, to.y), "{:?} -> {:?}", from, to);
                    assert!(c1.x > from.x && c2.x < to.x);
                    from = *to;
                }
                other => panic!("unexpected segment {:?}", other),
            }
        }
    }

    #[test]
    fn local_extremum_has_flat_tangent() {
        let pts = [Point::new(0.0, 0.0), Point::new(1.0, 10.0), Point::new(2.0, 0.0)];
        match monotone_x(&pts)[1] {
            PathSegment::CubicTo { c2, to, .. } => assert_eq!(c2.y, to.y),
            other => panic!("unexpected segment {:?}", other),
        }
    }

    #[test]
    fn straight_line_stays_straight() {
        let pts = [Point::new(0.0, 0.0), Point::new(3.0, 3.0), Point::new(6.0, 6.0)];
        let path = monotone_x(&pts);
        assert_eq!(to_path_data(&path), "M0,0C1,1,2,2,3,3C4,4,5,5,6,6");
    }
}

//! Standalone SVG drawing of a `Chart`, used by the web detail panel and the
//! `instances show --svg` command.

use super::Chart;

pub const LINE_COLOR: &str = "#6366f1";
const TICK_SIZE: f64 = 6.0;

/// Render the chart as a complete `<svg>` element. Every call produces a
/// fresh document; nothing from a previous drawing is reused.
pub fn to_svg(chart: &Chart) -> String {
    let area = &chart.area;
    let mut out = String::new();
    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" class="cpu-chart" font-family="sans-serif" font-size="10">"#,
        w = area.width,
        h = area.height
    ));

    // Bottom axis
    let baseline = area.height - area.margin.bottom;
    let (x0, x1) = chart.x.range();
    out.push_str(&format!(r#"<g class="axis axis-x" transform="translate(0,{})">"#, baseline));
    out.push_str(&format!(r#"<path stroke="currentColor" fill="none" d="M{},{}V0H{}V{}"/>"#, x0, TICK_SIZE, x1, TICK_SIZE));
    for tick in &chart.x_ticks {
        out.push_str(&format!(
            r#"<g class="tick" transform="translate({},0)"><line stroke="currentColor" y2="{}"/><text fill="currentColor" y="{}" dy="0.71em" text-anchor="middle">{}</text></g>"#,
            tick.position,
            TICK_SIZE,
            TICK_SIZE + 3.0,
            escape(&tick.label)
        ));
    }
    out.push_str("</g>");

    // Left axis
    let (y0, y1) = chart.y.range();
    out.push_str(&format!(r#"<g class="axis axis-y" transform="translate({},0)">"#, area.margin.left));
    out.push_str(&format!(r#"<path stroke="currentColor" fill="none" d="M-{},{}H0V{}H-{}"/>"#, TICK_SIZE, y0, y1, TICK_SIZE));
    for tick in &chart.y_ticks {
        out.push_str(&format!(
            r#"<g class="tick" transform="translate(0,{})"><line stroke="currentColor" x2="-{}"/><text fill="currentColor" x="-{}" dy="0.32em" text-anchor="end">{}</text></g>"#,
            tick.position,
            TICK_SIZE,
            TICK_SIZE + 3.0,
            escape(&tick.label)
        ));
    }
    out.push_str("</g>");

    out.push_str(&format!(
        r#"<path class="line" fill="none" stroke="{}" stroke-width="2" d="{}"/>"#,
        LINE_COLOR,
        chart.path_data()
    ));
    for p in &chart.points {
        out.push_str(&format!(r#"<circle cx="{:.3}" cy="{:.3}" r="2.5" fill="{}"/>"#, p.x, p.y, LINE_COLOR));
    }
    out.push_str("</svg>");
    out
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

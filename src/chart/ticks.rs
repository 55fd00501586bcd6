//! Linear tick generation and domain nicing.
//!
//! Steps are powers of ten times 1, 2 or 5, picked so that roughly `count`
//! ticks cover the interval.

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

// (first index, last index, increment). A negative increment means the step
// is `1 / -inc`, which keeps small steps exact.
fn tick_params(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let scale = 10f64.powf(-power) / factor;
        i1 = (start * scale).round();
        i2 = (stop * scale).round();
        if i1 / scale < start {
            i1 += 1.0;
        }
        if i2 / scale > stop {
            i2 -= 1.0;
        }
        inc = -scale;
    } else {
        let size = 10f64.powf(power) * factor;
        i1 = (start / size).round();
        i2 = (stop / size).round();
        if i1 * size < start {
            i1 += 1.0;
        }
        if i2 * size > stop {
            i2 -= 1.0;
        }
        inc = size;
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_params(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Increment in the encoded form used by `tick_params`.
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    tick_params(start, stop, count as f64).2
}

/// Plain step size between ticks, negative for a reversed interval.
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let reverse = stop < start;
    let inc = if reverse {
        tick_increment(stop, start, count)
    } else {
        tick_increment(start, stop, count)
    };
    let step = if inc < 0.0 { 1.0 / -inc } else { inc };
    if reverse {
        -step
    } else {
        step
    }
}

/// Round tick values inside `[start, stop]`, in the direction of the interval.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let reverse = stop < start;
    let (i1, i2, inc) = if reverse {
        tick_params(stop, start, count as f64)
    } else {
        tick_params(start, stop, count as f64)
    };
    if !(i2 >= i1) {
        return Vec::new();
    }
    let n = (i2 - i1 + 1.0) as usize;
    (0..n)
        .map(|i| {
            let k = if reverse { i2 - i as f64 } else { i1 + i as f64 };
            if inc < 0.0 {
                k / -inc
            } else {
                k * inc
            }
        })
        .collect()
}

/// Extend a domain outward to round numbers. Returns the input unchanged when
/// no stable step is found within ten refinements.
pub fn nice(domain: (f64, f64), count: usize) -> (f64, f64) {
    let reversed = domain.1 < domain.0;
    let (mut start, mut stop) = if reversed { (domain.1, domain.0) } else { domain };
    let mut prestep: Option<f64> = None;

    for _ in 0..10 {
        let step = tick_increment(start, stop, count);
        if prestep == Some(step) {
            return if reversed { (stop, start) } else { (start, stop) };
        }
        if step > 0.0 {
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
        } else if step < 0.0 {
            start = (start * step).ceil() / step;
            stop = (stop * step).floor() / step;
        } else {
            break;
        }
        prestep = Some(step);
    }
    domain
}

/// Fixed-point label with just enough decimals for `step`.
pub fn format_tick(value: f64, step: f64) -> String {
    let step = step.abs();
    let decimals = if step > 0.0 && step.is_finite() {
        (-step.log10().floor()).max(0.0) as usize
    } else {
        0
    };
    let label = format!("{:.*}", decimals, value);
    // "-0" reads badly on an axis
    if label.starts_with('-') && label[1..].chars().all(|c| c == '0' || c == '.') {
        label[1..].to_string()
    } else {
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_zero_to_hundred() {
        assert_eq!(
            ticks(0.0, 100.0, 10),
            vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0]
        );
    }

    #[test]
    fn ticks_use_five_steps_when_closer() {
        assert_eq!(ticks(0.0, 40.0, 10), vec![0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0]);
    }

    #[test]
    fn small_steps_stay_exact() {
        assert_eq!(ticks(0.0, 1.0, 10)[3], 0.3);
        assert_eq!(ticks(0.0, 1.0, 5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn reversed_ticks_descend() {
        assert_eq!(ticks(10.0, 0.0, 2), vec![10.0, 5.0, 0.0]);
    }

    #[test]
    fn degenerate_ticks() {
        assert_eq!(ticks(3.0, 3.0, 10), vec![3.0]);
        assert!(ticks(0.0, 1.0, 0).is_empty());
        assert!(ticks(0.0, f64::NAN, 10).is_empty());
    }

    #[test]
    fn nice_rounds_outward() {
        assert_eq!(nice((0.0, 97.3), 10), (0.0, 100.0));
        assert_eq!(nice((0.0, 40.0), 10), (0.0, 40.0));
        assert_eq!(nice((0.0, 0.87), 10), (0.0, 0.9));
        assert_eq!(nice((1.2, 8.7), 10), (1.0, 9.0));
    }

    #[test]
    fn nice_keeps_degenerate_domain() {
        assert_eq!(nice((0.0, 0.0), 10), (0.0, 0.0));
    }

    #[test]
    fn tick_step_sign_follows_direction() {
        assert_eq!(tick_step(0.0, 100.0, 10), 10.0);
        assert_eq!(tick_step(100.0, 0.0, 10), -10.0);
        assert_eq!(tick_step(0.0, 1.0, 10), 0.1);
    }

    #[test]
    fn labels_match_step_precision() {
        assert_eq!(format_tick(40.0, 5.0), "40");
        assert_eq!(format_tick(0.30000000000000004, 0.1), "0.3");
        assert_eq!(format_tick(0.25, 0.05), "0.25");
        assert_eq!(format_tick(-0.0, 1.0), "0");
    }
}

//! Calendar-aligned ticks for a time domain, computed in UTC.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};

use super::ticks::tick_step;

const SECOND_MS: i64 = 1_000;
const MINUTE_MS: i64 = SECOND_MS * 60;
const HOUR_MS: i64 = MINUTE_MS * 60;
const DAY_MS: i64 = HOUR_MS * 24;
const WEEK_MS: i64 = DAY_MS * 7;
const MONTH_MS: i64 = DAY_MS * 30;
const YEAR_MS: i64 = DAY_MS * 365;

// Upper bound on generated ticks, guards against absurd domains.
const MAX_TICKS: usize = 1_000;

/// Interval between consecutive time ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeInterval {
    Millisecond(i64),
    Second(i64),
    Minute(i64),
    Hour(i64),
    /// Days whose day-of-month minus one is a multiple of the step.
    Day(u32),
    /// Sunday-based weeks.
    Week,
    /// Months whose zero-based index is a multiple of the step.
    Month(u32),
    Year(i32),
}

const CANDIDATES: [(TimeInterval, i64); 17] = [
    (TimeInterval::Second(1), SECOND_MS),
    (TimeInterval::Second(5), 5 * SECOND_MS),
    (TimeInterval::Second(15), 15 * SECOND_MS),
    (TimeInterval::Second(30), 30 * SECOND_MS),
    (TimeInterval::Minute(1), MINUTE_MS),
    (TimeInterval::Minute(5), 5 * MINUTE_MS),
    (TimeInterval::Minute(15), 15 * MINUTE_MS),
    (TimeInterval::Minute(30), 30 * MINUTE_MS),
    (TimeInterval::Hour(1), HOUR_MS),
    (TimeInterval::Hour(3), 3 * HOUR_MS),
    (TimeInterval::Hour(6), 6 * HOUR_MS),
    (TimeInterval::Hour(12), 12 * HOUR_MS),
    (TimeInterval::Day(1), DAY_MS),
    (TimeInterval::Day(2), 2 * DAY_MS),
    (TimeInterval::Week, WEEK_MS),
    (TimeInterval::Month(1), MONTH_MS),
    (TimeInterval::Month(3), 3 * MONTH_MS),
];

impl TimeInterval {
    /// Candidate whose length is closest (by ratio) to `span / count`.
    pub fn select(start: DateTime<Utc>, stop: DateTime<Utc>, count: usize) -> TimeInterval {
        let (a, b) = (start.timestamp_millis(), stop.timestamp_millis());
        let target = (b - a).abs() as f64 / count.max(1) as f64;
        let i = CANDIDATES.iter().take_while(|(_, ms)| (*ms as f64) <= target).count();

        if i == CANDIDATES.len() {
            let step = tick_step(a as f64 / YEAR_MS as f64, b as f64 / YEAR_MS as f64, count).abs();
            return TimeInterval::Year((step.round() as i32).max(1));
        }
        if i == 0 {
            let step = tick_step(a as f64, b as f64, count).abs();
            return TimeInterval::Millisecond((step.round() as i64).max(1));
        }
        let (lower, lower_ms) = CANDIDATES[i - 1];
        let (upper, upper_ms) = CANDIDATES[i];
        if target / (lower_ms as f64) < (upper_ms as f64) / target {
            lower
        } else {
            upper
        }
    }

    /// Tick instants inside `[start, stop]`, ascending.
    pub fn range(self, start: DateTime<Utc>, stop: DateTime<Utc>) -> Vec<DateTime<Utc>> {
        let (start, stop) = if stop < start { (stop, start) } else { (start, stop) };
        match self {
            TimeInterval::Millisecond(n) => fixed_range(start, stop, n),
            TimeInterval::Second(n) => fixed_range(start, stop, n * SECOND_MS),
            TimeInterval::Minute(n) => fixed_range(start, stop, n * MINUTE_MS),
            TimeInterval::Hour(n) => fixed_range(start, stop, n * HOUR_MS),
            TimeInterval::Day(n) => day_range(start, stop, |d| d.day0() % n.max(1) == 0),
            TimeInterval::Week => day_range(start, stop, |d| d.weekday() == Weekday::Sun),
            TimeInterval::Month(n) => day_range(start, stop, |d| d.day() == 1 && d.month0() % n.max(1) == 0),
            TimeInterval::Year(n) => {
                let n = n.max(1);
                let mut out = Vec::new();
                let mut year = start.year();
                while out.len() < MAX_TICKS {
                    let Some(t) = midnight(NaiveDate::from_ymd_opt(year, 1, 1)) else { break };
                    if t > stop {
                        break;
                    }
                    if t >= start && year.rem_euclid(n) == 0 {
                        out.push(t);
                    }
                    year += 1;
                }
                out
            }
        }
    }
}

/// Default tick set for a time domain.
pub fn time_ticks(start: DateTime<Utc>, stop: DateTime<Utc>, count: usize) -> Vec<DateTime<Utc>> {
    if count == 0 {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    TimeInterval::select(start, stop, count).range(start, stop)
}

// Multiples of `step_ms` since the epoch; sub-day steps all divide a UTC day.
fn fixed_range(start: DateTime<Utc>, stop: DateTime<Utc>, step_ms: i64) -> Vec<DateTime<Utc>> {
    let step_ms = step_ms.max(1);
    let (a, b) = (start.timestamp_millis(), stop.timestamp_millis());
    let mut t = a.div_euclid(step_ms) * step_ms;
    if t < a {
        t += step_ms;
    }
    let mut out = Vec::new();
    while t <= b && out.len() < MAX_TICKS {
        if let Some(dt) = Utc.timestamp_millis_opt(t).single() {
            out.push(dt);
        }
        t += step_ms;
    }
    out
}

// Midnights in `[start, stop]` whose date passes `keep`.
fn day_range(start: DateTime<Utc>, stop: DateTime<Utc>, keep: impl Fn(NaiveDate) -> bool) -> Vec<DateTime<Utc>> {
    let mut date = start.date_naive();
    if midnight(Some(date)).map_or(false, |t| t < start) {
        let Some(next) = date.succ_opt() else { return Vec::new() };
        date = next;
    }
    let mut out = Vec::new();
    let mut scanned = 0usize;
    while scanned < MAX_TICKS * 31 {
        let Some(t) = midnight(Some(date)) else { break };
        if t > stop || out.len() >= MAX_TICKS {
            break;
        }
        if keep(date) {
            out.push(t);
        }
        let Some(next) = date.succ_opt() else { break };
        date = next;
        scanned += 1;
    }
    out
}

fn midnight(date: Option<NaiveDate>) -> Option<DateTime<Utc>> {
    date.map(|d| Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn week_of_days_ticks_daily() {
        let ticks = time_ticks(at(2024, 3, 1, 0), at(2024, 3, 7, 0), 7);
        assert_eq!(ticks.len(), 7);
        assert_eq!(ticks[0], at(2024, 3, 1, 0));
        assert_eq!(ticks[6], at(2024, 3, 7, 0));
    }

    #[test]
    fn two_day_domain_uses_six_hour_steps() {
        assert_eq!(TimeInterval::select(at(2024, 3, 6, 0), at(2024, 3, 8, 0), 7), TimeInterval::Hour(6));
        let ticks = time_ticks(at(2024, 3, 6, 0), at(2024, 3, 8, 0), 7);
        assert_eq!(ticks.len(), 9);
        assert_eq!(ticks[1], at(2024, 3, 6, 6));
    }

    #[test]
    fn month_domain_uses_weeks_on_sundays() {
        let interval = TimeInterval::select(at(2024, 3, 1, 0), at(2024, 4, 30, 0), 7);
        assert_eq!(interval, TimeInterval::Week);
        let ticks = interval.range(at(2024, 3, 1, 0), at(2024, 4, 30, 0));
        assert!(ticks.iter().all(|t| t.weekday() == Weekday::Sun));
        assert_eq!(ticks[0], at(2024, 3, 3, 0));
    }

    #[test]
    fn every_second_day_counts_from_first_of_month() {
        let ticks = TimeInterval::Day(2).range(at(2024, 3, 2, 0), at(2024, 3, 8, 0));
        let days: Vec<u32> = ticks.iter().map(|t| t.day()).collect();
        assert_eq!(days, vec![3, 5, 7]);
    }

    #[test]
    fn long_domains_use_years() {
        let interval = TimeInterval::select(at(2000, 1, 1, 0), at(2030, 1, 1, 0), 7);
        assert_eq!(interval, TimeInterval::Year(5));
        let ticks = interval.range(at(2000, 1, 1, 0), at(2030, 1, 1, 0));
        assert_eq!(ticks.first().map(|t| t.year()), Some(2000));
        assert_eq!(ticks.len(), 7);
    }

    #[test]
    fn tick_off_midnight_start_is_skipped() {
        let ticks = TimeInterval::Day(1).range(at(2024, 3, 1, 12), at(2024, 3, 3, 0));
        assert_eq!(ticks, vec![at(2024, 3, 2, 0), at(2024, 3, 3, 0)]);
    }

    #[test]
    fn equal_bounds_yield_single_tick() {
        assert_eq!(time_ticks(at(2024, 1, 1, 0), at(2024, 1, 1, 0), 7), vec![at(2024, 1, 1, 0)]);
    }
}

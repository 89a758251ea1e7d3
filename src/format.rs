//! Number formatting and axis tick generation.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// Format a number the way a script runtime prints it: integers without a
/// fractional part, everything else with the shortest round-trip digits.
pub fn format_plain(n: f64) -> String {
    if n == 0.0 {
        // Collapse -0
        return "0".to_string();
    }
    format!("{}", n)
}

/// Compact human-readable form with `K` / `M` suffixes.
///
/// Magnitudes below 1,000 are printed unchanged, below 1,000,000 they are
/// divided by 1,000 and get one decimal plus `K`, anything larger is divided
/// by 1,000,000 and gets one decimal plus `M`.
///
/// ```
/// use progress_charts::format::format_compact;
/// assert_eq!(format_compact(500.0), "500");
/// assert_eq!(format_compact(45_000.0), "45.0K");
/// assert_eq!(format_compact(2_000_000.0), "2.0M");
/// ```
pub fn format_compact(n: f64) -> String {
    let abs = n.abs();
    if abs < 1_000.0 {
        format_plain(n)
    } else if abs < 1_000_000.0 {
        format!("{}K", format_fixed(n / 1_000.0, 1))
    } else {
        format!("{}M", format_fixed(n / 1_000_000.0, 1))
    }
}

/// Fixed number of decimals (`1.2345, 2` → `"1.23"`).
///
/// Ties round away from zero (`6.25, 1` → `"6.3"`), unlike `{:.N}`, which
/// rounds an exact binary tie to even.
pub fn format_fixed(n: f64, digits: usize) -> String {
    format!("{:.*}", digits, round_half_away(n, digits))
}

fn round_half_away(n: f64, digits: usize) -> f64 {
    let scale = 10f64.powi(digits as i32);
    let scaled = n * scale;
    if scaled.is_finite() {
        scaled.round() / scale
    } else {
        n
    }
}

/// en-US grouping: thousands separated by commas, at most three fraction
/// digits with trailing zeros dropped.
pub fn format_grouped(n: f64) -> String {
    let rounded = format_fixed(n.abs(), 3);
    let (int_part, frac_part) = match rounded.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (rounded.as_str(), ""),
    };

    let mut out = String::with_capacity(rounded.len() + int_part.len() / 3 + 1);
    let is_zero = int_part.bytes().all(|b| b == b'0') && frac_part.is_empty();
    if n < 0.0 && !is_zero {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// ISO calendar date, `2024-01-02`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Short month and year, `Jan 2024`.
pub fn format_month_year(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

// ============================================================================
// Axis ticks
// ============================================================================

/// Evenly spaced, round-numbered axis scale starting at zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TickSet(Vec<f64>);

impl TickSet {
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Largest tick; the top of the axis.
    pub fn max(&self) -> f64 {
        self.0.last().copied().unwrap_or(0.0)
    }

    /// Distance between consecutive ticks (zero for a single tick).
    pub fn step(&self) -> f64 {
        match self.0.as_slice() {
            [first, second, ..] => second - first,
            _ => 0.0,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }
}

impl fmt::Display for TickSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tick) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&format_plain(*tick))?;
        }
        Ok(())
    }
}

/// Default number of ticks on a value axis.
pub const DEFAULT_TICK_COUNT: usize = 5;

/// "Nice number" axis ticks for data peaking at `max_value`.
///
/// The raw step `max / (count - 1)` is rounded up to the next multiple of its
/// power of ten, so the last tick is always `>= max_value`. A zero (or
/// negative, or non-finite) maximum yields the single tick `[0]`. Counts
/// below two are raised to two.
pub fn compute_axis_ticks(max_value: f64, tick_count: usize) -> TickSet {
    if !max_value.is_finite() || max_value <= 0.0 {
        return TickSet(vec![0.0]);
    }

    let tick_count = tick_count.max(2);
    let rough_step = max_value / (tick_count - 1) as f64;
    let magnitude = 10f64.powf(rough_step.log10().floor());
    let step = (rough_step / magnitude).ceil() * magnitude;

    TickSet((0..tick_count).map(|i| step * i as f64).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn compact_small_numbers_unchanged() {
        assert_eq!(format_compact(500.0), "500");
        assert_eq!(format_compact(0.0), "0");
        assert_eq!(format_compact(999.0), "999");
    }

    #[test]
    fn compact_thousands() {
        assert_eq!(format_compact(1_500.0), "1.5K");
        assert_eq!(format_compact(45_000.0), "45.0K");
    }

    #[test]
    fn compact_millions() {
        assert_eq!(format_compact(1_500_000.0), "1.5M");
        assert_eq!(format_compact(2_000_000.0), "2.0M");
    }

    #[test]
    fn compact_ties_round_away_from_zero() {
        assert_eq!(format_compact(1_250.0), "1.3K");
        assert_eq!(format_compact(2_250.0), "2.3K");
        assert_eq!(format_compact(1_250_000.0), "1.3M");
        assert_eq!(format_compact(-1_250.0), "-1.3K");
    }

    #[test]
    fn compact_uses_magnitude_for_negatives() {
        assert_eq!(format_compact(-1_500.0), "-1.5K");
        assert_eq!(format_compact(-20.0), "-20");
    }

    #[test]
    fn compact_axis_labels() {
        let labels: Vec<String> = compute_axis_ticks(706_055.0, 5)
            .iter()
            .map(format_compact)
            .collect();
        assert_snapshot!(labels.join(" | "), @"0 | 200.0K | 400.0K | 600.0K | 800.0K");
    }

    #[test]
    fn ticks_are_nice_round_numbers() {
        let ticks = compute_axis_ticks(706_055.0, 5);
        assert_eq!(ticks.len(), 5);
        assert_eq!(ticks.values()[0], 0.0);
        assert!(ticks.max() >= 706_055.0);

        let step = ticks.step();
        for pair in ticks.values().windows(2) {
            assert_eq!(pair[1] - pair[0], step);
        }
        assert_snapshot!(ticks.to_string(), @"0, 200000, 400000, 600000, 800000");
    }

    #[test]
    fn ticks_for_zero_max() {
        let ticks = compute_axis_ticks(0.0, DEFAULT_TICK_COUNT);
        assert_eq!(ticks.values(), &[0.0]);
        assert_eq!(ticks.max(), 0.0);
        assert_eq!(ticks.step(), 0.0);
    }

    #[test]
    fn ticks_for_negative_or_nan_max() {
        assert_eq!(compute_axis_ticks(-5.0, 5).values(), &[0.0]);
        assert_eq!(compute_axis_ticks(f64::NAN, 5).values(), &[0.0]);
    }

    #[test]
    fn ticks_exact_power_of_ten_step() {
        assert_snapshot!(compute_axis_ticks(400.0, 5).to_string(), @"0, 100, 200, 300, 400");
    }

    #[test]
    fn ticks_honor_requested_count() {
        let ticks = compute_axis_ticks(1_000.0, 3);
        assert_eq!(ticks.len(), 3);
        assert_snapshot!(ticks.to_string(), @"0, 500, 1000");
    }

    #[test]
    fn ticks_single_count_is_raised_to_two() {
        let ticks = compute_axis_ticks(70.0, 1);
        assert_eq!(ticks.len(), 2);
        assert!(ticks.max() >= 70.0);
    }

    #[test]
    fn grouped_thousands() {
        assert_eq!(format_grouped(0.0), "0");
        assert_eq!(format_grouped(999.0), "999");
        assert_eq!(format_grouped(1_234.0), "1,234");
        assert_eq!(format_grouped(1_234_567.0), "1,234,567");
        assert_eq!(format_grouped(100_000.0), "100,000");
    }

    #[test]
    fn grouped_fractions() {
        assert_eq!(format_grouped(1_234.5), "1,234.5");
        assert_eq!(format_grouped(0.1234), "0.123");
        assert_eq!(format_grouped(-9_876.25), "-9,876.25");
    }

    #[test]
    fn fixed_decimals() {
        assert_eq!(format_fixed(1.23456, 2), "1.23");
        assert_eq!(format_fixed(70.0, 1), "70.0");
    }

    #[test]
    fn fixed_ties_round_away_from_zero() {
        assert_eq!(format_fixed(6.25, 1), "6.3");
        assert_eq!(format_fixed(1.125, 2), "1.13");
        assert_eq!(format_fixed(0.125, 2), "0.13");
        assert_eq!(format_fixed(-6.25, 1), "-6.3");
    }

    #[test]
    fn grouped_ties_round_away_from_zero() {
        assert_eq!(format_grouped(1_234.0625), "1,234.063");
    }

    #[test]
    fn dates() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(format_date(date), "2024-01-02");
        assert_eq!(format_month_year(date), "Jan 2024");
    }
}

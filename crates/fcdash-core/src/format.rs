//! Pure presentation transforms applied to query results.

use crate::view::SeriesPoint;

/// Team worth is stored in units of 1,000.
pub const TEAM_WORTH_SCALE: i128 = 1_000;

const MAGNITUDE_UNITS: [(i128, &str); 3] = [
    (1_000_000_000_000, "조"),
    (100_000_000, "억"),
    (10_000, "만"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MagnitudeStyle {
    /// Every non-zero unit group: `123조 4,567억 8,901만`.
    #[default]
    Full,
    /// Largest unit with one decimal: `123.4조`.
    Compact,
}

/// Format a stored team worth in Korean magnitude units.
pub fn format_magnitude(value: i64, style: MagnitudeStyle) -> String {
    let scaled = i128::from(value) * TEAM_WORTH_SCALE;
    let sign = if scaled < 0 { "-" } else { "" };
    let amount = scaled.abs();

    let Some(&(largest, largest_unit)) = MAGNITUDE_UNITS.iter().find(|(unit, _)| amount >= *unit)
    else {
        return format!("{sign}{}", group_thousands(amount));
    };

    match style {
        MagnitudeStyle::Compact => {
            let tenths = amount / (largest / 10);
            format!(
                "{sign}{}.{}{largest_unit}",
                group_thousands(tenths / 10),
                tenths % 10
            )
        }
        MagnitudeStyle::Full => {
            let mut remainder = amount;
            let mut groups = Vec::new();
            for (unit, label) in MAGNITUDE_UNITS {
                let count = remainder / unit;
                remainder %= unit;
                if count > 0 {
                    groups.push(format!("{}{label}", group_thousands(count)));
                }
            }
            format!("{sign}{}", groups.join(" "))
        }
    }
}

/// `1234567` → `"1,234,567"`.
pub fn format_thousands(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    format!("{sign}{}", group_thousands(i128::from(value).abs()))
}

fn group_thousands(value: i128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}

/// One decimal at most: `80.0` → `"80%"`, `67.5` → `"67.5%"`.
pub fn format_percent(value: f64) -> String {
    format!("{}%", format_decimal(value))
}

/// One decimal at most, without a trailing `.0`.
pub fn format_decimal(value: f64) -> String {
    let text = format!("{value:.1}");
    match text.strip_suffix(".0") {
        Some("-0") => String::from("0"),
        Some(whole) => whole.to_string(),
        None => text,
    }
}

/// `"80% (40|5|5)"`.
pub fn format_win_record(rate: f64, wins: i64, draws: i64, losses: i64) -> String {
    format!("{} ({wins}|{draws}|{losses})", format_percent(rate))
}

/// Keep the `n` largest points and fold the rest into one `rest_label` point.
///
/// Ties keep their input order. Nothing is folded when at most `n` points
/// are given.
pub fn top_n_with_rest(points: Vec<SeriesPoint>, n: usize, rest_label: &str) -> Vec<SeriesPoint> {
    let mut points = points;
    points.sort_by(|left, right| right.value.total_cmp(&left.value));

    if points.len() <= n {
        return points;
    }

    let rest: f64 = points.split_off(n).iter().map(|point| point.value).sum();
    points.push(SeriesPoint::new(rest_label, rest));
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_magnitude_groups_korean_units() {
        assert_eq!(
            format_magnitude(123_456_789_012, MagnitudeStyle::Full),
            "123조 4,567억 8,901만"
        );
        assert_eq!(format_magnitude(0, MagnitudeStyle::Full), "0");
    }

    #[test]
    fn zero_groups_are_omitted() {
        // 2조 exactly, then 2조 30만
        assert_eq!(
            format_magnitude(2_000_000_000, MagnitudeStyle::Full),
            "2조"
        );
        assert_eq!(
            format_magnitude(2_000_000_300, MagnitudeStyle::Full),
            "2조 30만"
        );
    }

    #[test]
    fn small_values_fall_back_to_plain_number() {
        assert_eq!(format_magnitude(9, MagnitudeStyle::Full), "9,000");
        assert_eq!(format_magnitude(9, MagnitudeStyle::Compact), "9,000");
        assert_eq!(format_magnitude(-12, MagnitudeStyle::Full), "-1만");
    }

    #[test]
    fn compact_magnitude_keeps_one_truncated_decimal() {
        assert_eq!(
            format_magnitude(123_456_789_012, MagnitudeStyle::Compact),
            "123.4조"
        );
        assert_eq!(
            format_magnitude(250_000, MagnitudeStyle::Compact),
            "2.5억"
        );
        assert_eq!(format_magnitude(-50, MagnitudeStyle::Compact), "-5.0만");
    }

    #[test]
    fn thousands_and_percent() {
        assert_eq!(format_thousands(15_000), "15,000");
        assert_eq!(format_thousands(-1_234_567), "-1,234,567");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_percent(80.0), "80%");
        assert_eq!(format_percent(67.5), "67.5%");
        assert_eq!(format_percent(66.666), "66.7%");
        assert_eq!(format_decimal(-0.01), "0");
    }

    #[test]
    fn win_record_matches_leaderboard_style() {
        assert_eq!(format_win_record(80.0, 40, 5, 5), "80% (40|5|5)");
    }

    #[test]
    fn top_n_folds_remainder() {
        let points = vec![
            SeriesPoint::new("리버풀", 15.0),
            SeriesPoint::new("레알 마드리드", 30.0),
            SeriesPoint::new("바르셀로나", 10.0),
            SeriesPoint::new("맨체스터 시티", 25.0),
        ];

        let top = top_n_with_rest(points, 2, "기타");

        let labels: Vec<_> = top.iter().map(|point| point.label.as_str()).collect();
        assert_eq!(labels, ["레알 마드리드", "맨체스터 시티", "기타"]);
        assert_eq!(top[2].value, 25.0);
    }

    #[test]
    fn top_n_without_remainder_only_sorts() {
        let points = vec![SeriesPoint::new("a", 1.0), SeriesPoint::new("b", 2.0)];

        let top = top_n_with_rest(points, 5, "기타");

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].label, "b");
    }
}

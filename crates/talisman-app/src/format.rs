// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::Date;
use time::macros::format_description;

use crate::carc::adjustment_description;

pub const MISSING: &str = "N/A";

fn group_thousands(digits: u64) -> String {
    let raw = digits.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (index, ch) in raw.chars().enumerate() {
        if index > 0 && (raw.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `$1,234.56`, with a leading `-` for negative amounts.
pub fn format_currency(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let absolute = cents.unsigned_abs();
    format!(
        "{sign}${}.{:02}",
        group_thousands(absolute / 100),
        absolute % 100
    )
}

/// Rounds to whole dollars: `$1,235`.
pub fn format_currency_whole(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let absolute = cents.unsigned_abs();
    let dollars = (absolute + 50) / 100;
    format!("{sign}${}", group_thousands(dollars))
}

pub fn format_compact_currency(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let dollars = (cents.unsigned_abs() as f64) / 100.0;
    if dollars < 1000.0 {
        return format!("{sign}${dollars:.0}");
    }

    let (value, suffix) = if dollars < 1_000_000.0 {
        (dollars / 1000.0, "K")
    } else if dollars < 1_000_000_000.0 {
        (dollars / 1_000_000.0, "M")
    } else {
        (dollars / 1_000_000_000.0, "B")
    };

    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract().abs() < f64::EPSILON {
        format!("{sign}${rounded:.0}{suffix}")
    } else {
        format!("{sign}${rounded:.1}{suffix}")
    }
}

pub fn format_count(value: u64) -> String {
    group_thousands(value)
}

/// Whole numbers print without decimals; others are rounded to two places.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        return format!("{value:.0}");
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded}")
}

/// `0.123` becomes `12.3%`.
pub fn format_percent_fraction(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// `12.5` becomes `12.5%`.
pub fn format_percent_points(points: f64) -> String {
    format!("{}%", format_number(points))
}

fn parse_iso_date(raw: &str) -> Option<Date> {
    let day = raw.trim().get(..10)?;
    Date::parse(day, format_description!("[year]-[month]-[day]")).ok()
}

/// `2023-01-05` becomes `01/05/23`. Missing or unparseable input yields `N/A`.
pub fn format_short_date(raw: Option<&str>) -> String {
    raw.and_then(parse_iso_date)
        .and_then(|date| {
            date.format(format_description!(
                "[month]/[day]/[year repr:last_two]"
            ))
            .ok()
        })
        .unwrap_or_else(|| MISSING.to_owned())
}

pub fn format_long_date(raw: Option<&str>) -> String {
    raw.and_then(parse_iso_date)
        .and_then(|date| {
            date.format(format_description!("[month repr:short] [day], [year]"))
                .ok()
        })
        .unwrap_or_else(|| MISSING.to_owned())
}

pub fn format_trend(delta: Option<f64>) -> String {
    match delta {
        Some(value) if value > 0.0 => format!("↑ {}", format_number(value)),
        Some(value) if value < 0.0 => format!("↓ {}", format_number(value.abs())),
        Some(_) | None => "–".to_owned(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjustment {
    pub code: String,
    pub amount: Option<String>,
    pub description: &'static str,
}

/// Splits `CO-45: 12.00, PR-3: 5.00` into coded adjustments with their
/// descriptions resolved.
pub fn parse_adjustments(raw: &str) -> Vec<Adjustment> {
    raw.split(", ")
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (code, amount) = match part.split_once(':') {
                Some((code, amount)) => (code.trim(), Some(amount.trim().to_owned())),
                None => (part, None),
            };
            Adjustment {
                code: code.to_owned(),
                amount: amount.filter(|value| !value.is_empty()),
                description: adjustment_description(code),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        format_compact_currency, format_count, format_currency, format_currency_whole,
        format_long_date, format_number, format_percent_fraction, format_percent_points,
        format_short_date, format_trend, parse_adjustments,
    };

    #[test]
    fn currency_uses_two_decimals_and_grouping() {
        assert_eq!(format_currency(10_000), "$100.00");
        assert_eq!(format_currency(123_456_789), "$1,234,567.89");
        assert_eq!(format_currency(-505), "-$5.05");
        assert_eq!(format_currency(0), "$0.00");
    }

    #[test]
    fn whole_currency_rounds_half_up() {
        assert_eq!(format_currency_whole(123_450), "$1,235");
        assert_eq!(format_currency_whole(99), "$1");
    }

    #[test]
    fn compact_currency_scales() {
        assert_eq!(format_compact_currency(50_000), "$500");
        assert_eq!(format_compact_currency(125_000_00), "$125K");
        assert_eq!(format_compact_currency(1_250_000_00), "$1.3M");
    }

    #[test]
    fn counts_and_numbers() {
        assert_eq!(format_count(1_234_567), "1,234,567");
        assert_eq!(format_count(12), "12");
        assert_eq!(format_number(98.0), "98");
        assert_eq!(format_number(0.1 + 0.2), "0.3");
    }

    #[test]
    fn percentages() {
        assert_eq!(format_percent_fraction(0.123), "12.3%");
        assert_eq!(format_percent_fraction(0.0), "0.0%");
        assert_eq!(format_percent_points(92.5), "92.5%");
        assert_eq!(format_percent_points(98.0), "98%");
    }

    #[test]
    fn dates_format_or_fall_back() {
        assert_eq!(format_short_date(Some("2023-01-05")), "01/05/23");
        assert_eq!(format_short_date(Some("2023-01-05T10:00:00")), "01/05/23");
        assert_eq!(format_short_date(Some("N/A")), "N/A");
        assert_eq!(format_short_date(None), "N/A");
        assert_eq!(format_long_date(Some("2023-01-05")), "Jan 05, 2023");
    }

    #[test]
    fn trend_arrows() {
        assert_eq!(format_trend(Some(1.5)), "↑ 1.5");
        assert_eq!(format_trend(Some(-2.0)), "↓ 2");
        assert_eq!(format_trend(Some(0.0)), "–");
        assert_eq!(format_trend(None), "–");
    }

    #[test]
    fn adjustments_split_into_codes_amounts_and_descriptions() {
        let parsed = parse_adjustments("CO-45: 12.00, PR-2: 5.00, N1");
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].code, "CO-45");
        assert_eq!(parsed[0].amount.as_deref(), Some("12.00"));
        assert_eq!(
            parsed[0].description,
            "Charge exceeds fee schedule/maximum allowable or contracted/legislated fee arrangement"
        );
        assert_eq!(parsed[1].description, "Coinsurance Amount");
        assert_eq!(parsed[2].amount, None);
        assert!(parse_adjustments("").is_empty());
    }
}

//! Display formatting for amounts, dates and identifiers (en-IN conventions).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Group an unsigned digit string the Indian way: `12,34,567`.
fn group_indian(int_part: &str) -> String {
    let len = int_part.len();
    if len <= 3 {
        return int_part.to_string();
    }
    let (head, last3) = int_part.split_at(len - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), last3)
}

/// Round half away from zero and render with exactly `decimals` places,
/// grouped Indian-style. Returns `(is_negative, body)`.
fn grouped(value: Decimal, decimals: u32) -> (bool, String) {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.*}", decimals as usize, rounded.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };
    let mut body = group_indian(int_part);
    if let Some(frac) = frac_part {
        body.push('.');
        body.push_str(frac);
    }
    (negative, body)
}

/// Format an amount in Indian Rupees: `₹1,23,456.70`. Missing amounts
/// render as `₹0.00`.
pub fn format_currency(amount: Option<Decimal>) -> String {
    let Some(amount) = amount else {
        return "₹0.00".to_string();
    };
    let (negative, body) = grouped(amount, 2);
    if negative {
        format!("-₹{body}")
    } else {
        format!("₹{body}")
    }
}

/// Format a number with Indian digit grouping and a fixed number of decimals.
pub fn format_number(value: Option<Decimal>, decimals: u32) -> String {
    let Some(value) = value else {
        return "0".to_string();
    };
    let (negative, body) = grouped(value, decimals);
    if negative { format!("-{body}") } else { body }
}

/// Parse a backend date or timestamp (`YYYY-MM-DD`, RFC 3339, or a naive
/// ISO timestamp).
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Some(ts.with_timezone(&Utc).date_naive());
    }
    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|ts| ts.date())
}

/// Format a date for display: `05 Mar 2024`. Empty or unparseable input
/// renders as `-`.
pub fn format_date(input: &str) -> String {
    parse_date(input)
        .map(|d| d.format("%d %b %Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Format a date for an input field: `YYYY-MM-DD`, or empty when invalid.
pub fn format_date_for_input(input: &str) -> String {
    parse_date(input)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Today's date (UTC).
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Upper-cased GSTIN for display, `-` when absent.
pub fn format_gstin(gstin: Option<&str>) -> String {
    match gstin.map(str::trim) {
        Some(g) if !g.is_empty() => g.to_uppercase(),
        _ => "-".to_string(),
    }
}

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];
const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

fn below_thousand(n: u64) -> String {
    match n {
        0 => String::new(),
        1..=19 => ONES[n as usize].to_string(),
        20..=99 => {
            let mut s = TENS[(n / 10) as usize].to_string();
            if n % 10 != 0 {
                s.push(' ');
                s.push_str(ONES[(n % 10) as usize]);
            }
            s
        }
        _ => {
            let mut s = format!("{} Hundred", ONES[(n / 100) as usize]);
            if n % 100 != 0 {
                s.push(' ');
                s.push_str(&below_thousand(n % 100));
            }
            s
        }
    }
}

/// Crore / lakh / thousand decomposition. Amounts of a thousand crore and
/// above recurse on the crore count.
fn integer_words(mut n: u64) -> String {
    let mut parts: Vec<String> = Vec::new();
    if n >= 10_000_000 {
        parts.push(format!("{} Crore", integer_words(n / 10_000_000)));
        n %= 10_000_000;
    }
    if n >= 100_000 {
        parts.push(format!("{} Lakh", below_thousand(n / 100_000)));
        n %= 100_000;
    }
    if n >= 1_000 {
        parts.push(format!("{} Thousand", below_thousand(n / 1_000)));
        n %= 1_000;
    }
    if n > 0 {
        parts.push(below_thousand(n));
    }
    parts.join(" ")
}

/// Amount in words using the Indian numbering system, as printed on tax
/// invoices: `One Lakh Twenty Thousand Rupees and Fifty Paise Only`.
pub fn amount_in_words(amount: Decimal) -> String {
    let amount = amount
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let rupees = amount.trunc();
    let paise = ((amount - rupees) * Decimal::ONE_HUNDRED).to_u64().unwrap_or(0);
    let rupees = rupees.to_u64().unwrap_or(0);

    if rupees == 0 && paise == 0 {
        return "Zero Rupees Only".to_string();
    }

    let mut out = if rupees == 0 {
        "Zero Rupees".to_string()
    } else {
        format!("{} Rupees", integer_words(rupees))
    };
    if paise > 0 {
        out.push_str(&format!(" and {} Paise", below_thousand(paise)));
    }
    out.push_str(" Only");
    out
}

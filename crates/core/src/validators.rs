//! Field validators for form input.
//!
//! Every validator returns `None` when the value passes and `Some(message)`
//! otherwise. Apart from [`required`], an empty value always passes so that
//! optional fields can share the same rule lists.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::FieldErrors;
use crate::gstin::GSTIN_RE;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static PAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").expect("valid PAN regex"));
static HSN_SAC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4,8}$").expect("valid HSN/SAC regex"));
static IFSC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{4}0[A-Z0-9]{6}$").expect("valid IFSC regex"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("valid phone regex"));
static PINCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]{5}$").expect("valid pincode regex"));

/// A single validation rule applied to a raw field value.
pub type Rule<'a> = Box<dyn Fn(&str) -> Option<String> + 'a>;

pub fn required(value: &str, field: &str) -> Option<String> {
    value.is_empty().then(|| format!("{field} is required"))
}

pub fn min_length(value: &str, min: usize, field: &str) -> Option<String> {
    let len = value.chars().count();
    (len > 0 && len < min).then(|| format!("{field} must be at least {min} characters"))
}

pub fn max_length(value: &str, max: usize, field: &str) -> Option<String> {
    (value.chars().count() > max).then(|| format!("{field} must be at most {max} characters"))
}

pub fn email(value: &str, field: &str) -> Option<String> {
    if value.is_empty() || EMAIL_RE.is_match(value) {
        return None;
    }
    Some(format!("{field} is not valid"))
}

pub fn gstin(value: &str, field: &str) -> Option<String> {
    if value.is_empty() || GSTIN_RE.is_match(&value.to_uppercase()) {
        return None;
    }
    Some(format!("{field} format is invalid"))
}

pub fn pan(value: &str, field: &str) -> Option<String> {
    if value.is_empty() || PAN_RE.is_match(&value.to_uppercase()) {
        return None;
    }
    Some(format!("{field} format is invalid"))
}

pub fn hsn_sac(value: &str, field: &str) -> Option<String> {
    if value.is_empty() || HSN_SAC_RE.is_match(value) {
        return None;
    }
    Some(format!("{field} must be 4-8 digits"))
}

pub fn ifsc(value: &str, field: &str) -> Option<String> {
    if value.is_empty() || IFSC_RE.is_match(&value.to_uppercase()) {
        return None;
    }
    Some(format!("{field} format is invalid"))
}

pub fn positive_number(value: &str, field: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    match value.trim().parse::<f64>() {
        Ok(n) if !n.is_nan() && n >= 0.0 => None,
        _ => Some(format!("{field} must be a positive number")),
    }
}

/// Indian mobile number; formatting characters are stripped before matching.
pub fn phone(value: &str, field: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    if PHONE_RE.is_match(&digits) {
        None
    } else {
        Some(format!("{field} must be a valid 10-digit Indian mobile number"))
    }
}

pub fn pincode(value: &str, field: &str) -> Option<String> {
    if value.is_empty() || PINCODE_RE.is_match(value) {
        return None;
    }
    Some(format!("{field} must be a valid 6-digit pincode"))
}

pub fn account_number(value: &str, field: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    let len = value.chars().count();
    if !(9..=18).contains(&len) {
        return Some(format!("{field} must be between 9-18 digits"));
    }
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Some(format!("{field} must contain only digits"));
    }
    None
}

/// Run `rules` in order and return the first failure.
pub fn validate(value: &str, rules: &[Rule<'_>]) -> Option<String> {
    rules.iter().find_map(|rule| rule(value))
}

/// Validate every field that has rules. Fields missing from `form` are
/// validated as empty strings.
pub fn validate_form(form: &[(&str, &str)], rules: &[(&str, Vec<Rule<'_>>)]) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for (field, field_rules) in rules {
        let value = form
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, v)| *v)
            .unwrap_or("");
        errors.check(field, validate(value, field_rules));
    }
    errors
}

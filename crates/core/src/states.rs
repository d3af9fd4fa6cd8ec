//! Indian states and union territories keyed by their GST state code.

/// `(code, name)` pairs, ordered by code.
pub const INDIAN_STATES: &[(&str, &str)] = &[
    ("01", "Jammu and Kashmir"),
    ("02", "Himachal Pradesh"),
    ("03", "Punjab"),
    ("04", "Chandigarh"),
    ("05", "Uttarakhand"),
    ("06", "Haryana"),
    ("07", "Delhi"),
    ("08", "Rajasthan"),
    ("09", "Uttar Pradesh"),
    ("10", "Bihar"),
    ("11", "Sikkim"),
    ("12", "Arunachal Pradesh"),
    ("13", "Nagaland"),
    ("14", "Manipur"),
    ("15", "Mizoram"),
    ("16", "Tripura"),
    ("17", "Meghalaya"),
    ("18", "Assam"),
    ("19", "West Bengal"),
    ("20", "Jharkhand"),
    ("21", "Odisha"),
    ("22", "Chhattisgarh"),
    ("23", "Madhya Pradesh"),
    ("24", "Gujarat"),
    ("25", "Daman and Diu"),
    ("26", "Dadra and Nagar Haveli"),
    ("27", "Maharashtra"),
    ("28", "Andhra Pradesh (Old)"),
    ("29", "Karnataka"),
    ("30", "Goa"),
    ("31", "Lakshadweep"),
    ("32", "Kerala"),
    ("33", "Tamil Nadu"),
    ("34", "Puducherry"),
    ("35", "Andaman and Nicobar Islands"),
    ("36", "Telangana"),
    ("37", "Andhra Pradesh"),
    ("38", "Ladakh"),
];

/// State name for a two-digit GST state code.
pub fn state_name(code: &str) -> Option<&'static str> {
    INDIAN_STATES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// State name derived from the first two characters of a GSTIN.
///
/// Only the prefix is inspected; the rest of the GSTIN is not validated.
pub fn state_from_gstin(gstin: &str) -> Option<&'static str> {
    let code = gstin.trim().get(..2)?;
    state_name(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_states_by_code() {
        assert_eq!(state_name("27"), Some("Maharashtra"));
        assert_eq!(state_name("38"), Some("Ladakh"));
        assert_eq!(state_name("99"), None);
    }

    #[test]
    fn state_from_gstin_uses_prefix() {
        assert_eq!(state_from_gstin("29ABCDE1234F1Z5"), Some("Karnataka"));
        assert_eq!(state_from_gstin("2"), None);
        assert_eq!(state_from_gstin(""), None);
    }
}

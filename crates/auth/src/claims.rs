use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT payload segments are base64url; some issuers pad them, most don't.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Claims the client reads from an access token.
///
/// The signature is never checked here; the backend does that on every
/// request. The client only needs `exp` to decide whether a stored session is
/// still worth presenting.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JwtClaims {
    #[serde(default)]
    pub sub: Option<String>,

    /// Expiry, seconds since the Unix epoch.
    #[serde(default)]
    pub exp: Option<i64>,

    #[serde(default)]
    pub token_type: Option<String>,
}

impl JwtClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

#[derive(Debug, Error)]
pub enum ClaimsError {
    #[error("token is not a three-part JWT")]
    Malformed,

    #[error("token payload is not base64url: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("token payload is not a JSON claims object: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode the payload segment of a JWT without verifying it.
pub fn decode_claims(token: &str) -> Result<JwtClaims, ClaimsError> {
    let mut parts = token.split('.');
    let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_), None) if !payload.is_empty() => payload,
        _ => return Err(ClaimsError::Malformed),
    };
    let bytes = PAYLOAD_ENGINE.decode(payload)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Whether `token` is a decodable JWT that has not expired at `now`.
///
/// Undecodable tokens and tokens without an `exp` claim count as invalid.
pub fn is_token_valid(token: &str, now: DateTime<Utc>) -> bool {
    match decode_claims(token) {
        Ok(claims) => claims.expires_at().is_some_and(|exp| now < exp),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use chrono::TimeZone;

    fn token(payload: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn decodes_sub_and_exp() {
        let claims = decode_claims(&token(r#"{"sub":"a@b.in","exp":1700000000,"type":"access"}"#))
            .unwrap();
        assert_eq!(claims.sub.as_deref(), Some("a@b.in"));
        assert_eq!(claims.exp, Some(1_700_000_000));
        assert_eq!(
            claims.expires_at(),
            Some(Utc.timestamp_opt(1_700_000_000, 0).unwrap())
        );
    }

    #[test]
    fn validity_is_strictly_before_expiry() {
        let t = token(r#"{"exp":1700000000}"#);
        let exp = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert!(is_token_valid(&t, exp - chrono::Duration::seconds(1)));
        assert!(!is_token_valid(&t, exp));
        assert!(!is_token_valid(&t, exp + chrono::Duration::seconds(1)));
    }

    #[test]
    fn garbage_and_missing_exp_are_invalid() {
        let now = Utc::now();
        assert!(!is_token_valid("not-a-jwt", now));
        assert!(!is_token_valid("a.!!!.c", now));
        assert!(!is_token_valid(&token("\"plain\""), now));
        assert!(!is_token_valid(&token(r#"{"sub":"x"}"#), now));
        assert!(matches!(decode_claims("a.b"), Err(ClaimsError::Malformed)));
    }

    #[test]
    fn padded_payload_is_accepted() {
        use base64::engine::general_purpose::URL_SAFE;
        let t = format!("h.{}.s", URL_SAFE.encode(r#"{"exp": 4102444800}"#));
        assert!(is_token_valid(&t, Utc::now()));
    }
}

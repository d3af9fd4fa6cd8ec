use serde::{Deserialize, Serialize};

use gstbill_core::validators;
use gstbill_core::{DomainResult, FieldErrors, UserId};

/// Body for `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        let mut errors = FieldErrors::new();
        errors.check("email", validators::required(self.email.trim(), "Email"));
        errors.check("email", validators::email(self.email.trim(), "Email"));
        errors.check("password", validators::required(&self.password, "Password"));
        errors.into_result()
    }
}

/// Body for `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> DomainResult<()> {
        let mut errors = FieldErrors::new();
        errors.check("email", validators::required(self.email.trim(), "Email"));
        errors.check("email", validators::email(self.email.trim(), "Email"));
        errors.check("password", validators::required(&self.password, "Password"));
        errors.check("password", validators::min_length(&self.password, 8, "Password"));
        errors.into_result()
    }
}

/// Body for `POST /auth/refresh`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Tokens returned by login and refresh. Refresh responses may omit the
/// refresh token, in which case the previous one stays in use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "bearer")]
    pub token_type: String,
}

fn bearer() -> String {
    "bearer".to_string()
}

/// `GET /auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

fn active_by_default() -> bool {
    true
}

impl User {
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gstbill_core::DomainError;

    #[test]
    fn token_pair_defaults() {
        let pair: TokenPair = serde_json::from_str(r#"{"access_token":"abc"}"#).unwrap();
        assert_eq!(pair.refresh_token, None);
        assert_eq!(pair.token_type, "bearer");
    }

    #[test]
    fn user_display_name_falls_back_to_email() {
        let json = format!(r#"{{"id":"{}","email":"ops@acme.in"}}"#, UserId::new());
        let mut user: User = serde_json::from_str(&json).unwrap();
        assert!(user.is_active);
        assert!(!user.is_superuser);
        assert_eq!(user.display_name(), "ops@acme.in");
        user.full_name = Some("Asha Rao".into());
        assert_eq!(user.display_name(), "Asha Rao");
    }

    #[test]
    fn credentials_validation() {
        assert!(Credentials::new("ops@acme.in", "secret").validate().is_ok());
        match Credentials::new("ops", "").validate() {
            Err(DomainError::Validation(errors)) => {
                assert_eq!(errors.get("email"), Some("Email is not valid"));
                assert_eq!(errors.get("password"), Some("Password is required"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn register_requires_eight_character_password() {
        let req = RegisterRequest {
            email: "ops@acme.in".into(),
            password: "short".into(),
            full_name: None,
        };
        match req.validate() {
            Err(DomainError::Validation(errors)) => {
                assert_eq!(
                    errors.get("password"),
                    Some("Password must be at least 8 characters")
                );
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}

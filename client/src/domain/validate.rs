//! Client-side form validation.
//!
//! Duplicates, never replaces, server-side validation: forms are checked
//! before dispatch so obvious mistakes fail without a round trip.

use serde_json::json;
use thiserror::Error;

use super::error::{ErrorEnvelope, VALIDATION_ERROR};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A form field rejected before dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// Required field is empty after trimming.
    #[error("{field} is required")]
    Required {
        /// Field name.
        field: &'static str,
    },
    /// Value does not look like an email address.
    #[error("email address is not valid")]
    InvalidEmail,
    /// Password is shorter than [`MIN_PASSWORD_LENGTH`].
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,
}

impl FormError {
    /// Render the failure in the shared envelope shape so views display
    /// local and remote validation identically.
    #[must_use]
    pub fn to_envelope(&self) -> ErrorEnvelope {
        let field = match self {
            Self::Required { field } => (*field).to_owned(),
            Self::InvalidEmail => "email".to_owned(),
            Self::PasswordTooShort => "password".to_owned(),
        };
        ErrorEnvelope::new(VALIDATION_ERROR, self.to_string())
            .with_details(json!({ "field": field }))
    }
}

/// Reject empty or whitespace-only values.
///
/// # Errors
///
/// Returns [`FormError::Required`] naming the field.
pub fn require(field: &'static str, value: &str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        return Err(FormError::Required { field });
    }
    Ok(())
}

/// Check the `local@domain.tld` shape without attempting full RFC parsing.
///
/// # Errors
///
/// Returns [`FormError::InvalidEmail`] when the shape does not hold.
pub fn validate_email(email: &str) -> Result<(), FormError> {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return Err(FormError::InvalidEmail);
    };
    let domain_ok = domain
        .rsplit_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty());
    if local.is_empty() || domain.contains('@') || !domain_ok || email.contains(char::is_whitespace)
    {
        return Err(FormError::InvalidEmail);
    }
    Ok(())
}

/// Enforce the minimum password length.
///
/// # Errors
///
/// Returns [`FormError::PasswordTooShort`] for short passwords.
pub fn validate_password(password: &str) -> Result<(), FormError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(FormError::PasswordTooShort);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    //! Shape checks mirroring the server-side rules.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("user@example.com")]
    #[case::subdomain("user@mail.example.kz")]
    #[case::plus_tag("user+tag@example.org")]
    fn accepts_plausible_emails(#[case] email: &str) {
        assert_eq!(validate_email(email), Ok(()));
    }

    #[rstest]
    #[case::no_at("userexample.com")]
    #[case::no_tld("user@example")]
    #[case::empty_local("@example.com")]
    #[case::double_at("a@b@example.com")]
    #[case::spaced("user name@example.com")]
    fn rejects_malformed_emails(#[case] email: &str) {
        assert_eq!(validate_email(email), Err(FormError::InvalidEmail));
    }

    #[test]
    fn rejects_short_passwords() {
        assert_eq!(validate_password("1234567"), Err(FormError::PasswordTooShort));
        assert_eq!(validate_password("12345678"), Ok(()));
    }

    #[test]
    fn required_rejects_whitespace() {
        assert_eq!(require("name", "  "), Err(FormError::Required { field: "name" }));
        assert_eq!(require("name", "Aida"), Ok(()));
    }

    #[test]
    fn envelope_names_the_field() {
        let envelope = FormError::InvalidEmail.to_envelope();
        assert_eq!(envelope.error_code, VALIDATION_ERROR);
        assert_eq!(
            envelope.details.and_then(|d| d.get("field").cloned()),
            Some(serde_json::json!("email"))
        );
    }
}

//! Authentication primitives: credentials, field errors, and outcomes.
//!
//! Field errors are returned as values, never raised. A request either yields
//! a user or a list of problems tied to input fields.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::{User, Username};

/// Minimum username length, exclusive.
pub const USERNAME_MIN_EXCLUSIVE: usize = 2;
/// Minimum password length, exclusive.
pub const PASSWORD_MIN_EXCLUSIVE: usize = 3;

pub(crate) const USERNAME_TOO_SHORT: &str = "length must be greater than 2";
pub(crate) const PASSWORD_TOO_SHORT: &str = "length must be greater than 3";
pub(crate) const USERNAME_TAKEN: &str = "This username already exist";
pub(crate) const USERNAME_UNKNOWN: &str = "Username doesn't exist";
pub(crate) const PASSWORD_INCORRECT: &str = "Incorrect password";

/// Input field a [`FieldError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CredentialField {
    /// The login name.
    Username,
    /// The plaintext password.
    Password,
}

/// Structured failure attached to a single input field.
///
/// # Examples
/// ```
/// use auth_backend::domain::{CredentialField, FieldError};
///
/// let err = FieldError::new(CredentialField::Username, "length must be greater than 2");
/// let json = serde_json::to_value(&err).expect("serialise");
/// assert_eq!(json["field"], "username");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    #[schema(example = "username")]
    field: CredentialField,
    #[schema(example = "length must be greater than 2")]
    message: String,
}

impl FieldError {
    /// Build a field error.
    pub fn new(field: CredentialField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// Field the error refers to.
    pub fn field(&self) -> CredentialField {
        self.field
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    pub(crate) fn username_taken() -> Self {
        Self::new(CredentialField::Username, USERNAME_TAKEN)
    }

    pub(crate) fn username_unknown() -> Self {
        Self::new(CredentialField::Username, USERNAME_UNKNOWN)
    }

    pub(crate) fn password_incorrect() -> Self {
        Self::new(CredentialField::Password, PASSWORD_INCORRECT)
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = match self.field {
            CredentialField::Username => "username",
            CredentialField::Password => "password",
        };
        write!(f, "{field}: {}", self.message)
    }
}

/// Result of a register or login attempt.
///
/// Serialises as `{"user": {...}}` or `{"errors": [...]}`; both can never be
/// present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AuthOutcome {
    /// The operation succeeded for this user.
    User(User),
    /// The operation was rejected; at least one error is present.
    Errors(Vec<FieldError>),
}

impl AuthOutcome {
    /// Reject with a single field error.
    pub fn rejected(error: FieldError) -> Self {
        Self::Errors(vec![error])
    }

    /// The user, when the operation succeeded.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::User(user) => Some(user),
            Self::Errors(_) => None,
        }
    }

    /// The field errors, empty when the operation succeeded.
    pub fn errors(&self) -> &[FieldError] {
        match self {
            Self::User(_) => &[],
            Self::Errors(errors) => errors.as_slice(),
        }
    }
}

/// Username and plaintext password supplied by a caller.
///
/// The password is zeroed on drop and redacted from `Debug` output. No
/// validation happens at construction; see [`validate_credentials`].
///
/// # Examples
/// ```
/// use auth_backend::domain::Credentials;
///
/// let creds = Credentials::new("alice", "secret1");
/// assert_eq!(creds.username().as_str(), "alice");
/// assert_eq!(creds.password(), "secret1");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: Username,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw inputs.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Username::new(username),
            password: Zeroizing::new(password.into()),
        }
    }

    /// Username used for directory lookups.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Plaintext password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Check credentials against the syntactic rules.
///
/// Every failing rule is reported, username first. Lengths count UTF-16
/// code units, so a character outside the BMP counts twice.
///
/// # Examples
/// ```
/// use auth_backend::domain::{validate_credentials, CredentialField, Credentials};
///
/// let errors = validate_credentials(&Credentials::new("al", "pwd"));
/// assert_eq!(errors.len(), 2);
/// assert_eq!(errors[0].field(), CredentialField::Username);
/// assert!(validate_credentials(&Credentials::new("alice", "secret")).is_empty());
/// ```
pub fn validate_credentials(credentials: &Credentials) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if credentials.username().as_str().encode_utf16().count() <= USERNAME_MIN_EXCLUSIVE {
        errors.push(FieldError::new(
            CredentialField::Username,
            USERNAME_TOO_SHORT,
        ));
    }
    if credentials.password().encode_utf16().count() <= PASSWORD_MIN_EXCLUSIVE {
        errors.push(FieldError::new(
            CredentialField::Password,
            PASSWORD_TOO_SHORT,
        ));
    }
    errors
}

#[cfg(test)]
mod tests {
    //! Unit tests for the credential rules and outcome encoding.
    use super::*;
    use crate::domain::UserId;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("", "password", vec![CredentialField::Username])]
    #[case("ab", "password", vec![CredentialField::Username])]
    #[case("abc", "password", vec![])]
    #[case("abc", "pwd", vec![CredentialField::Password])]
    #[case("abc", "pwd1", vec![])]
    #[case("ab", "pwd", vec![CredentialField::Username, CredentialField::Password])]
    fn rules_report_failing_fields_in_order(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: Vec<CredentialField>,
    ) {
        let errors = validate_credentials(&Credentials::new(username, password));
        let fields: Vec<_> = errors.iter().map(FieldError::field).collect();
        assert_eq!(fields, expected);
    }

    #[rstest]
    fn messages_match_rules() {
        let errors = validate_credentials(&Credentials::new("x", "y"));
        assert_eq!(
            errors,
            vec![
                FieldError::new(CredentialField::Username, "length must be greater than 2"),
                FieldError::new(CredentialField::Password, "length must be greater than 3"),
            ]
        );
    }

    #[rstest]
    fn lengths_count_utf16_units_not_bytes() {
        // Three units, six bytes.
        let errors = validate_credentials(&Credentials::new("äöü", "ßßßß"));
        assert!(errors.is_empty());

        let errors = validate_credentials(&Credentials::new("éé", "pass1"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field(), CredentialField::Username);
    }

    #[rstest]
    fn astral_characters_count_as_two_units() {
        // Two emoji: four UTF-16 units.
        assert!(validate_credentials(&Credentials::new("😀😀", "pass1")).is_empty());
        assert!(validate_credentials(&Credentials::new("alice", "😀😀")).is_empty());

        let errors = validate_credentials(&Credentials::new("😀", "😀"));
        let fields: Vec<_> = errors.iter().map(FieldError::field).collect();
        assert_eq!(fields, vec![CredentialField::Username, CredentialField::Password]);
    }

    #[rstest]
    fn outcome_serialises_as_tagged_object() {
        let user = User::new(UserId::new(1).expect("id"), Username::new("alice"));
        let ok = serde_json::to_value(AuthOutcome::User(user)).expect("serialise");
        assert_eq!(ok, json!({ "user": { "id": 1, "username": "alice" } }));

        let rejected = serde_json::to_value(AuthOutcome::rejected(FieldError::username_taken()))
            .expect("serialise");
        assert_eq!(
            rejected,
            json!({ "errors": [{ "field": "username", "message": "This username already exist" }] })
        );
    }

    #[rstest]
    fn debug_output_hides_password() {
        let rendered = format!("{:?}", Credentials::new("alice", "hunter22"));
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter22"));
    }
}

//! Error taxonomy for the chassis.
//!
//! Two families exist here:
//! - [`ResponseError`]: wire-facing, recoverable-by-the-client failures with a
//!   fixed HTTP status and a uniform message. These never carry internal
//!   detail; the full cause stays on the server side (logs/event sink).
//! - [`ConfigError`]: fatal, startup-time failures. A service that hits one of
//!   these must refuse to start rather than serve with broken configuration.

use std::borrow::Cow;

use thiserror::Error;

/// A client-facing application error.
///
/// Carries a stable numeric code, a stable name, a uniform message, an
/// optional hint and the HTTP status class it maps to. The message and hint
/// are fixed per constructor so that the response body cannot leak which
/// internal check failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{name}: {message}")]
pub struct ResponseError {
    name: &'static str,
    code: u16,
    status: u16,
    message: Cow<'static, str>,
    hint: Option<Cow<'static, str>>,
}

impl ResponseError {
    pub fn new(name: &'static str, code: u16, status: u16, message: &'static str) -> Self {
        Self {
            name,
            code,
            status,
            message: Cow::Borrowed(message),
            hint: None,
        }
    }

    /// Attach a hint for the client (still a fixed, non-sensitive string).
    pub fn with_hint(mut self, hint: &'static str) -> Self {
        self.hint = Some(Cow::Borrowed(hint));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// The `Authorization` header was absent from the request.
    pub fn missing_authorization_header() -> Self {
        Self::new(
            "MissingAuthorizationHeaderError",
            104,
            401,
            "Missing authorization header.",
        )
        .with_hint("The `Authorization` header is required.")
    }

    /// The `Authorization` header was present but not of the expected scheme.
    pub fn invalid_authorization_header() -> Self {
        Self::new(
            "InvalidAuthorizationHeaderError",
            105,
            401,
            "Invalid authorization header.",
        )
        .with_hint("The `Authorization` header must use the `Bearer` scheme.")
    }

    /// Credential verification failed. Uniform on purpose: the caller must not
    /// be able to tell a bad signature from an expired token.
    pub fn unauthorized() -> Self {
        Self::new("UnauthorizedError", 53, 401, "Credentials not allowed.")
            .with_hint("Your credentials are invalid or expired.")
    }

    /// Claims verified but the unlock policy denied the request. The denied
    /// dimension is never part of the response.
    pub fn forbidden() -> Self {
        Self::new("ForbiddenError", 108, 403, "Access not allowed.")
            .with_hint("You don't have enough permissions for this request.")
    }

    pub fn not_found() -> Self {
        Self::new("NotFoundError", 56, 404, "Resource not found.")
    }

    pub fn server_error() -> Self {
        Self::new("ServerError", 57, 500, "Unexpected server error.")
    }

    pub fn service_unavailable() -> Self {
        Self::new("ServiceUnavailableError", 110, 503, "Service unavailable.")
    }

    pub fn too_many_requests() -> Self {
        Self::new("TooManyRequestsError", 111, 429, "Too many requests.")
    }
}

/// Fatal configuration failure (startup-time, never recovered at runtime).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required configuration value is absent.
    #[error("missing configuration value: {0}")]
    Missing(&'static str),

    /// A configuration value is present but unusable.
    #[error("invalid configuration value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    /// `Environment::current()` was called before `Environment::prepare()`.
    #[error("environment not prepared; call Environment::prepare() at startup")]
    EnvNotPrepared,
}

impl ConfigError {
    pub fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_map_to_401_class() {
        assert_eq!(ResponseError::missing_authorization_header().status(), 401);
        assert_eq!(ResponseError::invalid_authorization_header().status(), 401);
        assert_eq!(ResponseError::unauthorized().status(), 401);
        assert_eq!(ResponseError::forbidden().status(), 403);
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(ResponseError::missing_authorization_header().code(), 104);
        assert_eq!(ResponseError::invalid_authorization_header().code(), 105);
        assert_eq!(ResponseError::unauthorized().code(), 53);
        assert_eq!(ResponseError::forbidden().code(), 108);
    }

    #[test]
    fn denial_messages_carry_no_internal_detail() {
        let err = ResponseError::unauthorized();
        assert_eq!(err.message(), "Credentials not allowed.");
        assert_eq!(format!("{err}"), "UnauthorizedError: Credentials not allowed.");
    }
}

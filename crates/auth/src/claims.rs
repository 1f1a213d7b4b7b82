//! Access-token claims model (transport-agnostic).

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Audience claim: a single recipient or several.
///
/// Tokens are issued with the full configured audience list; verifiers accept
/// a token when their own audience is included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

impl Audience {
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Self::One(aud) => aud == audience,
            Self::Many(auds) => auds.iter().any(|aud| aud == audience),
        }
    }
}

/// The verified payload of an access token.
///
/// Claims are immutable once verified: they are created fresh by
/// [`crate::TokenCodec::verify`] on every request, attached to the request
/// context for the duration of handling, and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Unique token id (caller-supplied at issuance).
    pub jti: String,

    /// Issuer.
    pub iss: String,

    /// Audience(s).
    pub aud: Audience,

    /// Subject / principal identifier.
    pub sub: String,

    /// Issued-at, seconds since epoch.
    pub iat: i64,

    /// Not-before, seconds since epoch.
    pub nbf: i64,

    /// Expiry, seconds since epoch.
    pub exp: i64,

    /// Space-delimited scope tokens.
    pub scopes: String,

    /// Single role granted to the subject, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Host the token was issued for (origin pinning), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    /// Network address the token was issued for (ip pinning), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,

    /// Application claims beyond the registered set.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Claims {
    /// The scope claim split on whitespace, as a set.
    pub fn scope_set(&self) -> BTreeSet<&str> {
        self.scopes.split_whitespace().collect()
    }
}

/// Input to token creation.
///
/// `jti` must be caller-supplied and unique per issuance; uniqueness is a
/// contract of the caller, not enforced by the codec.
#[derive(Debug, Clone, Default)]
pub struct IssueRequest {
    pub jti: String,
    pub sub: String,
    pub scopes: String,
    pub role: Option<String>,
    pub origin: Option<String>,
    pub ip: Option<String>,
    pub extra: HashMap<String, Value>,
}

impl IssueRequest {
    pub fn new(jti: impl Into<String>, sub: impl Into<String>) -> Self {
        Self {
            jti: jti.into(),
            sub: sub.into(),
            ..Self::default()
        }
    }

    pub fn with_scopes(mut self, scopes: impl Into<String>) -> Self {
        self.scopes = scopes.into();
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Pin the token to the issuing origin (host).
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Pin the token to the issuing network address.
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    pub fn with_claim(mut self, name: impl Into<String>, value: Value) -> Self {
        self.extra.insert(name.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audience_membership_covers_both_shapes() {
        assert!(Audience::One("api".into()).contains("api"));
        assert!(!Audience::One("api".into()).contains("web"));

        let many = Audience::Many(vec!["api".into(), "web".into()]);
        assert!(many.contains("web"));
        assert!(!many.contains("cli"));
    }

    #[test]
    fn scope_set_splits_on_whitespace() {
        let claims = Claims {
            jti: "t1".into(),
            iss: "iss".into(),
            aud: Audience::One("aud".into()),
            sub: "user".into(),
            iat: 0,
            nbf: 0,
            exp: 1,
            scopes: "read  write\tadmin".into(),
            role: None,
            origin: None,
            ip: None,
            extra: HashMap::new(),
        };

        let set = claims.scope_set();
        assert_eq!(set.len(), 3);
        assert!(set.contains("write"));
    }

    #[test]
    fn audience_deserializes_from_string_or_array() {
        let one: Audience = serde_json::from_str("\"api\"").unwrap();
        assert_eq!(one, Audience::One("api".into()));

        let many: Audience = serde_json::from_str("[\"api\",\"web\"]").unwrap();
        assert!(many.contains("web"));
    }
}

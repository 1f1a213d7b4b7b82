//! Multi-factor unlock policy.
//!
//! Given verified [`Claims`] and a request's declared requirements, the
//! policy decides allow/deny across four independent dimensions: role, scope,
//! origin and ip. Denial is an ordinary [`Decision`] value, never an error:
//! it is an expected, frequent outcome of normal operation.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::claims::Claims;

/// A role/scope requirement declared by a route.
///
/// `Any` disables the dimension for that route. This replaces the stringly
/// "any" sentinel so a literal role or scope named "any" cannot collide with
/// the bypass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Dimension not enforced for this route.
    Any,
    /// At least one of these values must match.
    OneOf(BTreeSet<String>),
}

impl Requirement {
    pub fn any() -> Self {
        Self::Any
    }

    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::OneOf(values.into_iter().map(Into::into).collect())
    }
}

/// The dimension a request was denied on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Role,
    Scope,
    Origin,
    Ip,
}

impl core::fmt::Display for Dimension {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Role => f.write_str("role"),
            Self::Scope => f.write_str("scope"),
            Self::Origin => f.write_str("origin"),
            Self::Ip => f.write_str("ip"),
        }
    }
}

/// Outcome of policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(Dimension),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Global per-dimension enablement, independent of per-route requirements.
///
/// A disabled dimension is never evaluated and never denies, regardless of
/// claim content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockDimensions {
    pub role: bool,
    pub scope: bool,
    pub origin: bool,
    pub ip: bool,
}

impl Default for UnlockDimensions {
    fn default() -> Self {
        Self {
            role: true,
            scope: true,
            origin: true,
            ip: true,
        }
    }
}

/// Decides whether verified claims authorize a request.
///
/// Stateless beyond its configuration; safe for unbounded concurrent use.
#[derive(Debug, Clone, Default)]
pub struct UnlockPolicy {
    dimensions: UnlockDimensions,
}

impl UnlockPolicy {
    pub fn new(dimensions: UnlockDimensions) -> Self {
        Self { dimensions }
    }

    /// Role check: exact membership in the required set, no hierarchy or
    /// wildcard semantics. A claim without a role is denied.
    pub fn unlock_by_role(&self, claims: &Claims, required: &Requirement) -> Decision {
        if !self.dimensions.role {
            return Decision::Allowed;
        }

        match required {
            Requirement::Any => Decision::Allowed,
            Requirement::OneOf(roles) => match claims.role.as_deref() {
                Some(role) if roles.contains(role) => Decision::Allowed,
                _ => Decision::Denied(Dimension::Role),
            },
        }
    }

    /// Scope check: OR semantics. At least one required scope must appear in
    /// the claim's whitespace-delimited scope set.
    pub fn unlock_by_scope(&self, claims: &Claims, required: &Requirement) -> Decision {
        if !self.dimensions.scope {
            return Decision::Allowed;
        }

        match required {
            Requirement::Any => Decision::Allowed,
            Requirement::OneOf(scopes) => {
                let granted = claims.scope_set();
                if granted.is_empty() {
                    return Decision::Denied(Dimension::Scope);
                }

                if scopes.iter().any(|s| granted.contains(s.as_str())) {
                    Decision::Allowed
                } else {
                    Decision::Denied(Dimension::Scope)
                }
            }
        }
    }

    /// Origin check: a token without an `origin` claim is unconstrained; a
    /// pinned token must be presented from exactly that origin.
    pub fn unlock_by_origin(&self, claims: &Claims, observed: Option<&str>) -> Decision {
        if !self.dimensions.origin {
            return Decision::Allowed;
        }

        match claims.origin.as_deref() {
            None => Decision::Allowed,
            Some(pinned) if Some(pinned) == observed => Decision::Allowed,
            Some(_) => Decision::Denied(Dimension::Origin),
        }
    }

    /// Ip check: same shape as origin.
    pub fn unlock_by_ip(&self, claims: &Claims, observed: Option<&str>) -> Decision {
        if !self.dimensions.ip {
            return Decision::Allowed;
        }

        match claims.ip.as_deref() {
            None => Decision::Allowed,
            Some(pinned) if Some(pinned) == observed => Decision::Allowed,
            Some(_) => Decision::Denied(Dimension::Ip),
        }
    }

    /// Evaluate all dimensions for a request: role, scope, ip, origin, in
    /// that order, short-circuiting on the first denial. All four are
    /// independently necessary; the ordering only determines which denial is
    /// reported when several dimensions would fail.
    pub fn unlock_request(
        &self,
        claims: &Claims,
        required_roles: &Requirement,
        required_scopes: &Requirement,
        observed_origin: Option<&str>,
        observed_ip: Option<&str>,
    ) -> Decision {
        let decision = self.unlock_by_role(claims, required_roles);
        if !decision.is_allowed() {
            return decision;
        }

        let decision = self.unlock_by_scope(claims, required_scopes);
        if !decision.is_allowed() {
            return decision;
        }

        let decision = self.unlock_by_ip(claims, observed_ip);
        if !decision.is_allowed() {
            return decision;
        }

        self.unlock_by_origin(claims, observed_origin)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::claims::Audience;

    use super::*;

    fn claims() -> Claims {
        Claims {
            jti: "t1".into(),
            iss: "issuer.test".into(),
            aud: Audience::One("api.test".into()),
            sub: "user-1".into(),
            iat: 0,
            nbf: 0,
            exp: 300,
            scopes: "read write".into(),
            role: Some("admin".into()),
            origin: None,
            ip: None,
            extra: HashMap::new(),
        }
    }

    #[test]
    fn role_requires_exact_membership() {
        let policy = UnlockPolicy::default();
        let claims = claims();

        let allowed = Requirement::one_of(["admin", "editor"]);
        assert!(policy.unlock_by_role(&claims, &allowed).is_allowed());

        let viewer_only = Requirement::one_of(["viewer"]);
        assert_eq!(
            policy.unlock_by_role(&claims, &viewer_only),
            Decision::Denied(Dimension::Role)
        );
    }

    #[test]
    fn any_requirement_bypasses_even_without_a_role() {
        let policy = UnlockPolicy::default();
        let mut claims = claims();
        claims.role = None;

        assert!(policy.unlock_by_role(&claims, &Requirement::any()).is_allowed());
        assert_eq!(
            policy.unlock_by_role(&claims, &Requirement::one_of(["admin"])),
            Decision::Denied(Dimension::Role)
        );
    }

    #[test]
    fn a_role_literally_named_any_is_just_a_role() {
        let policy = UnlockPolicy::default();
        let mut claims = claims();
        claims.role = Some("any".into());

        // "any" as a role value participates in plain membership checks.
        assert!(
            policy
                .unlock_by_role(&claims, &Requirement::one_of(["any"]))
                .is_allowed()
        );
        assert_eq!(
            policy.unlock_by_role(&claims, &Requirement::one_of(["admin"])),
            Decision::Denied(Dimension::Role)
        );
    }

    #[test]
    fn scope_intersection_is_or_semantics() {
        let policy = UnlockPolicy::default();
        let mut claims = claims();
        claims.scopes = "b c".into();

        let required = Requirement::one_of(["a", "b"]);
        assert!(policy.unlock_by_scope(&claims, &required).is_allowed());

        claims.scopes = "c d".into();
        assert_eq!(
            policy.unlock_by_scope(&claims, &required),
            Decision::Denied(Dimension::Scope)
        );
    }

    #[test]
    fn empty_scope_set_is_denied() {
        let policy = UnlockPolicy::default();
        let mut claims = claims();
        claims.scopes = "   ".into();

        assert_eq!(
            policy.unlock_by_scope(&claims, &Requirement::one_of(["read"])),
            Decision::Denied(Dimension::Scope)
        );
    }

    #[test]
    fn unpinned_origin_and_ip_are_unconstrained() {
        let policy = UnlockPolicy::default();
        let claims = claims();

        assert!(policy.unlock_by_origin(&claims, Some("anywhere.test")).is_allowed());
        assert!(policy.unlock_by_ip(&claims, None).is_allowed());
    }

    #[test]
    fn pinned_origin_requires_exact_match() {
        let policy = UnlockPolicy::default();
        let mut claims = claims();
        claims.origin = Some("api.example.com".into());

        assert!(
            policy
                .unlock_by_origin(&claims, Some("api.example.com"))
                .is_allowed()
        );
        assert_eq!(
            policy.unlock_by_origin(&claims, Some("evil.example.com")),
            Decision::Denied(Dimension::Origin)
        );
        assert_eq!(
            policy.unlock_by_origin(&claims, None),
            Decision::Denied(Dimension::Origin)
        );
    }

    #[test]
    fn disabled_dimension_never_denies() {
        let policy = UnlockPolicy::new(UnlockDimensions {
            origin: false,
            ..UnlockDimensions::default()
        });
        let mut claims = claims();
        claims.origin = Some("api.example.com".into());

        assert!(
            policy
                .unlock_by_origin(&claims, Some("evil.example.com"))
                .is_allowed()
        );
    }

    #[test]
    fn unlock_request_short_circuits_in_declared_order() {
        let policy = UnlockPolicy::default();
        let mut claims = claims();
        claims.role = Some("viewer".into());
        claims.scopes = "nothing".into();
        claims.ip = Some("10.0.0.1".into());

        // Role, scope and ip would all fail; role is reported because it is
        // evaluated first.
        let decision = policy.unlock_request(
            &claims,
            &Requirement::one_of(["admin"]),
            &Requirement::one_of(["read"]),
            None,
            Some("10.9.9.9"),
        );
        assert_eq!(decision, Decision::Denied(Dimension::Role));

        // With role passing, the next failing dimension (scope) surfaces.
        let decision = policy.unlock_request(
            &claims,
            &Requirement::one_of(["viewer"]),
            &Requirement::one_of(["read"]),
            None,
            Some("10.9.9.9"),
        );
        assert_eq!(decision, Decision::Denied(Dimension::Scope));
    }

    #[test]
    fn unlock_request_allows_when_all_dimensions_pass() {
        let policy = UnlockPolicy::default();
        let mut claims = claims();
        claims.origin = Some("api.example.com".into());

        let decision = policy.unlock_request(
            &claims,
            &Requirement::one_of(["admin", "editor"]),
            &Requirement::one_of(["write"]),
            Some("api.example.com"),
            Some("203.0.113.7"),
        );
        assert!(decision.is_allowed());
    }
}

use chassis_auth::Claims;

/// Verified claims attached to a request after successful authorization.
///
/// Inserted into the request extensions by the authorization middleware and
/// read by downstream handlers; it never outlives the request.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessContext {
    claims: Claims,
}

impl AccessContext {
    pub fn new(claims: Claims) -> Self {
        Self { claims }
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub fn into_claims(self) -> Claims {
        self.claims
    }
}

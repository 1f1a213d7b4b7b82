//! Request authorization middleware.
//!
//! Orchestrates the token codec and the unlock policy against an inbound
//! request. Terminal outcomes per request: proceed with claims attached, or
//! exactly one of missing-header / invalid-scheme / unauthorized / forbidden.
//! No retries; a failed authorization is final for that request.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;

use chassis_auth::{
    Decision, RequestMetadata, Requirement, SecurityEvent, TokenCodec, TokenError, UnlockPolicy,
};
use chassis_core::ResponseError;
use chassis_events::EventBus;

use crate::context::AccessContext;
use crate::errors::ApiError;
use crate::request::{bearer_token, observed_ip, observed_origin};

/// Dependencies and per-route requirements for [`auth_middleware`].
///
/// Collaborators are injected explicitly; nothing is resolved from a global
/// registry. One state value per protected route group.
#[derive(Clone)]
pub struct AuthState {
    codec: Arc<TokenCodec>,
    policy: Arc<UnlockPolicy>,
    events: Arc<dyn EventBus<SecurityEvent>>,
    required_roles: Requirement,
    required_scopes: Requirement,
}

impl AuthState {
    /// Both requirements default to [`Requirement::Any`] (not enforced).
    pub fn new(
        codec: Arc<TokenCodec>,
        policy: Arc<UnlockPolicy>,
        events: Arc<dyn EventBus<SecurityEvent>>,
    ) -> Self {
        Self {
            codec,
            policy,
            events,
            required_roles: Requirement::Any,
            required_scopes: Requirement::Any,
        }
    }

    pub fn with_required_roles(mut self, required: Requirement) -> Self {
        self.required_roles = required;
        self
    }

    pub fn with_required_scopes(mut self, required: Requirement) -> Self {
        self.required_scopes = required;
        self
    }
}

/// Axum middleware enforcing token-based authorization.
///
/// Stateless across requests: each decision depends only on the request's
/// credential plus the immutable configuration in [`AuthState`].
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let headers = req.headers();
    let token = bearer_token(headers)?;

    // Set by `into_make_service_with_connect_info`; absent under plain
    // `oneshot`-style drivers, where only forwarding headers apply.
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    let meta = RequestMetadata {
        path: req.uri().path().to_string(),
        origin: observed_origin(headers),
        ip: observed_ip(headers, peer),
    };

    let claims = match state.codec.verify(token) {
        Ok(claims) => claims,
        Err(TokenError::Invalid(cause)) => {
            tracing::warn!(path = %meta.path, cause = %cause, "invalid access token");
            // Fire-and-forget: a full or closed sink never affects the response.
            let _ = state
                .events
                .publish(SecurityEvent::invalid_access_token(cause, meta));
            return Err(ApiError(ResponseError::unauthorized()));
        }
        Err(TokenError::Configuration(err)) => {
            tracing::error!(error = %err, "token codec misconfigured");
            return Err(ApiError(ResponseError::server_error()));
        }
    };

    let decision = state.policy.unlock_request(
        &claims,
        &state.required_roles,
        &state.required_scopes,
        meta.origin.as_deref(),
        meta.ip.as_deref(),
    );

    if let Decision::Denied(dimension) = decision {
        tracing::warn!(path = %meta.path, %dimension, sub = %claims.sub, "access denied");
        let _ = state
            .events
            .publish(SecurityEvent::access_denied(dimension, meta));
        return Err(ApiError(ResponseError::forbidden()));
    }

    req.extensions_mut().insert(AccessContext::new(claims));
    Ok(next.run(req).await)
}

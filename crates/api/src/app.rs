//! Router wiring: a minimal surface exercising the authorization pipeline.

use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::{Value, json};
use tower::ServiceBuilder;

use crate::context::AccessContext;
use crate::errors::ApiError;
use crate::middleware::{AuthState, auth_middleware};

/// Build the HTTP router. `/health` is open; everything else sits behind the
/// authorization middleware configured by `auth_state`.
pub fn build_router(auth_state: AuthState) -> Router {
    let protected = Router::new()
        .route("/whoami", get(whoami))
        .route_layer(axum::middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        .fallback(not_found)
        .layer(ServiceBuilder::new())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Echo the verified claims attached by the middleware.
async fn whoami(Extension(ctx): Extension<AccessContext>) -> Json<Value> {
    let claims = ctx.claims();

    Json(json!({
        "sub": claims.sub,
        "jti": claims.jti,
        "role": claims.role,
        "scopes": claims.scopes,
    }))
}

async fn not_found() -> ApiError {
    ApiError(chassis_core::ResponseError::not_found())
}

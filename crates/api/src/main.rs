use std::sync::Arc;

use chassis_api::app::build_router;
use chassis_api::middleware::AuthState;
use chassis_api::server::{ApiServer, ServerOptions};
use chassis_auth::{SecurityEvent, TokenCodec, TokenCodecOptions, UnlockPolicy};
use chassis_core::Environment;
use chassis_events::{Event, EventBus, LocalEventBus};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    chassis_observability::init();

    let env = Environment::from_env()?;
    Environment::prepare(env.clone());

    let public_key_path = std::env::var("ACCESS_TOKEN_PUBLIC_KEY")
        .unwrap_or_else(|_| "keys/public.pem".to_string());
    let issuer = std::env::var("ACCESS_TOKEN_ISSUER").unwrap_or_else(|_| {
        tracing::warn!("ACCESS_TOKEN_ISSUER not set; using insecure dev default");
        "dev-issuer".to_string()
    });
    let audience = std::env::var("ACCESS_TOKEN_AUDIENCE").unwrap_or_else(|_| {
        tracing::warn!("ACCESS_TOKEN_AUDIENCE not set; using insecure dev default");
        "dev-audience".to_string()
    });

    let codec = TokenCodec::new(TokenCodecOptions {
        issuer: issuer.clone(),
        audience: vec![audience.clone()],
        accept_issuer: issuer,
        accept_audience: audience,
        private_key_pem: None,
        public_key_pem: Some(TokenCodec::read_key_file(public_key_path)?),
        ttl: None,
        require: None,
    })?;

    let events: Arc<LocalEventBus<SecurityEvent>> = Arc::new(LocalEventBus::new());
    spawn_security_event_logger(&events);

    let auth_state = AuthState::new(
        Arc::new(codec),
        Arc::new(UnlockPolicy::default()),
        events,
    );

    let server = ApiServer::new(ServerOptions::from_environment(&env));
    server.serve(build_router(auth_state)).await
}

/// Drain the security event stream into the logs on a dedicated thread.
fn spawn_security_event_logger(events: &Arc<LocalEventBus<SecurityEvent>>) {
    let subscription = events.subscribe();

    std::thread::spawn(move || {
        while let Ok(event) = subscription.recv() {
            match &event {
                SecurityEvent::InvalidAccessToken { cause, meta, .. } => {
                    tracing::warn!(
                        event = event.event_type(),
                        path = %meta.path,
                        cause = %cause,
                        "security event"
                    );
                }
                SecurityEvent::AccessDenied { dimension, meta, .. } => {
                    tracing::warn!(
                        event = event.event_type(),
                        path = %meta.path,
                        %dimension,
                        "security event"
                    );
                }
            }
        }
    });
}

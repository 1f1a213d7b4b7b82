//! HTTP server lifecycle wrapper.
//!
//! Binds, serves and shuts down gracefully. Protocol negotiation (HTTP/1 vs
//! HTTP/2) and TLS termination are transport concerns handled by the hosting
//! stack (hyper / a fronting proxy), not by the chassis.

use std::net::SocketAddr;

use axum::Router;

use chassis_core::Environment;

/// Bind address configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerOptions {
    pub host: String,
    pub port: u16,
}

impl ServerOptions {
    pub fn from_environment(env: &Environment) -> Self {
        Self {
            host: env.host.clone(),
            port: env.port,
        }
    }

    fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Owns the serve loop for a built router.
#[derive(Debug)]
pub struct ApiServer {
    options: ServerOptions,
}

impl ApiServer {
    pub fn new(options: ServerOptions) -> Self {
        Self { options }
    }

    /// Serve `router` until ctrl-c, then drain in-flight requests.
    pub async fn serve(self, router: Router) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.options.bind_addr()).await?;
        tracing::info!(addr = %listener.local_addr()?, "listening");

        // Connect info feeds the peer address to ip-pinned token checks.
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install shutdown handler");
    }
}

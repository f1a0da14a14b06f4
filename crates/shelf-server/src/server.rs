use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Remote Shelf upload server.
pub struct ShelfServer {
    state: AppState,
}

impl ShelfServer {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn config(&self) -> &ServerConfig {
        self.state.config()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let addr = self.config().bind_addr;
        let app = self.router();
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, state = ?self.state, "shelf server listening");
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_construction() {
        let server = ShelfServer::new(AppState::unconfigured(ServerConfig::default()));
        assert_eq!(server.config().bind_addr, "127.0.0.1:5000".parse().unwrap());
        assert!(server.state().orchestrator().is_none());
    }

    #[test]
    fn router_builds() {
        let server = ShelfServer::new(AppState::unconfigured(ServerConfig::default()));
        let _router = server.router();
    }
}

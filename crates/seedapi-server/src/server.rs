use tokio::net::TcpListener;

use seedapi_types::GeneratedData;

use crate::app::AppAssembler;
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::RouteSpec;

/// Mock REST server over one set of generated data.
pub struct SeedServer {
    config: ServerConfig,
    app: AppAssembler,
}

impl SeedServer {
    /// Create a server that mounts every resource of `data` under
    /// `config.base_path`.
    pub fn new(config: ServerConfig, data: GeneratedData) -> Self {
        let app = AppAssembler::from_data(config.base_path.clone(), data)
            .with_permissive_cors(config.permissive_cors);
        Self { config, app }
    }

    /// Server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Combined route table of all mounted resources.
    pub fn routes(&self) -> Vec<RouteSpec> {
        self.app.routes()
    }

    /// Build the router without binding (useful for testing).
    pub fn into_router(self) -> axum::Router {
        self.app.build()
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        let addr = listener.local_addr()?;
        for route in self.app.routes() {
            tracing::debug!(%route, "route");
        }
        tracing::info!(
            resources = self.app.resources().len(),
            "seedapi listening on http://{addr}{}",
            self.app.base_path()
        );
        axum::serve(listener, self.app.build())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

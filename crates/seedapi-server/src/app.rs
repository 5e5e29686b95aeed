use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use seedapi_types::{GeneratedData, ResourceData};

use crate::router::{ResourceRouter, RouteSpec};

/// Mounts one [`ResourceRouter`] per resource under a shared base path.
pub struct AppAssembler {
    base_path: String,
    resources: Vec<ResourceRouter>,
    permissive_cors: bool,
}

impl AppAssembler {
    /// Create an assembler with no resources mounted.
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            resources: Vec::new(),
            permissive_cors: false,
        }
    }

    /// An assembler with every resource of `data` mounted, in name order.
    pub fn from_data(base_path: impl Into<String>, data: GeneratedData) -> Self {
        data.into_iter()
            .fold(Self::new(base_path), |app, (name, resource)| app.mount(name, resource))
    }

    /// Mount one resource with its own store.
    pub fn mount(mut self, name: impl Into<String>, data: ResourceData) -> Self {
        let router = ResourceRouter::new(&self.base_path, name, data);
        self.resources.push(router);
        self
    }

    pub fn with_permissive_cors(mut self, enabled: bool) -> Self {
        self.permissive_cors = enabled;
        self
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn resources(&self) -> &[ResourceRouter] {
        &self.resources
    }

    /// The combined route table of all mounted resources.
    pub fn routes(&self) -> Vec<RouteSpec> {
        self.resources.iter().flat_map(ResourceRouter::routes).collect()
    }

    /// Merge all resource routers and add the HTTP layers.
    pub fn build(self) -> Router {
        let mut app = self
            .resources
            .into_iter()
            .fold(Router::new(), |app, resource| app.merge(resource.into_router()));
        if self.permissive_cors {
            app = app.layer(CorsLayer::permissive());
        }
        app.layer(TraceLayer::new_for_http())
    }
}

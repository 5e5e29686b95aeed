use std::fmt;
use std::sync::{Arc, RwLock};

use axum::http::Method;
use axum::routing::MethodRouter;
use axum::Router;

use seedapi_store::ResourceStore;
use seedapi_types::{Cardinality, ResourceData};

use crate::handler::{self, SharedStore};

/// Join a base path and a resource name into a route prefix.
///
/// Empty segments are dropped, so `("api", "user")`, `("/api/", "user")`
/// and `("/api", "/user")` all give `/api/user`, and `("/", "user")` gives
/// `/user`.
pub fn join_route(base: &str, name: &str) -> String {
    let segments: Vec<&str> = base
        .split('/')
        .chain(name.split('/'))
        .filter(|s| !s.is_empty())
        .collect();
    format!("/{}", segments.join("/"))
}

/// One CRUD operation a resource router can serve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Read,
    Replace,
    Merge,
    List,
    Insert,
    Find,
    ReplaceById,
    MergeById,
    RemoveById,
}

impl Operation {
    pub const SINGLE: [Operation; 3] = [Self::Read, Self::Replace, Self::Merge];
    pub const COLLECTION: [Operation; 6] = [
        Self::List,
        Self::Insert,
        Self::Find,
        Self::ReplaceById,
        Self::MergeById,
        Self::RemoveById,
    ];

    pub fn for_cardinality(cardinality: Cardinality) -> &'static [Operation] {
        match cardinality {
            Cardinality::Single => &Self::SINGLE,
            Cardinality::Collection => &Self::COLLECTION,
        }
    }

    pub fn method(self) -> Method {
        match self {
            Self::Read | Self::List | Self::Find => Method::GET,
            Self::Replace | Self::ReplaceById => Method::PUT,
            Self::Merge | Self::MergeById => Method::PATCH,
            Self::Insert => Method::POST,
            Self::RemoveById => Method::DELETE,
        }
    }

    /// Whether the route carries an `:id` path segment.
    pub fn takes_id(self) -> bool {
        matches!(self, Self::Find | Self::ReplaceById | Self::MergeById | Self::RemoveById)
    }

    fn attach(self, route: MethodRouter<SharedStore>) -> MethodRouter<SharedStore> {
        match self {
            Self::Read => route.get(handler::read_single),
            Self::Replace => route.put(handler::replace_single),
            Self::Merge => route.patch(handler::merge_single),
            Self::List => route.get(handler::list_items),
            Self::Insert => route.post(handler::insert_item),
            Self::Find => route.get(handler::find_item),
            Self::ReplaceById => route.put(handler::replace_item),
            Self::MergeById => route.patch(handler::merge_item),
            Self::RemoveById => route.delete(handler::remove_item),
        }
    }
}

/// A method and path pair in a router's route table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteSpec {
    pub method: Method,
    pub path: String,
}

impl fmt::Display for RouteSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// The routes of one resource, backed by that resource's own store.
pub struct ResourceRouter {
    name: String,
    prefix: String,
    cardinality: Cardinality,
    store: SharedStore,
}

impl ResourceRouter {
    /// Create a router for resource `name` mounted under `base_path`, with
    /// a fresh store holding `data`.
    pub fn new(base_path: &str, name: impl Into<String>, data: ResourceData) -> Self {
        let name = name.into();
        let store = ResourceStore::from(data);
        Self {
            prefix: join_route(base_path, &name),
            cardinality: store.cardinality(),
            store: Arc::new(RwLock::new(store)),
            name,
        }
    }

    /// The resource name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The joined route prefix, e.g. `/api/users`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Cardinality of the backing store, which picks the route set.
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    fn item_path(&self) -> String {
        format!("{}/:id", self.prefix)
    }

    /// The route table this router serves, in registration order.
    pub fn routes(&self) -> Vec<RouteSpec> {
        Operation::for_cardinality(self.cardinality)
            .iter()
            .map(|op| RouteSpec {
                method: op.method(),
                path: if op.takes_id() { self.item_path() } else { self.prefix.clone() },
            })
            .collect()
    }

    /// Build the axum router serving [`Self::routes`] over this resource's
    /// store.
    pub fn into_router(self) -> Router {
        let ops = Operation::for_cardinality(self.cardinality);
        let mut bare = MethodRouter::new();
        let mut by_id = MethodRouter::new();
        for op in ops {
            if op.takes_id() {
                by_id = op.attach(by_id);
            } else {
                bare = op.attach(bare);
            }
        }

        let mut router = Router::new().route(&self.prefix, bare);
        if ops.iter().any(|op| op.takes_id()) {
            router = router.route(&self.item_path(), by_id);
        }
        tracing::debug!(resource = %self.name, prefix = %self.prefix, "mounted resource");
        router.with_state(self.store)
    }
}

//! HTTP server for seedapi.
//!
//! Every resource gets a [`ResourceRouter`] whose route set is synthesized
//! from its cardinality:
//!
//! | Cardinality | Routes |
//! |---|---|
//! | single | `GET`, `PUT`, `PATCH` on `{base}/{name}` |
//! | collection | `GET`, `POST` on `{base}/{name}`; `GET`, `PUT`, `PATCH`, `DELETE` on `{base}/{name}/:id` |
//!
//! The [`AppAssembler`] mounts all resource routers under one base path, and
//! [`SeedServer`] binds and serves the result.

pub mod app;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use app::AppAssembler;
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::{join_route, Operation, ResourceRouter, RouteSpec};
pub use server::SeedServer;

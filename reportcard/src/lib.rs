//! # reportcard
//!
//! REST backend for school report cards. Classes, subjects, pupils,
//! enrolments and evaluations are each served by the same generic endpoint:
//! create, replace, fetch, delete and paged listing, with alert and
//! pagination headers for the browser client.
//!
//! ## Features
//!
//! - **One endpoint, five resources**: [`handlers::ResourceEndpoint`] over any [`repository::Entity`]
//! - **Stores**: in-memory by default, PostgreSQL JSONB tables with the `database` feature
//! - **Middleware stack**: request ids, panic recovery, body size limits, timeouts, CORS
//! - **Health checks**: liveness and readiness probes
//! - **Graceful shutdown**: SIGTERM and SIGINT drain in-flight requests
//!
//! ## Example
//!
//! ```rust,no_run
//! use reportcard::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let stores = Stores::open(&config).await?;
//!     let app = router(AppState::new(config.clone(), stores))?;
//!
//!     Server::new(config).serve(app).await
//! }
//! ```

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod observability;
pub mod repository;
pub mod server;
pub mod state;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::app::router;
    pub use crate::config::{AlertConfig, Config, DatabaseConfig, PaginationConfig};
    pub use crate::domain::{Classe, Eleve, Evaluation, Inscrire, Matiere};
    pub use crate::error::{Error, Result};
    pub use crate::handlers::{AlertHeaders, ApiError, ListQuery, ResourceEndpoint};
    pub use crate::health::{health, readiness};
    pub use crate::middleware::{
        request_id_layer, request_id_propagation_layer, sensitive_headers_layer,
        MakeTypedRequestId,
    };
    pub use crate::observability::init_tracing;
    pub use crate::repository::{
        Entity, MemoryRepository, Page, PageRequest, Repository, RepositoryError, SortOrder,
        Store,
    };
    pub use crate::server::Server;
    pub use crate::state::{AppState, Stores};

    pub use axum::{
        extract::{Path, Query, State},
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::{delete, get, post, put},
        Json, Router,
    };
}

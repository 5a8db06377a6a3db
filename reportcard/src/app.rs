//! Application router
//!
//! Mounts one [`ResourceEndpoint`] per record type under `/api` plus the
//! health probes. Middleware is added by [`Server`](crate::server::Server).

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::{
    config::PaginationConfig,
    error::{Error, Result},
    handlers::{AlertHeaders, ResourceEndpoint},
    health::{health, readiness},
    repository::{Entity, Store},
    state::AppState,
};

/// Build the full route table for `state`.
///
/// Fails when `alerts.application_name` cannot be used in a header name.
pub fn router(state: AppState) -> Result<Router> {
    let application_name = &state.config().alerts.application_name;
    let alerts = AlertHeaders::new(application_name.as_str()).map_err(|e| {
        Error::Internal(format!(
            "alerts.application_name {:?} is not a valid header fragment: {}",
            application_name, e
        ))
    })?;
    let paging = state.config().pagination.clone();
    let stores = state.stores().clone();

    let app = Router::new()
        .route("/health", get(health))
        .route("/ready", get(readiness))
        .with_state(state)
        .merge(resource(stores.classes, &alerts, &paging))
        .merge(resource(stores.matieres, &alerts, &paging))
        .merge(resource(stores.evaluations, &alerts, &paging))
        .merge(resource(stores.eleves, &alerts, &paging))
        .merge(resource(stores.inscriptions, &alerts, &paging));

    Ok(app)
}

fn resource<E: Entity>(
    store: Arc<Store<E>>,
    alerts: &AlertHeaders,
    paging: &PaginationConfig,
) -> Router {
    tracing::debug!(path = %E::collection_path(), backend = store.backend(), "Mounting resource");
    ResourceEndpoint::new(store, alerts.clone(), paging.clone()).router()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::state::Stores;

    #[test]
    fn test_invalid_application_name_is_rejected() {
        let mut config = Config::default();
        config.alerts.application_name = "report card".to_string();
        let state = AppState::new(config, Stores::memory());
        assert!(router(state).is_err());
    }
}

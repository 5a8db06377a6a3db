//! Generic REST endpoint over one record type
//!
//! | Method | Path | Outcome |
//! |---|---|---|
//! | POST | `/api/<name>s` | 201 + record + `Location`, or 400 `idexists` if an id was sent |
//! | PUT | `/api/<name>s` | 200 + record; a record without id is created instead |
//! | GET | `/api/<name>s` | 200 + array + paging headers |
//! | GET | `/api/<name>s/{id}` | 200 + record, or 404 with an empty body |
//! | DELETE | `/api/<name>s/{id}` | 200 + deletion alert, whether or not the id existed |
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use reportcard::config::PaginationConfig;
//! use reportcard::domain::Classe;
//! use reportcard::handlers::{AlertHeaders, ResourceEndpoint};
//! use reportcard::repository::MemoryRepository;
//!
//! let endpoint = ResourceEndpoint::new(
//!     Arc::new(MemoryRepository::<Classe>::new()),
//!     AlertHeaders::default(),
//!     PaginationConfig::default(),
//! );
//! let router: axum::Router = endpoint.router();
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{
        header::{HeaderValue, LOCATION},
        StatusCode,
    },
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::alert::AlertHeaders;
use super::error::{ApiError, ApiErrorKind, ApiOperation};
use super::paging::pagination_headers;
use super::query::ListQuery;
use crate::config::PaginationConfig;
use crate::repository::{Entity, Repository};

/// Create/read/update/delete/list for records of type `E` stored in `R`
pub struct ResourceEndpoint<E, R> {
    repository: Arc<R>,
    alerts: AlertHeaders,
    paging: PaginationConfig,
    _entity: PhantomData<fn() -> E>,
}

impl<E, R> Clone for ResourceEndpoint<E, R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            alerts: self.alerts.clone(),
            paging: self.paging.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E, R> ResourceEndpoint<E, R>
where
    E: Entity,
    R: Repository<E> + 'static,
{
    pub fn new(repository: Arc<R>, alerts: AlertHeaders, paging: PaginationConfig) -> Self {
        Self {
            repository,
            alerts,
            paging,
            _entity: PhantomData,
        }
    }

    /// Routes for this record type, mounted at [`Entity::collection_path`]
    pub fn router(self) -> Router {
        let collection = E::collection_path();
        let item = format!("{}/{{id}}", collection);
        Router::new()
            .route(
                &collection,
                get(list_handler::<E, R>)
                    .post(create_handler::<E, R>)
                    .put(update_handler::<E, R>),
            )
            .route(&item, get(get_handler::<E, R>).delete(delete_handler::<E, R>))
            .with_state(self)
    }

    /// Store a new record. A record that already has an id is rejected
    /// without touching the store.
    pub async fn create(&self, record: E) -> Result<Response, ApiError> {
        tracing::debug!(
            entity = E::ENTITY_NAME,
            record = ?record,
            "REST request to save {}",
            E::ENTITY_NAME
        );

        if record.id().is_some() {
            let headers = self.alerts.failure(
                E::ENTITY_NAME,
                "idexists",
                &format!("A new {} cannot already have an ID", E::ENTITY_NAME),
            );
            return Ok((StatusCode::BAD_REQUEST, headers).into_response());
        }

        let saved = self
            .repository
            .save(record)
            .await
            .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Create))?;
        let id = saved.id().ok_or_else(|| {
            ApiError::new(
                ApiOperation::Create,
                ApiErrorKind::InternalError,
                "Store returned a record without id",
            )
        })?;

        let mut headers = self.alerts.created(E::ENTITY_NAME, &id.to_string());
        let location = format!("{}/{}", E::collection_path(), id);
        if let Ok(location) = HeaderValue::from_str(&location) {
            headers.insert(LOCATION, location);
        }
        Ok((StatusCode::CREATED, headers, Json(saved)).into_response())
    }

    /// Replace the record with the same id. A record without id is created.
    pub async fn update(&self, record: E) -> Result<Response, ApiError> {
        tracing::debug!(
            entity = E::ENTITY_NAME,
            record = ?record,
            "REST request to update {}",
            E::ENTITY_NAME
        );

        let Some(id) = record.id() else {
            return self.create(record).await;
        };

        let saved = self.repository.save(record).await?;
        let headers = self.alerts.updated(E::ENTITY_NAME, &id.to_string());
        Ok((StatusCode::OK, headers, Json(saved)).into_response())
    }

    /// One page of records with paging headers
    pub async fn list(&self, query: ListQuery) -> Result<Response, ApiError> {
        tracing::debug!(entity = E::ENTITY_NAME, "REST request to get a page of {}s", E::ENTITY_NAME);

        let request = query.page_request(&self.paging);
        let page = self.repository.find_page(request).await?;
        let headers = pagination_headers(&page, &E::collection_path());
        Ok((StatusCode::OK, headers, Json(page.content)).into_response())
    }

    /// One record, or 404 with an empty body
    pub async fn get(&self, id: i64) -> Result<Response, ApiError> {
        tracing::debug!(entity = E::ENTITY_NAME, id, "REST request to get {}", E::ENTITY_NAME);

        match self.repository.find_by_id(id).await? {
            Some(record) => Ok((StatusCode::OK, Json(record)).into_response()),
            None => Ok(StatusCode::NOT_FOUND.into_response()),
        }
    }

    /// Delete by id; an unknown id is not an error
    pub async fn delete(&self, id: i64) -> Result<Response, ApiError> {
        tracing::debug!(entity = E::ENTITY_NAME, id, "REST request to delete {}", E::ENTITY_NAME);

        self.repository.delete(id).await?;
        let headers = self.alerts.deleted(E::ENTITY_NAME, &id.to_string());
        Ok((StatusCode::OK, headers).into_response())
    }
}

async fn create_handler<E, R>(
    State(endpoint): State<ResourceEndpoint<E, R>>,
    Json(record): Json<E>,
) -> Result<Response, ApiError>
where
    E: Entity,
    R: Repository<E> + 'static,
{
    endpoint.create(record).await
}

async fn update_handler<E, R>(
    State(endpoint): State<ResourceEndpoint<E, R>>,
    Json(record): Json<E>,
) -> Result<Response, ApiError>
where
    E: Entity,
    R: Repository<E> + 'static,
{
    endpoint.update(record).await
}

async fn list_handler<E, R>(
    State(endpoint): State<ResourceEndpoint<E, R>>,
    query: ListQuery,
) -> Result<Response, ApiError>
where
    E: Entity,
    R: Repository<E> + 'static,
{
    endpoint.list(query).await
}

async fn get_handler<E, R>(
    State(endpoint): State<ResourceEndpoint<E, R>>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError>
where
    E: Entity,
    R: Repository<E> + 'static,
{
    endpoint.get(id).await
}

async fn delete_handler<E, R>(
    State(endpoint): State<ResourceEndpoint<E, R>>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError>
where
    E: Entity,
    R: Repository<E> + 'static,
{
    endpoint.delete(id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{
        MemoryRepository, Page, PageRequest, RepositoryError, RepositoryOperation,
        RepositoryResult,
    };
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use serde::{Deserialize, Serialize};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Room {
        #[serde(default)]
        id: Option<i64>,
        #[serde(default)]
        label: Option<String>,
    }

    impl Entity for Room {
        const ENTITY_NAME: &'static str = "room";

        fn id(&self) -> Option<i64> {
            self.id
        }

        fn set_id(&mut self, id: i64) {
            self.id = Some(id);
        }
    }

    fn endpoint() -> (Arc<MemoryRepository<Room>>, Router) {
        let repository = Arc::new(MemoryRepository::new());
        let router = ResourceEndpoint::new(
            Arc::clone(&repository),
            AlertHeaders::default(),
            PaginationConfig::default(),
        )
        .router();
        (repository, router)
    }

    async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        router.clone().oneshot(request).await.unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    fn header<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
        response.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_location() {
        let (repository, router) = endpoint();
        let response = send(&router, Method::POST, "/api/rooms", Some(json!({"label": "B12"}))).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(header(&response, "location"), Some("/api/rooms/1"));
        assert_eq!(header(&response, "x-reportcardapp-alert"), Some("reportcardApp.room.created"));
        assert_eq!(header(&response, "x-reportcardapp-params"), Some("1"));
        assert_eq!(body_json(response).await, json!({"id": 1, "label": "B12"}));
        assert_eq!(repository.count().await.unwrap(), 1);
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_create_logs_the_record() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let (_, router) = endpoint();
        send(&router, Method::POST, "/api/rooms", Some(json!({"label": "B12"}))).await;

        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("REST request to save room"));
        assert!(output.contains("B12"));
    }

    #[tokio::test]
    async fn test_create_with_id_is_rejected_without_store_write() {
        let (repository, router) = endpoint();
        let response = send(
            &router,
            Method::POST,
            "/api/rooms",
            Some(json!({"id": 7, "label": "B12"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(header(&response, "x-reportcardapp-error"), Some("error.idexists"));
        assert_eq!(header(&response, "x-reportcardapp-params"), Some("room"));
        assert!(body_bytes(response).await.is_empty());
        assert_eq!(repository.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_replaces_record() {
        let (_, router) = endpoint();
        send(&router, Method::POST, "/api/rooms", Some(json!({"label": "B12"}))).await;

        let response = send(
            &router,
            Method::PUT,
            "/api/rooms",
            Some(json!({"id": 1, "label": "B14"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header(&response, "x-reportcardapp-alert"), Some("reportcardApp.room.updated"));
        assert_eq!(header(&response, "x-reportcardapp-params"), Some("1"));

        let fetched = send(&router, Method::GET, "/api/rooms/1", None).await;
        assert_eq!(body_json(fetched).await["label"], "B14");
    }

    #[tokio::test]
    async fn test_update_without_id_creates() {
        let (repository, router) = endpoint();
        let response = send(&router, Method::PUT, "/api/rooms", Some(json!({"label": "B12"}))).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(header(&response, "location"), Some("/api/rooms/1"));
        assert_eq!(header(&response, "x-reportcardapp-alert"), Some("reportcardApp.room.created"));
        assert_eq!(repository.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_with_unknown_id_inserts() {
        let (repository, router) = endpoint();
        let response = send(
            &router,
            Method::PUT,
            "/api/rooms",
            Some(json!({"id": 42, "label": "Annex"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(repository.find_by_id(42).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_get_missing_is_404_with_empty_body() {
        let (_, router) = endpoint();
        let response = send(&router, Method::GET, "/api/rooms/99", None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_get_with_non_numeric_id_is_rejected() {
        let (_, router) = endpoint();
        let response = send(&router, Method::GET, "/api/rooms/abc", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (_, router) = endpoint();
        send(&router, Method::POST, "/api/rooms", Some(json!({"label": "B12"}))).await;

        for _ in 0..2 {
            let response = send(&router, Method::DELETE, "/api/rooms/1", None).await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(header(&response, "x-reportcardapp-alert"), Some("reportcardApp.room.deleted"));
            assert_eq!(header(&response, "x-reportcardapp-params"), Some("1"));
            assert!(body_bytes(response).await.is_empty());
        }

        let response = send(&router, Method::GET, "/api/rooms/1", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_pages_and_headers() {
        let (_, router) = endpoint();
        for label in ["C", "A", "B"] {
            send(&router, Method::POST, "/api/rooms", Some(json!({ "label": label }))).await;
        }

        let response = send(&router, Method::GET, "/api/rooms?page=0&size=2&sort=label,asc", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header(&response, "x-total-count"), Some("3"));
        assert_eq!(header(&response, "x-total-pages"), Some("2"));
        let link = header(&response, "link").unwrap().to_string();
        assert!(link.contains("</api/rooms?page=1&size=2>; rel=\"next\""));
        assert!(!link.contains("rel=\"prev\""));

        let body = body_json(response).await;
        let labels: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|r| r["label"].as_str())
            .collect();
        assert_eq!(labels, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_list_empty_collection() {
        let (_, router) = endpoint();
        let response = send(&router, Method::GET, "/api/rooms", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header(&response, "x-total-count"), Some("0"));
        assert_eq!(body_json(response).await, json!([]));
    }

    struct BrokenRepository;

    impl Repository<Room> for BrokenRepository {
        async fn find_by_id(&self, _id: i64) -> RepositoryResult<Option<Room>> {
            Err(RepositoryError::connection_failed("refused"))
        }

        async fn find_page(&self, _request: PageRequest) -> RepositoryResult<Page<Room>> {
            Err(RepositoryError::database_error(RepositoryOperation::FindPage, "syntax error"))
        }

        async fn count(&self) -> RepositoryResult<u64> {
            Ok(0)
        }

        async fn save(&self, _entity: Room) -> RepositoryResult<Room> {
            Err(RepositoryError::timeout(RepositoryOperation::Save, "slow"))
        }

        async fn delete(&self, _id: i64) -> RepositoryResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_logged_once() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let router = ResourceEndpoint::new(
            Arc::new(BrokenRepository),
            AlertHeaders::default(),
            PaginationConfig::default(),
        )
        .router();
        let response = send(&router, Method::GET, "/api/rooms", None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert_eq!(output.lines().count(), 1, "{}", output);
        assert!(output.contains("syntax error"));
    }

    #[tokio::test]
    async fn test_store_failures_map_to_server_errors() {
        let router = ResourceEndpoint::new(
            Arc::new(BrokenRepository),
            AlertHeaders::default(),
            PaginationConfig::default(),
        )
        .router();

        let get = send(&router, Method::GET, "/api/rooms/1", None).await;
        assert_eq!(get.status(), StatusCode::SERVICE_UNAVAILABLE);

        let list = send(&router, Method::GET, "/api/rooms", None).await;
        assert_eq!(list.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(list).await;
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert!(!body.to_string().contains("syntax error"));

        let create = send(&router, Method::POST, "/api/rooms", Some(json!({"label": "X"}))).await;
        assert_eq!(create.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(create).await["operation"], "create");
    }
}

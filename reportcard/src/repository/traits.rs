//! Repository trait definitions
//!
//! Traits use RPITIT (Return Position Impl Trait In Traits), available since
//! Rust 1.75, so implementations can be written with plain `async fn`.
//!
//! - [`Entity`]: a record type with an optional, store-assigned `i64` id
//! - [`Repository`]: id-keyed persistence with insert-or-replace and paging
//!
//! # Example
//!
//! ```rust
//! use reportcard::repository::{Entity, MemoryRepository, PageRequest, Repository};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! struct Room {
//!     id: Option<i64>,
//!     label: String,
//! }
//!
//! impl Entity for Room {
//!     const ENTITY_NAME: &'static str = "room";
//!
//!     fn id(&self) -> Option<i64> {
//!         self.id
//!     }
//!
//!     fn set_id(&mut self, id: i64) {
//!         self.id = Some(id);
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let repo = MemoryRepository::<Room>::new();
//!     let saved = repo.save(Room { id: None, label: "B12".into() }).await.unwrap();
//!     assert_eq!(saved.id, Some(1));
//!     assert_eq!(repo.find_page(PageRequest::new(0, 10)).await.unwrap().total_elements, 1);
//! }
//! ```

use std::fmt;
use std::future::Future;

use serde::{de::DeserializeOwned, Serialize};

use super::error::RepositoryError;
use super::pagination::{Page, PageRequest};

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// A persisted record type.
///
/// `id` is `None` until the store assigns one on first save and never
/// changes afterwards. Every other field is opaque payload.
pub trait Entity: fmt::Debug + Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Lowercase singular name, used in alert headers and to derive the
    /// collection path (`/api/<name>s`).
    const ENTITY_NAME: &'static str;

    /// Identifier, if the record has been persisted
    fn id(&self) -> Option<i64>;

    /// Set the identifier. Only stores call this.
    fn set_id(&mut self, id: i64);

    /// Collection path the REST endpoint for this type is mounted on
    fn collection_path() -> String {
        format!("/api/{}s", Self::ENTITY_NAME)
    }
}

/// Id-keyed persistence for one record type
///
/// Identifier generation belongs to the implementation: each store owns its
/// own sequence, starting at 1.
pub trait Repository<E: Entity>: Send + Sync {
    /// Look a record up by id. A miss is `Ok(None)`, not an error.
    fn find_by_id(&self, id: i64) -> impl Future<Output = RepositoryResult<Option<E>>> + Send;

    /// Read one page of records.
    ///
    /// Without sort keys records come back in id order. With sort keys, id
    /// ascending is always the final tie-breaker so pages never overlap.
    fn find_page(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = RepositoryResult<Page<E>>> + Send;

    /// Number of stored records
    fn count(&self) -> impl Future<Output = RepositoryResult<u64>> + Send;

    /// Insert or replace.
    ///
    /// A record without id is inserted under the next id from the store's
    /// sequence. A record with id replaces the stored one, or is inserted
    /// under that id if none exists. Returns the record as stored.
    fn save(&self, entity: E) -> impl Future<Output = RepositoryResult<E>> + Send;

    /// Delete by id. Deleting an unknown id succeeds.
    fn delete(&self, id: i64) -> impl Future<Output = RepositoryResult<()>> + Send;
}

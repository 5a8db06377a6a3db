//! Record persistence
//!
//! Every resource is stored through the same [`Repository`] trait, keyed by a
//! store-assigned `i64` id. Two implementations ship with the crate:
//!
//! - [`MemoryRepository`]: ordered in-process map, the default
//! - `PgRepository`: one PostgreSQL table per entity (feature `database`)
//!
//! [`Store`] wraps whichever of the two the binary selects at startup.
//!
//! Both honour the same paging contract: 0-indexed pages, optional sort keys
//! on serialized field names, id ascending as the final tie-breaker.

mod error;
mod memory;
mod pagination;
mod store;
mod traits;

#[cfg(feature = "database")]
mod postgres;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::MemoryRepository;
pub use pagination::{OrderDirection, Page, PageRequest, SortOrder};
pub use store::Store;
pub use traits::{Entity, Repository, RepositoryResult};

#[cfg(feature = "database")]
pub use postgres::{connect, PgRepository};

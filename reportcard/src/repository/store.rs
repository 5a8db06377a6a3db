//! Backend selection
//!
//! [`Repository`] uses `impl Future` returns, so it cannot be boxed as a trait
//! object. [`Store`] is the closed set of backends the binary can pick from at
//! startup and forwards each call to the one it holds.

use super::memory::MemoryRepository;
use super::pagination::{Page, PageRequest};
use super::traits::{Entity, Repository, RepositoryResult};

#[cfg(feature = "database")]
use super::postgres::PgRepository;

/// A repository chosen at runtime
pub enum Store<E> {
    Memory(MemoryRepository<E>),
    #[cfg(feature = "database")]
    Postgres(PgRepository<E>),
}

impl<E: Entity> Store<E> {
    /// Name of the backend, for logs and readiness reports
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            #[cfg(feature = "database")]
            Self::Postgres(_) => "postgres",
        }
    }
}

impl<E: Entity> Default for Store<E> {
    fn default() -> Self {
        Self::Memory(MemoryRepository::new())
    }
}

impl<E: Entity> From<MemoryRepository<E>> for Store<E> {
    fn from(repository: MemoryRepository<E>) -> Self {
        Self::Memory(repository)
    }
}

#[cfg(feature = "database")]
impl<E: Entity> From<PgRepository<E>> for Store<E> {
    fn from(repository: PgRepository<E>) -> Self {
        Self::Postgres(repository)
    }
}

impl<E: Entity> Repository<E> for Store<E> {
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<E>> {
        match self {
            Self::Memory(r) => r.find_by_id(id).await,
            #[cfg(feature = "database")]
            Self::Postgres(r) => r.find_by_id(id).await,
        }
    }

    async fn find_page(&self, request: PageRequest) -> RepositoryResult<Page<E>> {
        match self {
            Self::Memory(r) => r.find_page(request).await,
            #[cfg(feature = "database")]
            Self::Postgres(r) => r.find_page(request).await,
        }
    }

    async fn count(&self) -> RepositoryResult<u64> {
        match self {
            Self::Memory(r) => r.count().await,
            #[cfg(feature = "database")]
            Self::Postgres(r) => r.count().await,
        }
    }

    async fn save(&self, entity: E) -> RepositoryResult<E> {
        match self {
            Self::Memory(r) => r.save(entity).await,
            #[cfg(feature = "database")]
            Self::Postgres(r) => r.save(entity).await,
        }
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        match self {
            Self::Memory(r) => r.delete(id).await,
            #[cfg(feature = "database")]
            Self::Postgres(r) => r.delete(id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Matiere;

    #[tokio::test]
    async fn test_default_store_is_memory_and_forwards() {
        let store = Store::<Matiere>::default();
        assert_eq!(store.backend(), "memory");

        let saved = store
            .save(Matiere {
                name: Some("Calcul".to_string()),
                coefficient: Some(3.0),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(saved.id, Some(1));
        assert_eq!(store.find_by_id(1).await.unwrap(), Some(saved));
        assert_eq!(store.count().await.unwrap(), 1);
    }
}

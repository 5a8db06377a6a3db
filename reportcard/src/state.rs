//! Application state shared across handlers

use std::sync::Arc;

use crate::{
    config::Config,
    domain::{Classe, Eleve, Evaluation, Inscrire, Matiere},
    error::Result,
    repository::{Entity, Repository, RepositoryResult, Store},
};

/// One store per record type
///
/// Each store owns its id sequence, so ids are unique per resource only.
#[derive(Clone)]
pub struct Stores {
    pub classes: Arc<Store<Classe>>,
    pub matieres: Arc<Store<Matiere>>,
    pub evaluations: Arc<Store<Evaluation>>,
    pub eleves: Arc<Store<Eleve>>,
    pub inscriptions: Arc<Store<Inscrire>>,
}

impl Stores {
    /// Empty in-memory stores
    pub fn memory() -> Self {
        Self {
            classes: Arc::default(),
            matieres: Arc::default(),
            evaluations: Arc::default(),
            eleves: Arc::default(),
            inscriptions: Arc::default(),
        }
    }

    /// PostgreSQL-backed stores, creating missing tables
    #[cfg(feature = "database")]
    pub async fn postgres(pool: sqlx::PgPool) -> RepositoryResult<Self> {
        Ok(Self {
            classes: Arc::new(migrated(pool.clone()).await?),
            matieres: Arc::new(migrated(pool.clone()).await?),
            evaluations: Arc::new(migrated(pool.clone()).await?),
            eleves: Arc::new(migrated(pool.clone()).await?),
            inscriptions: Arc::new(migrated(pool).await?),
        })
    }

    /// Stores for `config`: PostgreSQL when a database is configured and the
    /// `database` feature is built in, memory otherwise.
    pub async fn open(config: &Config) -> Result<Self> {
        match config.database {
            #[cfg(feature = "database")]
            Some(ref database) => {
                tracing::info!(
                    max_connections = database.max_connections,
                    "Connecting to PostgreSQL"
                );
                let pool = crate::repository::connect(database).await?;
                Ok(Self::postgres(pool).await?)
            }
            #[cfg(not(feature = "database"))]
            Some(_) => {
                tracing::warn!(
                    "Database configured but the `database` feature is not built in; using in-memory stores"
                );
                Ok(Self::memory())
            }
            None => {
                tracing::info!("No database configured; using in-memory stores");
                Ok(Self::memory())
            }
        }
    }

    /// Probe every store with a `count`
    pub async fn probe(&self) -> Vec<StoreProbe> {
        vec![
            probe(&self.classes).await,
            probe(&self.matieres).await,
            probe(&self.evaluations).await,
            probe(&self.eleves).await,
            probe(&self.inscriptions).await,
        ]
    }
}

#[cfg(feature = "database")]
async fn migrated<E: Entity>(pool: sqlx::PgPool) -> RepositoryResult<Store<E>> {
    let repository = crate::repository::PgRepository::new(pool);
    repository.migrate().await?;
    Ok(repository.into())
}

/// Outcome of probing one store
#[derive(Debug)]
pub struct StoreProbe {
    pub entity: &'static str,
    pub backend: &'static str,
    pub result: RepositoryResult<u64>,
}

async fn probe<E: Entity>(store: &Store<E>) -> StoreProbe {
    StoreProbe {
        entity: E::ENTITY_NAME,
        backend: store.backend(),
        result: store.count().await,
    }
}

/// Application state
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    stores: Stores,
}

impl AppState {
    pub fn new(config: Config, stores: Stores) -> Self {
        Self {
            config: Arc::new(config),
            stores,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_stores_are_independent() {
        let stores = Stores::memory();
        let classe = stores.classes.save(Classe::default()).await.unwrap();
        let matiere = stores.matieres.save(Matiere::default()).await.unwrap();

        assert_eq!(classe.id, Some(1));
        assert_eq!(matiere.id, Some(1));
        assert_eq!(stores.eleves.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_open_without_database_uses_memory() {
        let stores = Stores::open(&Config::default()).await.unwrap();
        assert_eq!(stores.classes.backend(), "memory");
    }

    #[tokio::test]
    async fn test_probe_reports_every_store() {
        let stores = Stores::memory();
        stores.eleves.save(Eleve::default()).await.unwrap();

        let probes = stores.probe().await;
        let entities: Vec<&str> = probes.iter().map(|p| p.entity).collect();
        assert_eq!(
            entities,
            vec!["classe", "matiere", "evaluation", "eleve", "inscrire"]
        );
        let eleves = probes.iter().find(|p| p.entity == "eleve").unwrap();
        assert_eq!(eleves.result, Ok(1));
    }

    #[test]
    fn test_state_exposes_config() {
        let state = AppState::new(Config::default(), Stores::memory());
        assert_eq!(state.config().service.name, "reportcard");
    }
}

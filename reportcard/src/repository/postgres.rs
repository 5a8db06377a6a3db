//! PostgreSQL repository (feature `database`)
//!
//! One table per entity, named after [`Entity::ENTITY_NAME`]. The id lives in
//! a `BIGSERIAL` column; every other field is stored as a JSONB document, so
//! adding a field to an entity needs no migration.

use std::marker::PhantomData;

use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Postgres, QueryBuilder, Row};

use super::error::{RepositoryError, RepositoryOperation};
use super::pagination::{Page, PageRequest};
use super::traits::{Entity, Repository, RepositoryResult};
use crate::config::DatabaseConfig;

/// Open a connection pool from configuration
pub async fn connect(config: &DatabaseConfig) -> RepositoryResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connection_timeout())
        .connect(&config.url)
        .await
        .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::Migrate, e))
}

// Moves the id sequence past an explicitly supplied id ($1). The sequence
// only ever moves forward; an id at or below its last value leaves it alone.
fn advance_sequence_sql(table: &str) -> String {
    format!(
        "SELECT setval(pg_get_serial_sequence('{table}', 'id'), $1) \
         WHERE $1 > COALESCE(\
         pg_sequence_last_value(pg_get_serial_sequence('{table}', 'id')::regclass), 0)"
    )
}

/// Repository storing one entity type in PostgreSQL
pub struct PgRepository<E> {
    pool: PgPool,
    table: &'static str,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> PgRepository<E> {
    /// Create a repository over `pool`. Call [`migrate`](Self::migrate) once
    /// before use.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            table: E::ENTITY_NAME,
            _entity: PhantomData,
        }
    }

    /// Create the backing table if it does not exist
    pub async fn migrate(&self) -> RepositoryResult<()> {
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {} (id BIGSERIAL PRIMARY KEY, data JSONB NOT NULL)",
            self.table
        );
        sqlx::query(&ddl)
            .execute(&self.pool)
            .await
            .map_err(|e| self.error(RepositoryOperation::Migrate, e))?;
        tracing::debug!(table = self.table, "Table ready");
        Ok(())
    }

    fn error(&self, operation: RepositoryOperation, err: sqlx::Error) -> RepositoryError {
        RepositoryError::from_sqlx(operation, err).with_entity_type(E::ENTITY_NAME)
    }

    fn decode(&self, operation: RepositoryOperation, row: &PgRow) -> RepositoryResult<E> {
        let id: i64 = row.try_get("id").map_err(|e| self.error(operation, e))?;
        let data: Value = row.try_get("data").map_err(|e| self.error(operation, e))?;
        let mut entity: E = serde_json::from_value(data).map_err(|e| {
            RepositoryError::serialization_error(operation, e.to_string())
                .with_entity(E::ENTITY_NAME, id.to_string())
        })?;
        entity.set_id(id);
        Ok(entity)
    }

    fn document(&self, entity: &E) -> RepositoryResult<Value> {
        let mut document = serde_json::to_value(entity).map_err(|e| {
            RepositoryError::serialization_error(RepositoryOperation::Save, e.to_string())
                .with_entity_type(E::ENTITY_NAME)
        })?;
        if let Value::Object(ref mut fields) = document {
            fields.remove("id");
        }
        Ok(document)
    }
}

impl<E: Entity> Repository<E> for PgRepository<E> {
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<E>> {
        let sql = format!("SELECT id, data FROM {} WHERE id = $1", self.table);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| self.error(RepositoryOperation::FindById, e))?;
        row.map(|row| self.decode(RepositoryOperation::FindById, &row))
            .transpose()
    }

    async fn find_page(&self, request: PageRequest) -> RepositoryResult<Page<E>> {
        let total = self.count().await?;

        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT id, data FROM {} ORDER BY ", self.table));
        for order in &request.sort {
            query
                .push("data -> ")
                .push_bind(order.property.clone())
                .push(" ")
                .push(order.direction.as_sql())
                .push(", ");
        }
        query
            .push("id ASC LIMIT ")
            .push_bind(i64::try_from(request.size).unwrap_or(i64::MAX))
            .push(" OFFSET ")
            .push_bind(i64::try_from(request.offset()).unwrap_or(i64::MAX));

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| self.error(RepositoryOperation::FindPage, e))?;
        let content = rows
            .iter()
            .map(|row| self.decode(RepositoryOperation::FindPage, row))
            .collect::<RepositoryResult<Vec<E>>>()?;
        Ok(Page::new(content, &request, total))
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let count: i64 = sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| self.error(RepositoryOperation::Count, e))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn save(&self, mut entity: E) -> RepositoryResult<E> {
        let document = self.document(&entity)?;
        match entity.id() {
            None => {
                let sql = format!("INSERT INTO {} (data) VALUES ($1) RETURNING id", self.table);
                let id: i64 = sqlx::query_scalar(&sql)
                    .bind(document)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| self.error(RepositoryOperation::Save, e))?;
                entity.set_id(id);
            }
            Some(id) => {
                let upsert = format!(
                    "INSERT INTO {} (id, data) VALUES ($1, $2) \
                     ON CONFLICT (id) DO UPDATE SET data = EXCLUDED.data",
                    self.table
                );
                sqlx::query(&upsert)
                    .bind(id)
                    .bind(document)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| self.error(RepositoryOperation::Save, e))?;

                sqlx::query(&advance_sequence_sql(self.table))
                    .bind(id)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| self.error(RepositoryOperation::Save, e))?;
            }
        }
        Ok(entity)
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table);
        sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| self.error(RepositoryOperation::Delete, e))?;
        Ok(())
    }
}

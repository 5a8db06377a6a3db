//! In-process repository backed by an ordered map
//!
//! Used when no database is configured, and in tests. Each repository owns
//! its id sequence; ids start at 1 and never go backwards, so an explicit id
//! saved above the sequence pushes the sequence past it. Once `i64::MAX` has
//! been handed out the sequence is exhausted and inserts without id fail.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde_json::Value;
use tokio::sync::RwLock;

use super::error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
use super::pagination::{OrderDirection, Page, PageRequest, SortOrder};
use super::traits::{Entity, Repository, RepositoryResult};

struct Inner<E> {
    records: BTreeMap<i64, E>,
    // None once exhausted
    next_id: Option<i64>,
}

/// Repository keeping records in memory
pub struct MemoryRepository<E> {
    inner: RwLock<Inner<E>>,
}

impl<E: Entity> MemoryRepository<E> {
    /// Create an empty repository whose first assigned id is 1
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                records: BTreeMap::new(),
                next_id: Some(1),
            }),
        }
    }
}

impl<E: Entity> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Repository<E> for MemoryRepository<E> {
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<E>> {
        Ok(self.inner.read().await.records.get(&id).cloned())
    }

    async fn find_page(&self, request: PageRequest) -> RepositoryResult<Page<E>> {
        let inner = self.inner.read().await;
        let total = inner.records.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let size = usize::try_from(request.size).unwrap_or(usize::MAX);

        if request.sort.is_empty() {
            let content = inner
                .records
                .values()
                .skip(offset)
                .take(size)
                .cloned()
                .collect();
            return Ok(Page::new(content, &request, total));
        }

        let mut keyed = Vec::with_capacity(inner.records.len());
        for (id, record) in &inner.records {
            let document = serde_json::to_value(record).map_err(|e| {
                RepositoryError::serialization_error(RepositoryOperation::FindPage, e.to_string())
                    .with_entity(E::ENTITY_NAME, id.to_string())
            })?;
            keyed.push((*id, document, record));
        }

        keyed.sort_by(|(a_id, a_doc, _), (b_id, b_doc, _)| {
            compare_documents(a_doc, b_doc, &request.sort).then(a_id.cmp(b_id))
        });

        let content = keyed
            .into_iter()
            .skip(offset)
            .take(size)
            .map(|(_, _, record)| record.clone())
            .collect();
        Ok(Page::new(content, &request, total))
    }

    async fn count(&self) -> RepositoryResult<u64> {
        Ok(self.inner.read().await.records.len() as u64)
    }

    async fn save(&self, mut entity: E) -> RepositoryResult<E> {
        let mut inner = self.inner.write().await;
        let id = match entity.id() {
            Some(id) => {
                if inner.next_id.is_some_and(|next| id >= next) {
                    inner.next_id = id.checked_add(1);
                }
                id
            }
            None => {
                let id = inner.next_id.ok_or_else(|| {
                    RepositoryError::new(
                        RepositoryOperation::Save,
                        RepositoryErrorKind::Other,
                        "id sequence exhausted",
                    )
                    .with_entity_type(E::ENTITY_NAME)
                })?;
                inner.next_id = id.checked_add(1);
                entity.set_id(id);
                id
            }
        };
        inner.records.insert(id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        self.inner.write().await.records.remove(&id);
        Ok(())
    }
}

fn compare_documents(a: &Value, b: &Value, sort: &[SortOrder]) -> Ordering {
    for order in sort {
        let ordering = compare_fields(a.get(&order.property), b.get(&order.property));
        let ordering = match order.direction {
            OrderDirection::Ascending => ordering,
            OrderDirection::Descending => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

// Same order as PostgreSQL jsonb: null < string < number < boolean < array
// < object. A missing field sorts after every present value.
fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match type_rank(a).cmp(&type_rank(b)) {
            Ordering::Equal => compare_same_type(a, b),
            other => other,
        },
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::String(_) => 1,
        Value::Number(_) => 2,
        Value::Bool(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn compare_same_type(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => a
                .as_f64()
                .partial_cmp(&b.as_f64())
                .unwrap_or(Ordering::Equal),
        },
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::RwLock;

use super::{InsertOutcome, Predicate, Row, Store, StoreError, Value};

/// In-memory `Store` for tests and embedders. One latched row vector per
/// relation; `insert_unless` decides under the write latch, which gives it
/// the same atomicity a server-side conditional insert has.
pub struct InMemoryStore {
    relations: DashMap<String, Arc<RwLock<Vec<Row>>>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            relations: DashMap::new(),
        }
    }

    fn table(&self, relation: &str) -> Arc<RwLock<Vec<Row>>> {
        self.relations
            .entry(relation.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(Vec::new())))
            .value()
            .clone()
    }

    pub async fn row_count(&self, relation: &str) -> usize {
        self.table(relation).read().await.len()
    }
}

fn value_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => None,
        },
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn matches_one(row: &Row, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::Eq(column, value) => row.get(column) == Some(value),
        Predicate::Lt(column, value) => row
            .get(column)
            .and_then(|v| value_cmp(v, value))
            .is_some_and(|o| o == Ordering::Less),
        Predicate::Gt(column, value) => row
            .get(column)
            .and_then(|v| value_cmp(v, value))
            .is_some_and(|o| o == Ordering::Greater),
        Predicate::Gte(column, value) => row
            .get(column)
            .and_then(|v| value_cmp(v, value))
            .is_some_and(|o| o != Ordering::Less),
        Predicate::In(column, values) => row.get(column).is_some_and(|v| values.contains(v)),
        Predicate::Or(branches) => branches.iter().any(|conjunction| matches(row, conjunction)),
    }
}

fn matches(row: &Row, predicates: &[Predicate]) -> bool {
    predicates.iter().all(|p| matches_one(row, p))
}

#[async_trait]
impl Store for InMemoryStore {
    async fn select(
        &self,
        relation: &str,
        columns: &[&str],
        predicates: &[Predicate],
    ) -> Result<Vec<Row>, StoreError> {
        let table = self.table(relation);
        let rows = table.read().await;
        Ok(rows
            .iter()
            .filter(|row| matches(row, predicates))
            .map(|row| row.project(columns))
            .collect())
    }

    async fn insert(&self, relation: &str, row: Row) -> Result<(), StoreError> {
        let table = self.table(relation);
        table.write().await.push(row);
        Ok(())
    }

    async fn update(
        &self,
        relation: &str,
        patch: Row,
        predicates: &[Predicate],
    ) -> Result<u64, StoreError> {
        let table = self.table(relation);
        let mut rows = table.write().await;
        let mut changed = 0;
        for row in rows.iter_mut() {
            if matches(row, predicates) {
                row.merge(&patch);
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn upsert(&self, relation: &str, row: Row, conflict_key: &str) -> Result<(), StoreError> {
        let table = self.table(relation);
        let mut rows = table.write().await;
        let key = row.get(conflict_key).cloned();
        if let Some(existing) = rows
            .iter_mut()
            .find(|r| key.is_some() && r.get(conflict_key) == key.as_ref())
        {
            *existing = row;
        } else {
            rows.push(row);
        }
        Ok(())
    }

    async fn insert_unless(
        &self,
        relation: &str,
        row: Row,
        guard: &[Predicate],
    ) -> Result<InsertOutcome, StoreError> {
        let table = self.table(relation);
        let mut rows = table.write().await;
        let blocking: Vec<Row> = rows.iter().filter(|r| matches(r, guard)).cloned().collect();
        if !blocking.is_empty() {
            return Ok(InsertOutcome::Refused(blocking));
        }
        rows.push(row);
        Ok(InsertOutcome::Inserted)
    }
}

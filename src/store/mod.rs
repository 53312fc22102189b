//! Declarative interface to the external relational store. The engine never
//! builds SQL or HTTP itself; it describes what it wants as predicates and
//! lets the store adapter translate.

pub mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;
use ulid::Ulid;

/// Column values travel as JSON, which is what a hosted store speaks anyway.
pub type Value = serde_json::Value;

pub fn ident_value(id: Ulid) -> Value {
    Value::String(id.to_string())
}

pub fn opt_ident_value(id: Option<Ulid>) -> Value {
    match id {
        Some(id) => ident_value(id),
        None => Value::Null,
    }
}

pub fn opt_text_value(text: Option<&str>) -> Value {
    match text {
        Some(t) => Value::String(t.to_string()),
        None => Value::Null,
    }
}

/// Row predicate. A slice of predicates is a conjunction; `Or` nests
/// alternative conjunctions, which is the one disjunctive shape the engine
/// needs (one branch per selected resource column).
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq(&'static str, Value),
    Lt(&'static str, Value),
    Gt(&'static str, Value),
    Gte(&'static str, Value),
    In(&'static str, Vec<Value>),
    Or(Vec<Vec<Predicate>>),
}

/// One stored row: column name → value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row(BTreeMap<String, Value>);

impl Row {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.0.insert(column.to_string(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn merge(&mut self, patch: &Row) {
        for (column, value) in &patch.0 {
            self.0.insert(column.clone(), value.clone());
        }
    }

    /// Keep only the named columns. An empty list keeps everything.
    pub fn project(&self, columns: &[&str]) -> Row {
        if columns.is_empty() {
            return self.clone();
        }
        let mut out = BTreeMap::new();
        for &column in columns {
            if let Some(value) = self.0.get(column) {
                out.insert(column.to_string(), value.clone());
            }
        }
        Row(out)
    }

    fn required(&self, column: &str) -> Result<&Value, StoreError> {
        self.get(column)
            .ok_or_else(|| StoreError::Malformed(format!("missing column `{column}`")))
    }

    pub fn text(&self, column: &str) -> Result<&str, StoreError> {
        self.required(column)?
            .as_str()
            .ok_or_else(|| StoreError::Malformed(format!("column `{column}` is not text")))
    }

    pub fn opt_text(&self, column: &str) -> Result<Option<String>, StoreError> {
        match self.get(column) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(StoreError::Malformed(format!(
                "column `{column}` is not text"
            ))),
        }
    }

    pub fn integer(&self, column: &str) -> Result<i64, StoreError> {
        self.required(column)?
            .as_i64()
            .ok_or_else(|| StoreError::Malformed(format!("column `{column}` is not an integer")))
    }

    pub fn flag(&self, column: &str) -> Result<bool, StoreError> {
        self.required(column)?
            .as_bool()
            .ok_or_else(|| StoreError::Malformed(format!("column `{column}` is not a boolean")))
    }

    pub fn ident(&self, column: &str) -> Result<Ulid, StoreError> {
        self.text(column)?
            .parse()
            .map_err(|_| StoreError::Malformed(format!("column `{column}` is not an id")))
    }

    pub fn opt_ident(&self, column: &str) -> Result<Option<Ulid>, StoreError> {
        match self.opt_text(column)? {
            None => Ok(None),
            Some(s) => s
                .parse()
                .map(Some)
                .map_err(|_| StoreError::Malformed(format!("column `{column}` is not an id"))),
        }
    }
}

/// Outcome of a guarded insert.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Inserted,
    /// The guard matched; nothing was written. Carries the matching rows.
    Refused(Vec<Row>),
}

#[derive(Debug)]
pub enum StoreError {
    /// Transport or backend failure. Always retryable at the caller's
    /// discretion; the engine never retries.
    Unavailable(String),
    /// A row came back in a shape the engine cannot read.
    Malformed(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
            StoreError::Malformed(msg) => write!(f, "malformed row: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// The store surface the engine needs. `select` with an empty predicate list
/// matches every row; an empty column list selects every column.
#[async_trait]
pub trait Store: Send + Sync {
    async fn select(
        &self,
        relation: &str,
        columns: &[&str],
        predicates: &[Predicate],
    ) -> Result<Vec<Row>, StoreError>;

    async fn insert(&self, relation: &str, row: Row) -> Result<(), StoreError>;

    /// Apply `patch` to every matching row. Returns the number of rows changed.
    async fn update(
        &self,
        relation: &str,
        patch: Row,
        predicates: &[Predicate],
    ) -> Result<u64, StoreError>;

    /// Insert, or replace the row sharing `conflict_key`.
    async fn upsert(&self, relation: &str, row: Row, conflict_key: &str) -> Result<(), StoreError>;

    /// Atomically insert `row` unless any existing row matches `guard`,
    /// evaluated server-side under the relation's write latch. This is the
    /// primitive that makes check-then-write a single step.
    async fn insert_unless(
        &self,
        relation: &str,
        row: Row,
        guard: &[Predicate],
    ) -> Result<InsertOutcome, StoreError>;
}

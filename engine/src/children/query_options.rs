//! Query options shared by the document and schema views.

use serde_json::{Value, json};
use thiserror::Error;

use scout_types::StatePath;

use super::{ChangeLog, ChildState, assign};

pub const DEFAULT_LIMIT: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueryOptionsError {
    #[error("{0} must be a JSON object")]
    NotADocument(StatePath),
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    query: Value,
    sort: Value,
    limit: u64,
    skip: u64,
    default_limit: u64,
    changes: ChangeLog,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self::with_default_limit(DEFAULT_LIMIT)
    }
}

fn default_query() -> Value {
    json!({})
}

fn default_sort() -> Value {
    json!({"_id": -1})
}

impl QueryOptions {
    /// Options whose `limit` (and `reset` target) is `limit`.
    #[must_use]
    pub fn with_default_limit(limit: u64) -> Self {
        Self {
            query: default_query(),
            sort: default_sort(),
            limit,
            skip: 0,
            default_limit: limit,
            changes: ChangeLog::default(),
        }
    }

    #[must_use]
    pub fn query(&self) -> &Value {
        &self.query
    }

    #[must_use]
    pub fn sort(&self) -> &Value {
        &self.sort
    }

    #[must_use]
    pub fn limit(&self) -> u64 {
        self.limit
    }

    #[must_use]
    pub fn skip(&self) -> u64 {
        self.skip
    }

    pub fn set_query(&mut self, query: Value) -> Result<(), QueryOptionsError> {
        if !query.is_object() {
            return Err(QueryOptionsError::NotADocument(StatePath::QueryOptionsQuery));
        }
        assign(&mut self.query, query, StatePath::QueryOptionsQuery, &mut self.changes);
        Ok(())
    }

    pub fn set_sort(&mut self, sort: Value) -> Result<(), QueryOptionsError> {
        if !sort.is_object() {
            return Err(QueryOptionsError::NotADocument(StatePath::QueryOptionsSort));
        }
        assign(&mut self.sort, sort, StatePath::QueryOptionsSort, &mut self.changes);
        Ok(())
    }

    pub fn set_limit(&mut self, limit: u64) {
        assign(&mut self.limit, limit, StatePath::QueryOptionsLimit, &mut self.changes);
    }

    pub fn set_skip(&mut self, skip: u64) {
        assign(&mut self.skip, skip, StatePath::QueryOptionsSkip, &mut self.changes);
    }

    pub fn reset(&mut self) {
        assign(&mut self.query, default_query(), StatePath::QueryOptionsQuery, &mut self.changes);
        assign(&mut self.sort, default_sort(), StatePath::QueryOptionsSort, &mut self.changes);
        assign(&mut self.limit, self.default_limit, StatePath::QueryOptionsLimit, &mut self.changes);
        assign(&mut self.skip, 0, StatePath::QueryOptionsSkip, &mut self.changes);
    }
}

impl ChildState for QueryOptions {
    fn drain_changes(&mut self) -> Vec<StatePath> {
        self.changes.drain()
    }
}

//! Query filters and projections over JSON documents.
//!
//! A [`Filter`] is a conjunction of equality tests. Keys may be dotted paths
//! (`creator.email`) reaching into nested objects. A [`Projection`] trims the
//! fields of returned documents.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    /// Matches every document.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn field(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((path.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, document: &Value) -> bool {
        self.conditions
            .iter()
            .all(|(path, expected)| lookup(document, path) == Some(expected))
    }

    /// The filter as a nested object, for JSON containment (`@>`) queries.
    pub fn to_containment(&self) -> Value {
        let mut root = Map::new();
        for (path, value) in &self.conditions {
            let segments: Vec<&str> = path.split('.').collect();
            insert_path(&mut root, &segments, value.clone());
        }
        Value::Object(root)
    }
}

fn insert_path(target: &mut Map<String, Value>, segments: &[&str], value: Value) {
    match segments {
        [] => {}
        [last] => {
            target.insert(last.to_string(), value);
        }
        [head, rest @ ..] => {
            let entry = target
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(child) = entry {
                insert_path(child, rest, value);
            }
        }
    }
}

/// Resolves a dotted path inside a JSON value.
pub fn lookup<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |current, segment| current.as_object()?.get(segment))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Projection {
    #[default]
    All,
    /// Keep only these top-level fields.
    Include(Vec<String>),
    /// Drop these top-level fields.
    Exclude(Vec<String>),
}

impl Projection {
    pub fn exclude<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Projection::Exclude(fields.into_iter().map(Into::into).collect())
    }

    pub fn include<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Projection::Include(fields.into_iter().map(Into::into).collect())
    }

    pub fn apply(&self, document: Value) -> Value {
        match (self, document) {
            (Projection::All, document) => document,
            (Projection::Include(fields), Value::Object(map)) => Value::Object(
                map.into_iter()
                    .filter(|(key, _)| fields.iter().any(|f| f == key))
                    .collect(),
            ),
            (Projection::Exclude(fields), Value::Object(map)) => Value::Object(
                map.into_iter()
                    .filter(|(key, _)| !fields.iter().any(|f| f == key))
                    .collect(),
            ),
            (_, other) => other,
        }
    }
}

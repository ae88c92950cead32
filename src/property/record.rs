//! Live records that conditions are evaluated against

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::property::schema::Schema;
use crate::value::Value;

/// Current value of one property of a live record
#[derive(Debug, Clone)]
pub enum FieldValue<'a> {
    /// No value (`None`, missing bag entry)
    Null,
    Value(Value),
    Values(Vec<Value>),
    Record(&'a dyn Record),
    Records(Vec<&'a dyn Record>),
}

impl<'a> FieldValue<'a> {
    pub fn value(value: impl Into<Value>) -> Self {
        FieldValue::Value(value.into())
    }

    pub fn optional<V: Into<Value>>(value: Option<V>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::value)
    }

    pub fn values<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        FieldValue::Values(values.into_iter().map(Into::into).collect())
    }

    pub fn record<R: Record>(record: Option<&'a R>) -> Self {
        record.map_or(FieldValue::Null, |r| FieldValue::Record(r))
    }

    pub fn records<R: Record>(records: &'a [R]) -> Self {
        FieldValue::Records(records.iter().map(|r| r as &dyn Record).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl std::fmt::Debug for dyn Record + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Record")
    }
}

/// A value that filters can read properties from
pub trait Record {
    /// Current value of the named property, `None` when the property does
    /// not exist on this record
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;

    /// Flat records answer whole dotted paths in one lookup
    fn is_flat(&self) -> bool {
        false
    }
}

/// A statically-typed record with a declared schema
pub trait Searchable: Record {
    fn schema() -> &'static Schema;
}

/// Resolve a dotted path against a live record
///
/// Collections of nested records along the way fan out, so the result holds
/// one entry per terminal property reached. `Null` terminals are dropped.
pub fn resolve_live<'a>(record: &'a dyn Record, path: &str) -> Result<Vec<FieldValue<'a>>> {
    if record.is_flat() {
        let field = record
            .field(path)
            .ok_or_else(|| SearchError::Unresolvable(path.to_string()))?;
        return Ok(if field.is_null() { Vec::new() } else { vec![field] });
    }

    let mut frontier: Vec<&'a dyn Record> = vec![record];
    let mut segments = path.split('.').peekable();
    let mut terminals = Vec::new();
    while let Some(segment) = segments.next() {
        let last = segments.peek().is_none();
        let mut next = Vec::new();
        for current in frontier {
            let field = current
                .field(segment)
                .ok_or_else(|| SearchError::Unresolvable(path.to_string()))?;
            match field {
                FieldValue::Null => {}
                field if last => terminals.push(field),
                FieldValue::Record(nested) => next.push(nested),
                FieldValue::Records(nested) => next.extend(nested),
                FieldValue::Value(_) | FieldValue::Values(_) => {
                    return Err(SearchError::TypeMismatch {
                        property: path.to_string(),
                        detail: format!("'{}' is not a nested record", segment),
                    });
                }
            }
        }
        frontier = next;
    }
    Ok(terminals)
}

/// Dynamic name/value record
///
/// Keys may contain dots (`complex.name`); they are looked up as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyBag {
    values: AHashMap<String, String>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for PropertyBag
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Record for PropertyBag {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(FieldValue::optional(self.get(name)))
    }

    fn is_flat(&self) -> bool {
        true
    }
}

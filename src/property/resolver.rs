//! Declared-type resolution of property paths

use ahash::AHashMap;
use std::fmt;

use crate::error::{Result, SearchError};
use crate::property::path::PropertyPath;
use crate::property::record::Searchable;
use crate::property::schema::{PropertyKind, Schema, TypeInfo};
use crate::value::ValueType;

/// Resolves the declared type of the final segment of a property path
pub trait PropertyResolver: Send + Sync + fmt::Debug {
    fn resolve(&self, path: &PropertyPath) -> Result<TypeInfo>;
}

/// Resolver over the schema of a statically-typed record
#[derive(Debug, Clone, Copy)]
pub struct StaticResolver {
    schema: &'static Schema,
}

impl StaticResolver {
    pub fn new(schema: &'static Schema) -> Self {
        Self { schema }
    }

    pub fn of<T: Searchable>() -> Self {
        Self::new(T::schema())
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }
}

impl PropertyResolver for StaticResolver {
    fn resolve(&self, path: &PropertyPath) -> Result<TypeInfo> {
        let unknown = |segment: &str| SearchError::UnknownProperty {
            path: path.to_dotted(),
            segment: segment.to_string(),
        };

        let Some((last, parents)) = path.segments().split_last() else {
            return Err(SearchError::InvalidPropertyPath(path.to_string()));
        };

        // Collections of records are walked through to their element schema
        let mut schema = self.schema;
        for segment in parents {
            let descriptor = schema.property(segment).ok_or_else(|| unknown(segment.as_str()))?;
            schema = match descriptor.kind() {
                PropertyKind::Record(nested) => nested(),
                PropertyKind::Value(_) => {
                    return Err(SearchError::NotNested {
                        path: path.to_dotted(),
                        segment: segment.clone(),
                    })
                }
            };
        }

        schema
            .property(last)
            .map(|descriptor| descriptor.type_info())
            .ok_or_else(|| unknown(last.as_str()))
    }
}

/// Resolver for [`PropertyBag`](crate::property::PropertyBag) records
///
/// The whole dotted path is one key. Keys without a hint are strings.
#[derive(Debug, Clone)]
pub struct DynamicResolver {
    hints: AHashMap<String, ValueType>,
    default_type: ValueType,
}

impl Default for DynamicResolver {
    fn default() -> Self {
        Self::new(AHashMap::new())
    }
}

impl DynamicResolver {
    pub fn new(hints: AHashMap<String, ValueType>) -> Self {
        Self {
            hints,
            default_type: ValueType::String,
        }
    }

    pub fn with_hint(mut self, key: impl Into<String>, ty: ValueType) -> Self {
        self.hints.insert(key.into(), ty);
        self
    }

    pub fn hint(&self, key: &str) -> Option<&ValueType> {
        self.hints.get(key)
    }
}

impl PropertyResolver for DynamicResolver {
    fn resolve(&self, path: &PropertyPath) -> Result<TypeInfo> {
        let key = path.to_dotted();
        let ty = self.hints.get(&key).unwrap_or(&self.default_type);
        Ok(TypeInfo::scalar(ty.clone()))
    }
}

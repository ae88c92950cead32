//! Static shape descriptions of searchable record types

use ahash::AHashMap;

use crate::value::ValueType;

/// Lazily produces the schema of a nested record type
pub type SchemaFn = fn() -> &'static Schema;

/// What a property holds
#[derive(Debug, Clone)]
pub enum PropertyKind {
    /// A scalar of the given type
    Value(ValueType),
    /// A nested record
    Record(SchemaFn),
}

/// One declared property of a record type
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    name: String,
    kind: PropertyKind,
    collection: bool,
}

impl PropertyDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &PropertyKind {
        &self.kind
    }

    pub fn is_collection(&self) -> bool {
        self.collection
    }

    pub fn type_info(&self) -> TypeInfo {
        let element = match &self.kind {
            PropertyKind::Value(ty) => ElementType::Value(ty.clone()),
            PropertyKind::Record(schema) => ElementType::Record(schema().name()),
        };
        TypeInfo {
            element,
            collection: self.collection,
        }
    }
}

/// Element type of a resolved property
#[derive(Debug, Clone, PartialEq)]
pub enum ElementType {
    Value(ValueType),
    /// Nested record, by schema name
    Record(&'static str),
}

/// Declared type of a resolved property path
#[derive(Debug, Clone, PartialEq)]
pub struct TypeInfo {
    pub element: ElementType,
    pub collection: bool,
}

impl TypeInfo {
    pub fn scalar(ty: ValueType) -> Self {
        Self {
            element: ElementType::Value(ty),
            collection: false,
        }
    }

    pub fn value_type(&self) -> Option<&ValueType> {
        match &self.element {
            ElementType::Value(ty) => Some(ty),
            ElementType::Record(_) => None,
        }
    }

    pub fn is_collection(&self) -> bool {
        self.collection
    }
}

/// Property table of a record type
#[derive(Debug)]
pub struct Schema {
    name: &'static str,
    properties: AHashMap<String, PropertyDescriptor>,
}

impl Schema {
    pub fn builder(name: &'static str) -> SchemaBuilder {
        SchemaBuilder {
            name,
            properties: AHashMap::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(name)
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.values()
    }
}

/// Builder for [`Schema`]
#[derive(Debug)]
pub struct SchemaBuilder {
    name: &'static str,
    properties: AHashMap<String, PropertyDescriptor>,
}

impl SchemaBuilder {
    /// Scalar property
    pub fn value(self, name: &str, ty: ValueType) -> Self {
        self.add(name, PropertyKind::Value(ty), false)
    }

    /// Collection of scalars
    pub fn values(self, name: &str, ty: ValueType) -> Self {
        self.add(name, PropertyKind::Value(ty), true)
    }

    /// Nested record
    pub fn record(self, name: &str, schema: SchemaFn) -> Self {
        self.add(name, PropertyKind::Record(schema), false)
    }

    /// Collection of nested records
    pub fn records(self, name: &str, schema: SchemaFn) -> Self {
        self.add(name, PropertyKind::Record(schema), true)
    }

    fn add(mut self, name: &str, kind: PropertyKind, collection: bool) -> Self {
        self.properties.insert(
            name.to_string(),
            PropertyDescriptor {
                name: name.to_string(),
                kind,
                collection,
            },
        );
        self
    }

    pub fn build(self) -> Schema {
        Schema {
            name: self.name,
            properties: self.properties,
        }
    }
}

//! Declared property types and runtime values

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::SearchError;

/// Declared type of a searchable property
#[derive(Debug, Clone, PartialEq)]
pub enum ValueType {
    String,
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Date,
    DateTime,
    Enum(EnumType),
    Custom(CustomType),
}

impl ValueType {
    /// Short type name used in messages and configuration
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Bool => "bool",
            ValueType::Char => "char",
            ValueType::I8 => "i8",
            ValueType::I16 => "i16",
            ValueType::I32 => "i32",
            ValueType::I64 => "i64",
            ValueType::U8 => "u8",
            ValueType::U16 => "u16",
            ValueType::U32 => "u32",
            ValueType::U64 => "u64",
            ValueType::F32 => "f32",
            ValueType::F64 => "f64",
            ValueType::Date => "date",
            ValueType::DateTime => "datetime",
            ValueType::Enum(ty) => ty.name(),
            ValueType::Custom(ty) => ty.name(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ValueType::I8
                | ValueType::I16
                | ValueType::I32
                | ValueType::I64
                | ValueType::U8
                | ValueType::U16
                | ValueType::U32
                | ValueType::U64
                | ValueType::F32
                | ValueType::F64
        )
    }
}

impl FromStr for ValueType {
    type Err = SearchError;

    /// Parses built-in type names; enumerations and custom types are
    /// registered programmatically
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ty = match s.to_ascii_lowercase().as_str() {
            "string" | "str" => ValueType::String,
            "bool" | "boolean" => ValueType::Bool,
            "char" | "character" => ValueType::Char,
            "i8" | "byte" => ValueType::I8,
            "i16" | "short" => ValueType::I16,
            "i32" | "int" | "integer" => ValueType::I32,
            "i64" | "long" => ValueType::I64,
            "u8" => ValueType::U8,
            "u16" => ValueType::U16,
            "u32" => ValueType::U32,
            "u64" => ValueType::U64,
            "f32" | "float" => ValueType::F32,
            "f64" | "double" => ValueType::F64,
            "date" => ValueType::Date,
            "datetime" | "timestamp" => ValueType::DateTime,
            _ => return Err(SearchError::coercion(s, "value type")),
        };
        Ok(ty)
    }
}

impl<'de> Deserialize<'de> for ValueType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse::<ValueType>().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Enumerations
// ============================================================================

/// Closed set of upper-case member names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumType {
    name: &'static str,
    members: &'static [&'static str],
}

impl EnumType {
    pub const fn new(name: &'static str, members: &'static [&'static str]) -> Self {
        Self { name, members }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn members(&self) -> &'static [&'static str] {
        self.members
    }

    /// Exact, case-sensitive member lookup
    pub fn value(&self, member: &str) -> Option<Value> {
        self.members
            .iter()
            .position(|m| *m == member)
            .and_then(|ordinal| self.value_at(ordinal))
    }

    /// Member at the given declaration index
    pub fn value_at(&self, ordinal: usize) -> Option<Value> {
        self.members.get(ordinal).map(|member| {
            Value::Enum(EnumValue {
                type_name: self.name,
                member,
                ordinal,
            })
        })
    }
}

/// One member of an [`EnumType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumValue {
    pub type_name: &'static str,
    pub member: &'static str,
    pub ordinal: usize,
}

// ============================================================================
// Custom types
// ============================================================================

/// Runtime value of a caller-defined type
///
/// Implemented for every `Debug + Display + PartialOrd` type, so a custom
/// type only needs the usual derives to take part in comparisons.
pub trait CustomValue: fmt::Debug + fmt::Display + Send + Sync + 'static {
    fn type_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn equals(&self, other: &dyn CustomValue) -> bool;
    fn compare(&self, other: &dyn CustomValue) -> Option<Ordering>;
}

impl<T> CustomValue for T
where
    T: fmt::Debug + fmt::Display + PartialOrd + Send + Sync + 'static,
{
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn CustomValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn compare(&self, other: &dyn CustomValue) -> Option<Ordering> {
        other
            .as_any()
            .downcast_ref::<T>()
            .and_then(|other| self.partial_cmp(other))
    }
}

pub type ConstructFn = fn(&str) -> Option<Arc<dyn CustomValue>>;

/// One way of building a custom value from text
#[derive(Clone, Copy)]
pub enum Constructor {
    /// `FromStr` implementation of the type
    FromStr(ConstructFn),
    /// `TryFrom<&str>` factory of the type
    Factory(ConstructFn),
}

impl Constructor {
    pub fn construct(&self, text: &str) -> Option<Arc<dyn CustomValue>> {
        match self {
            Constructor::FromStr(f) | Constructor::Factory(f) => f(text),
        }
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constructor::FromStr(_) => f.write_str("FromStr"),
            Constructor::Factory(_) => f.write_str("Factory"),
        }
    }
}

fn construct_from_str<T>(text: &str) -> Option<Arc<dyn CustomValue>>
where
    T: FromStr + CustomValue,
{
    text.parse::<T>()
        .ok()
        .map(|value| Arc::new(value) as Arc<dyn CustomValue>)
}

fn construct_try_from<T>(text: &str) -> Option<Arc<dyn CustomValue>>
where
    T: for<'a> TryFrom<&'a str> + CustomValue,
{
    T::try_from(text)
        .ok()
        .map(|value| Arc::new(value) as Arc<dyn CustomValue>)
}

/// Caller-defined type with an ordered list of constructors
#[derive(Clone)]
pub struct CustomType {
    name: &'static str,
    constructors: Vec<Constructor>,
}

impl CustomType {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            constructors: Vec::new(),
        }
    }

    /// Type built through its `FromStr` implementation
    pub fn of<T>(name: &'static str) -> Self
    where
        T: FromStr + CustomValue,
    {
        Self::new(name).with_from_str::<T>()
    }

    pub fn with_from_str<T>(mut self) -> Self
    where
        T: FromStr + CustomValue,
    {
        self.constructors
            .push(Constructor::FromStr(construct_from_str::<T>));
        self
    }

    pub fn with_factory<T>(mut self) -> Self
    where
        T: for<'a> TryFrom<&'a str> + CustomValue,
    {
        self.constructors
            .push(Constructor::Factory(construct_try_from::<T>));
        self
    }

    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }
}

impl fmt::Debug for CustomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomType")
            .field("name", &self.name)
            .field("constructors", &self.constructors)
            .finish()
    }
}

impl PartialEq for CustomType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

// ============================================================================
// Values
// ============================================================================

/// Runtime value of a property or of a coerced literal
#[derive(Debug, Clone)]
pub enum Value {
    String(String),
    Bool(bool),
    Char(char),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Enum(EnumValue),
    Custom(Arc<dyn CustomValue>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::Integer(_) => "integer",
            Value::Unsigned(_) => "unsigned",
            Value::Float(_) => "float",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::Enum(e) => e.type_name,
            Value::Custom(c) => c.type_name(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Whether ordering comparators apply to this value
    pub fn is_ordered(&self) -> bool {
        !matches!(self, Value::Bool(_))
    }

    /// Whether the two values can be compared at all
    pub fn comparable_with(&self, other: &Value) -> bool {
        match (self, other) {
            (
                Value::Integer(_) | Value::Unsigned(_) | Value::Float(_),
                Value::Integer(_) | Value::Unsigned(_) | Value::Float(_),
            ) => true,
            (Value::Enum(a), Value::Enum(b)) => a.type_name == b.type_name,
            (Value::Custom(a), Value::Custom(b)) => a.type_name() == b.type_name(),
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }

    /// Total-order comparison where one is defined
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Unsigned(a), Value::Unsigned(b)) => Some(a.cmp(b)),
            (Value::Integer(a), Value::Unsigned(b)) => Some(compare_signed(*a, *b)),
            (Value::Unsigned(a), Value::Integer(b)) => Some(compare_signed(*b, *a).reverse()),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Float(a), Value::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Float(a), Value::Unsigned(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Integer(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Unsigned(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Char(a), Value::Char(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            (Value::Enum(a), Value::Enum(b)) if a.type_name == b.type_name => {
                Some(a.ordinal.cmp(&b.ordinal))
            }
            (Value::Custom(a), Value::Custom(b)) => a.compare(b.as_ref()),
            _ => None,
        }
    }

    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Custom(a), Value::Custom(b)) => a.equals(b.as_ref()),
            _ => self.compare(other) == Some(Ordering::Equal),
        }
    }
}

fn compare_signed(signed: i64, unsigned: u64) -> Ordering {
    if signed < 0 {
        Ordering::Less
    } else {
        (signed as u64).cmp(&unsigned)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Char(c) => write!(f, "{}", c),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Unsigned(u) => write!(f, "{}", u),
            Value::Float(x) => write!(f, "{}", x),
            Value::Date(d) => write!(f, "{}", d),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            Value::Enum(e) => f.write_str(e.member),
            Value::Custom(c) => write!(f, "{}", c),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

macro_rules! value_from_int {
    ($variant:ident, $target:ty, $($source:ty),+) => {
        $(
            impl From<$source> for Value {
                fn from(v: $source) -> Self {
                    Value::$variant(v as $target)
                }
            }
        )+
    };
}

value_from_int!(Integer, i64, i8, i16, i32, i64);
value_from_int!(Unsigned, u64, u8, u16, u32, u64, usize);
value_from_int!(Float, f64, f32, f64);

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<EnumValue> for Value {
    fn from(e: EnumValue) -> Self {
        Value::Enum(e)
    }
}

//! String-to-value coercion
//!
//! Literals are converted into the declared type of the property they are
//! compared against. Every failure is a [`SearchError::Coercion`] naming the
//! target type and the offending text.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::str::FromStr;

use crate::error::{Result, SearchError};
use crate::value::types::{Value, ValueType};

/// Default date format (`2001-01-31`)
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Default date-time format (`2001-01-31T10:15:00`)
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Converts literal text into typed values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coercer {
    date_format: String,
    datetime_format: String,
}

impl Default for Coercer {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMAT, DEFAULT_DATETIME_FORMAT)
    }
}

impl Coercer {
    pub fn new(date_format: impl Into<String>, datetime_format: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
            datetime_format: datetime_format.into(),
        }
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    pub fn datetime_format(&self) -> &str {
        &self.datetime_format
    }

    /// Convert `text` into a value of type `ty`
    pub fn coerce(&self, text: &str, ty: &ValueType) -> Result<Value> {
        let value = match ty {
            ValueType::String => Value::String(text.to_string()),
            ValueType::Bool => Value::Bool(parse_strict::<bool>(text, ty)?),
            ValueType::Char => Value::Char(parse_char(text)?),
            ValueType::I8 => Value::Integer(parse_strict::<i8>(text, ty)?.into()),
            ValueType::I16 => Value::Integer(parse_strict::<i16>(text, ty)?.into()),
            ValueType::I32 => Value::Integer(parse_strict::<i32>(text, ty)?.into()),
            ValueType::I64 => Value::Integer(parse_strict::<i64>(text, ty)?),
            ValueType::U8 => Value::Unsigned(parse_strict::<u8>(text, ty)?.into()),
            ValueType::U16 => Value::Unsigned(parse_strict::<u16>(text, ty)?.into()),
            ValueType::U32 => Value::Unsigned(parse_strict::<u32>(text, ty)?.into()),
            ValueType::U64 => Value::Unsigned(parse_strict::<u64>(text, ty)?),
            ValueType::F32 => Value::Float(finite(parse_strict::<f32>(text, ty)?.into(), text, ty)?),
            ValueType::F64 => Value::Float(finite(parse_strict::<f64>(text, ty)?, text, ty)?),
            ValueType::Date => Value::Date(self.parse_date(text)?),
            ValueType::DateTime => Value::DateTime(self.parse_datetime(text)?),
            ValueType::Enum(enum_type) => enum_type
                .value(&text.to_uppercase())
                .ok_or_else(|| SearchError::coercion(text, enum_type.name()))?,
            ValueType::Custom(custom) => custom
                .constructors()
                .iter()
                .find_map(|constructor| constructor.construct(text))
                .map(Value::Custom)
                .ok_or_else(|| SearchError::coercion(text, custom.name()))?,
        };
        Ok(value)
    }

    /// Convert the literal of a `count()` comparison into an element count
    pub fn coerce_count(&self, text: &str) -> Result<Value> {
        text.parse::<u64>()
            .map(Value::Unsigned)
            .map_err(|_| SearchError::coercion(text, "collection size"))
    }

    fn parse_date(&self, text: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(text, &self.date_format)
            .map_err(|_| SearchError::coercion(text, "date"))
    }

    fn parse_datetime(&self, text: &str) -> Result<NaiveDateTime> {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, &self.datetime_format) {
            return Ok(datetime);
        }
        if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
            return Ok(datetime.naive_utc());
        }
        // A bare date means midnight
        NaiveDate::parse_from_str(text, &self.date_format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .ok_or_else(|| SearchError::coercion(text, "datetime"))
    }
}

fn parse_strict<T: FromStr>(text: &str, ty: &ValueType) -> Result<T> {
    text.parse::<T>()
        .map_err(|_| SearchError::coercion(text, ty.name()))
}

/// Rejects NaN and infinities
fn finite(value: f64, text: &str, ty: &ValueType) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SearchError::coercion(text, ty.name()))
    }
}

fn parse_char(text: &str) -> Result<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(SearchError::coercion(text, "char")),
    }
}

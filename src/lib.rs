//! FIQL Core - Feed Item Query Language parser and evaluator
//!
//! This crate compiles FIQL filter expressions such as
//! `name==CXF*;id=gt=123` into immutable condition trees and evaluates
//! them against typed records or dynamic property bags. Optional Python
//! bindings are available via PyO3 with the `python` feature.
//!
//! ```ignore
//! use fiql_core::{FiqlParser, ParserConfig, PropertyBag, ValueType};
//!
//! let config = ParserConfig::default().with_type_hint("id", ValueType::I64);
//! let condition = FiqlParser::for_bag(&config).parse("name==CXF*;id=gt=123")?;
//! let bag = PropertyBag::new().with("name", "CXF Rocks").with("id", "125");
//! assert!(condition.is_met(&bag)?);
//! ```

pub mod condition;
pub mod config;
pub mod error;
pub mod fiql;
pub mod property;
pub mod value;

#[cfg(feature = "python")]
mod python;

#[cfg(test)]
mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use condition::{
    Comparison, ConditionCache, ConditionKind, ConditionNode, ConditionVisitor, FiqlWriter,
    LogicalOperator, TypedValue,
};
pub use config::ParserConfig;
pub use error::{ErrorCategory, Result, SearchError};
pub use fiql::{to_fiql, FiqlParser, OperatorTable};
pub use property::{
    DynamicResolver, FieldValue, PropertyBag, PropertyPath, PropertyResolver, Record, Schema,
    Searchable, StaticResolver, TypeInfo,
};
pub use value::{Coercer, CustomType, EnumType, Value, ValueType};

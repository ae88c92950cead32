//! Error types for FIQL parsing and evaluation

#[cfg(feature = "python")]
use pyo3::exceptions::{PyKeyError, PyRuntimeError, PyValueError};
#[cfg(feature = "python")]
use pyo3::PyErr;
use thiserror::Error;

use crate::condition::ConditionKind;

/// Main error type for parsing, resolving, coercing and evaluating conditions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("Empty expression")]
    EmptyExpression,

    #[error("Unexpected closing bracket at position {0}")]
    UnexpectedClosingBracket(usize),

    #[error("Unmatched opening and closing brackets in expression: {0}")]
    UnmatchedBrackets(String),

    #[error("Dangling operator at the end of expression: ...{0}")]
    DanglingOperator(String),

    #[error("Not a comparison expression: {0}")]
    NotAComparison(String),

    #[error("Invalid property path: {0}")]
    InvalidPropertyPath(String),

    #[error("Expression yields no conditions: {0}")]
    NoConditions(String),

    #[error("Brackets nested deeper than {0} levels")]
    NestingTooDeep(usize),

    #[error("Unknown property '{segment}' in path '{path}'")]
    UnknownProperty { path: String, segment: String },

    #[error("Property '{segment}' in path '{path}' is not a nested record")]
    NotNested { path: String, segment: String },

    #[error("Property '{0}' is a record and cannot be compared to a value")]
    NotAValue(String),

    #[error("Alias '{alias}' maps to an invalid property path '{target}'")]
    InvalidAlias { alias: String, target: String },

    #[error("Cannot convert \"{text}\" to {type_name}")]
    Coercion { text: String, type_name: String },

    #[error("Operator {kind} is not supported for {type_name} values")]
    Unordered {
        kind: ConditionKind,
        type_name: String,
    },

    #[error("Type mismatch on '{property}': {detail}")]
    TypeMismatch { property: String, detail: String },

    #[error("Cannot resolve value of '{0}'")]
    Unresolvable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Broad class of a [`SearchError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Malformed expression text
    Grammar,
    /// Unknown property or bad alias
    Resolution,
    /// Literal cannot become the declared type
    Coercion,
    /// Failure while checking a record
    Evaluation,
    /// Parser configuration could not be read
    Configuration,
}

impl SearchError {
    /// Category this error belongs to
    pub fn category(&self) -> ErrorCategory {
        match self {
            SearchError::EmptyExpression
            | SearchError::UnexpectedClosingBracket(_)
            | SearchError::UnmatchedBrackets(_)
            | SearchError::DanglingOperator(_)
            | SearchError::NotAComparison(_)
            | SearchError::InvalidPropertyPath(_)
            | SearchError::NoConditions(_)
            | SearchError::NestingTooDeep(_) => ErrorCategory::Grammar,
            SearchError::UnknownProperty { .. }
            | SearchError::NotNested { .. }
            | SearchError::NotAValue(_)
            | SearchError::InvalidAlias { .. } => ErrorCategory::Resolution,
            SearchError::Coercion { .. } => ErrorCategory::Coercion,
            SearchError::Unordered { .. }
            | SearchError::TypeMismatch { .. }
            | SearchError::Unresolvable(_) => ErrorCategory::Evaluation,
            SearchError::InvalidConfig(_) => ErrorCategory::Configuration,
        }
    }

    pub fn is_grammar(&self) -> bool {
        self.category() == ErrorCategory::Grammar
    }

    pub(crate) fn coercion(text: &str, type_name: impl Into<String>) -> Self {
        SearchError::Coercion {
            text: text.to_string(),
            type_name: type_name.into(),
        }
    }
}

#[cfg(feature = "python")]
impl From<SearchError> for PyErr {
    fn from(err: SearchError) -> PyErr {
        match err.category() {
            ErrorCategory::Grammar | ErrorCategory::Coercion | ErrorCategory::Configuration => {
                PyValueError::new_err(err.to_string())
            }
            ErrorCategory::Resolution => PyKeyError::new_err(err.to_string()),
            ErrorCategory::Evaluation => PyRuntimeError::new_err(err.to_string()),
        }
    }
}

/// Result type alias for FIQL operations
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            SearchError::UnexpectedClosingBracket(3).category(),
            ErrorCategory::Grammar
        );
        assert_eq!(
            SearchError::UnknownProperty {
                path: "a.b".to_string(),
                segment: "b".to_string(),
            }
            .category(),
            ErrorCategory::Resolution
        );
        assert_eq!(
            SearchError::coercion("x", "i32").category(),
            ErrorCategory::Coercion
        );
        assert_eq!(
            SearchError::Unresolvable("id".to_string()).category(),
            ErrorCategory::Evaluation
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            SearchError::UnexpectedClosingBracket(7).to_string(),
            "Unexpected closing bracket at position 7"
        );
        assert_eq!(
            SearchError::coercion("abc", "i64").to_string(),
            "Cannot convert \"abc\" to i64"
        );
        assert_eq!(
            SearchError::Unordered {
                kind: ConditionKind::GreaterThan,
                type_name: "bool".to_string(),
            }
            .to_string(),
            "Operator GREATER_THAN is not supported for bool values"
        );
    }
}

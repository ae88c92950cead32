//! Python bindings via PyO3

use pyo3::prelude::*;
use pyo3::types::{PyBool, PyDict};
use std::collections::HashMap;

use crate::condition::{ConditionNode, FiqlWriter};
use crate::config::ParserConfig;
use crate::fiql::{self, FiqlParser};
use crate::property::PropertyBag;
use crate::value::ValueType;

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert a Python dict into a property bag
///
/// `None` values are left out so they read as absent.
fn to_bag(dict: &Bound<'_, PyDict>) -> PyResult<PropertyBag> {
    let mut bag = PropertyBag::new();
    for (key, value) in dict.iter() {
        if value.is_none() {
            continue;
        }
        let key: String = key.extract()?;
        let text = if value.is_instance_of::<PyBool>() {
            value.extract::<bool>()?.to_string()
        } else {
            value.str()?.to_string()
        };
        bag.set(key, text);
    }
    Ok(bag)
}

fn build_config(
    aliases: Option<HashMap<String, String>>,
    type_hints: Option<HashMap<String, String>>,
    single_equals: bool,
) -> PyResult<ParserConfig> {
    let mut config = ParserConfig::default().with_single_equals(single_equals);
    for (alias, target) in aliases.unwrap_or_default() {
        config = config.with_alias(alias, target);
    }
    for (key, name) in type_hints.unwrap_or_default() {
        let ty: ValueType = name.parse()?;
        config = config.with_type_hint(key, ty);
    }
    Ok(config)
}

// ============================================================================
// Python Classes
// ============================================================================

/// Parsed FIQL filter over dict records
#[pyclass(frozen)]
pub struct FiqlFilter {
    expression: String,
    condition: ConditionNode,
}

#[pymethods]
impl FiqlFilter {
    /// Parse a filter expression
    ///
    /// # Arguments
    /// * `expression` - FIQL expression like "name==CXF*;id=gt=10"
    /// * `aliases` - Optional alias to property-name map
    /// * `type_hints` - Optional key to type-name map ("long", "double", "bool", "date", ...)
    /// * `single_equals` - Accept `=` as `==`
    ///
    /// # Raises
    /// ValueError for malformed expressions or literals, KeyError for bad aliases
    #[new]
    #[pyo3(signature = (expression, aliases=None, type_hints=None, single_equals=false))]
    fn new(
        expression: String,
        aliases: Option<HashMap<String, String>>,
        type_hints: Option<HashMap<String, String>>,
        single_equals: bool,
    ) -> PyResult<Self> {
        let config = build_config(aliases, type_hints, single_equals)?;
        let condition = FiqlParser::for_bag(&config).parse(&expression)?;
        Ok(Self {
            expression,
            condition,
        })
    }

    #[getter]
    fn expression(&self) -> &str {
        &self.expression
    }

    /// Whether the record satisfies the filter
    fn is_met(&self, record: &Bound<'_, PyDict>) -> PyResult<bool> {
        let bag = to_bag(record)?;
        Ok(self.condition.is_met(&bag)?)
    }

    /// Records satisfying the filter, in input order
    fn filter<'py>(&self, records: Vec<Bound<'py, PyDict>>) -> PyResult<Vec<Bound<'py, PyDict>>> {
        let mut found = Vec::new();
        for record in records {
            if self.is_met(&record)? {
                found.push(record);
            }
        }
        Ok(found)
    }

    /// Canonical FIQL text of the parsed filter
    fn to_fiql(&self) -> String {
        FiqlWriter::write(&self.condition)
    }

    fn __repr__(&self) -> String {
        format!("FiqlFilter({:?})", self.expression)
    }
}

// ============================================================================
// Python Functions
// ============================================================================

/// Convert plain query pairs into a FIQL expression, or None when empty
#[pyfunction]
fn plain_query(pairs: Vec<(String, String)>) -> Option<String> {
    fiql::to_fiql(pairs)
}

// ============================================================================
// Python Module Definition
// ============================================================================

/// Python module definition
#[pymodule]
fn fiql_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(plain_query, m)?)?;
    m.add_class::<FiqlFilter>()?;
    Ok(())
}

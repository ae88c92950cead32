//! Condition evaluator

use std::borrow::Cow;
use std::cmp::Ordering;
use tracing::trace;

use crate::condition::ast::{Comparison, ConditionKind, ConditionNode};
use crate::error::{Result, SearchError};
use crate::property::{resolve_live, FieldValue, Record};
use crate::value::{Value, ValueType};

/// Evaluate a condition tree against a record
pub fn check(node: &ConditionNode, record: &dyn Record) -> Result<bool> {
    match node {
        ConditionNode::Leaf(comparison) => check_leaf(comparison, record),
        ConditionNode::And(children) => {
            for child in children {
                if !check(child, record)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        ConditionNode::Or(children) => {
            for child in children {
                if check(child, record)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

impl ConditionNode {
    /// Whether the record satisfies this condition
    pub fn is_met<R: Record>(&self, record: &R) -> Result<bool> {
        check(self, record)
    }

    /// Records satisfying this condition, in input order
    pub fn find_all<'r, R, I>(&self, records: I) -> Result<Vec<&'r R>>
    where
        R: Record + 'r,
        I: IntoIterator<Item = &'r R>,
    {
        let mut found = Vec::new();
        for record in records {
            if check(self, record)? {
                found.push(record);
            }
        }
        Ok(found)
    }
}

fn check_leaf(comparison: &Comparison, record: &dyn Record) -> Result<bool> {
    let fields = resolve_live(record, comparison.property())?;
    let result = if comparison.is_size_check() {
        check_size(comparison, &fields)?
    } else {
        check_values(comparison, &fields)?
    };
    trace!(
        property = comparison.property(),
        kind = %comparison.kind(),
        literal = comparison.literal(),
        result,
        "Checked comparison"
    );
    Ok(result)
}

fn check_size(comparison: &Comparison, fields: &[FieldValue<'_>]) -> Result<bool> {
    let mut orderings = Vec::with_capacity(fields.len());
    for field in fields {
        let len = match field {
            FieldValue::Values(values) => values.len(),
            FieldValue::Records(records) => records.len(),
            _ => {
                return Err(SearchError::TypeMismatch {
                    property: comparison.property().to_string(),
                    detail: "size check on a single value".to_string(),
                })
            }
        };
        let ordering = Value::from(len)
            .compare(&comparison.value().value)
            .ok_or_else(|| unordered(comparison, "collection size"))?;
        orderings.push(ordering);
    }
    if orderings.is_empty() {
        return Ok(false);
    }

    // Not-equals holds when no collection has the size
    if comparison.kind() == ConditionKind::NotEquals {
        return Ok(!orderings.contains(&Ordering::Equal));
    }
    Ok(orderings
        .into_iter()
        .any(|ordering| comparison.kind().accepts(ordering)))
}

fn check_values(comparison: &Comparison, fields: &[FieldValue<'_>]) -> Result<bool> {
    let mut elements = Vec::new();
    for field in fields {
        match field {
            FieldValue::Value(value) => elements.push(value),
            FieldValue::Values(values) => elements.extend(values),
            FieldValue::Null => {}
            FieldValue::Record(_) | FieldValue::Records(_) => {
                return Err(SearchError::TypeMismatch {
                    property: comparison.property().to_string(),
                    detail: "record compared to a value".to_string(),
                })
            }
        }
    }
    if fields.is_empty() {
        return Ok(false);
    }

    // Not-equals holds when no element is equal
    if comparison.kind() == ConditionKind::NotEquals {
        for element in elements {
            if matches_element(comparison, ConditionKind::Equals, element)? {
                return Ok(false);
            }
        }
        return Ok(true);
    }

    for element in elements {
        if matches_element(comparison, comparison.kind(), element)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn matches_element(comparison: &Comparison, kind: ConditionKind, live: &Value) -> Result<bool> {
    let live = coerce_live(comparison, live)?;
    let live: &Value = &live;
    let target = &comparison.value().value;

    if let (Some(wildcard), Some(text)) = (comparison.wildcard(), live.as_str()) {
        return Ok(wildcard.is_match(text));
    }

    if !live.comparable_with(target) {
        return Err(SearchError::TypeMismatch {
            property: comparison.property().to_string(),
            detail: format!(
                "cannot compare {} value with {} literal",
                live.type_name(),
                target.type_name()
            ),
        });
    }

    if !kind.is_ordering() {
        return Ok(live.equals(target));
    }
    if !live.is_ordered() {
        return Err(unordered(comparison, live.type_name()));
    }
    let ordering: Ordering = live
        .compare(target)
        .ok_or_else(|| unordered(comparison, live.type_name()))?;
    Ok(kind.accepts(ordering))
}

/// Bag values arrive as text and take the declared type here
fn coerce_live<'v>(comparison: &Comparison, live: &'v Value) -> Result<Cow<'v, Value>> {
    let declared = comparison.value().type_info.value_type();
    match (live, declared) {
        (Value::String(text), Some(ty)) if *ty != ValueType::String => comparison
            .coercer()
            .coerce(text, ty)
            .map(Cow::Owned)
            .map_err(|err| SearchError::TypeMismatch {
                property: comparison.property().to_string(),
                detail: err.to_string(),
            }),
        _ => Ok(Cow::Borrowed(live)),
    }
}

fn unordered(comparison: &Comparison, type_name: &str) -> SearchError {
    SearchError::Unordered {
        kind: comparison.kind(),
        type_name: type_name.to_string(),
    }
}

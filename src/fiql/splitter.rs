//! Depth-0 splitting of FIQL expressions

use tracing::trace;

use crate::condition::LogicalOperator;
use crate::error::{Result, SearchError};

/// One member of an expression, with the operator that follows it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubExpression<'e> {
    pub text: &'e str,
    /// Character position of `text` in the whole expression
    pub start: usize,
    pub operator: Option<LogicalOperator>,
}

/// Split an expression at its top-level `;` and `,` separators
pub fn split(expr: &str) -> Result<Vec<SubExpression<'_>>> {
    split_from(expr, 0)
}

/// Split text that starts at character position `offset` of a larger
/// expression, so reported positions stay absolute
pub(crate) fn split_from(expr: &str, offset: usize) -> Result<Vec<SubExpression<'_>>> {
    if expr.trim().is_empty() {
        return Err(SearchError::EmptyExpression);
    }

    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut begin = 0;
    let mut begin_pos = offset;

    for (position, (index, c)) in expr.char_indices().enumerate() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => {
                return Err(SearchError::UnexpectedClosingBracket(offset + position))
            }
            ')' => depth -= 1,
            _ if depth == 0 => {
                if let Some(operator) = LogicalOperator::from_symbol(c) {
                    parts.push(SubExpression {
                        text: &expr[begin..index],
                        start: begin_pos,
                        operator: Some(operator),
                    });
                    begin = index + c.len_utf8();
                    begin_pos = offset + position + 1;
                }
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(SearchError::UnmatchedBrackets(expr.to_string()));
    }

    let last = &expr[begin..];
    if last.is_empty() {
        if let Some(previous) = parts.last() {
            let symbol = previous.operator.map(LogicalOperator::symbol).unwrap_or(';');
            return Err(SearchError::DanglingOperator(format!(
                "{}{}",
                previous.text, symbol
            )));
        }
    }
    parts.push(SubExpression {
        text: last,
        start: begin_pos,
        operator: None,
    });

    trace!(expression = expr, members = parts.len(), "Split expression");
    Ok(parts)
}

/// Inner text of a member wrapped in one pair of matching brackets
pub(crate) fn strip_brackets(text: &str) -> Option<&str> {
    let inner = text.strip_prefix('(')?.strip_suffix(')')?;
    // The opening bracket must close at the very end
    let mut depth = 0usize;
    for c in inner.chars() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return None,
            ')' => depth -= 1,
            _ => {}
        }
    }
    (depth == 0).then_some(inner)
}

//! Visitor contract over condition trees

use crate::condition::ast::{Comparison, ConditionNode, LogicalOperator};
use crate::fiql::OperatorTable;
use crate::property::COUNT_OPEN;

/// Depth-first, left-to-right walk over a condition tree
///
/// Query backends implement this to translate a tree into their own
/// language.
pub trait ConditionVisitor {
    type Output;

    fn on_leaf(&mut self, comparison: &Comparison) -> Self::Output;

    /// Called before the children of a composite are visited
    fn begin_composite(&mut self, _operator: LogicalOperator) {}

    fn end_composite(
        &mut self,
        operator: LogicalOperator,
        children: Vec<Self::Output>,
    ) -> Self::Output;
}

impl ConditionNode {
    pub fn accept<V: ConditionVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            ConditionNode::Leaf(comparison) => visitor.on_leaf(comparison),
            ConditionNode::And(children) | ConditionNode::Or(children) => {
                let operator = match self {
                    ConditionNode::And(_) => LogicalOperator::And,
                    _ => LogicalOperator::Or,
                };
                visitor.begin_composite(operator);
                let results = children.iter().map(|child| child.accept(visitor)).collect();
                visitor.end_composite(operator, results)
            }
        }
    }
}

/// Renders a tree back to FIQL text with canonical comparators
#[derive(Debug, Clone, Copy)]
pub struct FiqlWriter {
    operators: &'static OperatorTable,
}

impl Default for FiqlWriter {
    fn default() -> Self {
        Self {
            operators: OperatorTable::standard(),
        }
    }
}

impl FiqlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// FIQL text of a whole tree, without outer brackets
    pub fn write(node: &ConditionNode) -> String {
        let text = node.accept(&mut Self::new());
        match node {
            ConditionNode::Leaf(_) => text,
            _ => text
                .strip_prefix('(')
                .and_then(|inner| inner.strip_suffix(')'))
                .map(str::to_string)
                .unwrap_or(text),
        }
    }
}

impl ConditionVisitor for FiqlWriter {
    type Output = String;

    fn on_leaf(&mut self, comparison: &Comparison) -> String {
        let token = self.operators.token_for(comparison.kind());
        if comparison.is_size_check() {
            format!(
                "{}{}){}{}",
                COUNT_OPEN,
                comparison.name(),
                token,
                comparison.literal()
            )
        } else {
            format!("{}{}{}", comparison.name(), token, comparison.literal())
        }
    }

    fn end_composite(&mut self, operator: LogicalOperator, children: Vec<String>) -> String {
        format!("({})", children.join(&operator.symbol().to_string()))
    }
}

//! Condition tree for FIQL expressions

use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, SearchError};
use crate::property::TypeInfo;
use crate::value::{Coercer, Value};

/// Comparison kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    /// Equal (==)
    Equals,
    /// Not equal (!=)
    NotEquals,
    /// Greater than (=gt=)
    GreaterThan,
    /// Greater than or equal (=ge=)
    GreaterOrEquals,
    /// Less than (=lt=)
    LessThan,
    /// Less than or equal (=le=)
    LessOrEquals,
}

impl ConditionKind {
    pub const ALL: [ConditionKind; 6] = [
        ConditionKind::Equals,
        ConditionKind::NotEquals,
        ConditionKind::GreaterThan,
        ConditionKind::GreaterOrEquals,
        ConditionKind::LessThan,
        ConditionKind::LessOrEquals,
    ];

    /// Whether `live <op> literal` holds for the given `live.cmp(literal)`
    pub fn accepts(self, ordering: Ordering) -> bool {
        match self {
            ConditionKind::Equals => ordering == Ordering::Equal,
            ConditionKind::NotEquals => ordering != Ordering::Equal,
            ConditionKind::GreaterThan => ordering == Ordering::Greater,
            ConditionKind::GreaterOrEquals => ordering != Ordering::Less,
            ConditionKind::LessThan => ordering == Ordering::Less,
            ConditionKind::LessOrEquals => ordering != Ordering::Greater,
        }
    }

    /// Kinds that need a total order on the compared values
    pub fn is_ordering(self) -> bool {
        !matches!(self, ConditionKind::Equals | ConditionKind::NotEquals)
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConditionKind::Equals => "EQUALS",
            ConditionKind::NotEquals => "NOT_EQUALS",
            ConditionKind::GreaterThan => "GREATER_THAN",
            ConditionKind::GreaterOrEquals => "GREATER_OR_EQUALS",
            ConditionKind::LessThan => "LESS_THAN",
            ConditionKind::LessOrEquals => "LESS_OR_EQUALS",
        })
    }
}

/// Boolean connectives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    /// AND (;)
    And,
    /// OR (,)
    Or,
}

impl LogicalOperator {
    pub fn symbol(self) -> char {
        match self {
            LogicalOperator::And => ';',
            LogicalOperator::Or => ',',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            ';' => Some(LogicalOperator::And),
            ',' => Some(LogicalOperator::Or),
            _ => None,
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
        })
    }
}

/// Coerced literal together with the declared type of its property
#[derive(Debug, Clone, PartialEq)]
pub struct TypedValue {
    pub value: Value,
    pub type_info: TypeInfo,
}

/// Anchored `*` pattern compiled from a string literal
#[derive(Debug, Clone)]
pub struct Wildcard {
    regex: Regex,
    case_sensitive: bool,
}

impl Wildcard {
    /// Whether the literal is a pattern rather than plain text
    pub fn is_pattern(literal: &str) -> bool {
        literal.contains('*')
    }

    pub fn new(literal: &str, case_sensitive: bool) -> Result<Self> {
        let body = literal
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let regex = RegexBuilder::new(&format!("^{}$", body))
            .case_insensitive(!case_sensitive)
            .dot_matches_new_line(true)
            .build()
            .map_err(|_| SearchError::coercion(literal, "wildcard pattern"))?;
        Ok(Self {
            regex,
            case_sensitive,
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

impl PartialEq for Wildcard {
    fn eq(&self, other: &Self) -> bool {
        self.regex.as_str() == other.regex.as_str() && self.case_sensitive == other.case_sensitive
    }
}

/// Single comparison like "id=gt=10"
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    property: String,
    name: String,
    kind: ConditionKind,
    value: TypedValue,
    literal: String,
    size_check: bool,
    wildcard: Option<Wildcard>,
    coercer: Arc<Coercer>,
}

impl Comparison {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        property: String,
        name: String,
        kind: ConditionKind,
        value: TypedValue,
        literal: String,
        size_check: bool,
        wildcard: Option<Wildcard>,
        coercer: Arc<Coercer>,
    ) -> Self {
        Self {
            property,
            name,
            kind,
            value,
            literal,
            size_check,
            wildcard,
            coercer,
        }
    }

    /// Resolved dotted path, after alias mapping
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Property name as written, without any `count()` wrapper
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ConditionKind {
        self.kind
    }

    pub fn value(&self) -> &TypedValue {
        &self.value
    }

    /// Literal text as written
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Whether this compares the element count of a collection
    pub fn is_size_check(&self) -> bool {
        self.size_check
    }

    pub fn wildcard(&self) -> Option<&Wildcard> {
        self.wildcard.as_ref()
    }

    pub(crate) fn coercer(&self) -> &Coercer {
        &self.coercer
    }
}

/// Node of a parsed condition tree
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionNode {
    /// Single comparison
    Leaf(Comparison),
    /// All children hold
    And(Vec<ConditionNode>),
    /// At least one child holds
    Or(Vec<ConditionNode>),
}

impl ConditionNode {
    /// Composite of the given children; a single child stands for itself
    ///
    /// Returns `None` when there are no children.
    pub fn composite(operator: LogicalOperator, mut children: Vec<ConditionNode>) -> Option<Self> {
        match children.len() {
            0 => None,
            1 => children.pop(),
            _ => Some(match operator {
                LogicalOperator::And => ConditionNode::And(children),
                LogicalOperator::Or => ConditionNode::Or(children),
            }),
        }
    }

    /// The comparison of a leaf
    pub fn statement(&self) -> Option<&Comparison> {
        match self {
            ConditionNode::Leaf(comparison) => Some(comparison),
            _ => None,
        }
    }

    /// Children of a composite, empty for a leaf
    pub fn children(&self) -> &[ConditionNode] {
        match self {
            ConditionNode::Leaf(_) => &[],
            ConditionNode::And(children) | ConditionNode::Or(children) => children,
        }
    }

    /// Connective of a composite
    pub fn operator(&self) -> Option<LogicalOperator> {
        match self {
            ConditionNode::Leaf(_) => None,
            ConditionNode::And(_) => Some(LogicalOperator::And),
            ConditionNode::Or(_) => Some(LogicalOperator::Or),
        }
    }

    /// Number of leaves in the tree
    pub fn leaf_count(&self) -> usize {
        match self {
            ConditionNode::Leaf(_) => 1,
            ConditionNode::And(children) | ConditionNode::Or(children) => {
                children.iter().map(ConditionNode::leaf_count).sum()
            }
        }
    }
}

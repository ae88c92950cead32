//! FIQL expression parser
//!
//! Builds a [`ConditionNode`] tree from expressions like
//! `name==CXF*;(id=gt=10,count(tags)=ge=2)`. Consecutive `;` members form
//! AND groups first; the groups are then joined with OR.

use ahash::AHashMap;
use std::sync::Arc;
use tracing::debug;

use crate::condition::{Comparison, ConditionNode, LogicalOperator, TypedValue, Wildcard};
use crate::config::ParserConfig;
use crate::error::{Result, SearchError};
use crate::fiql::operators::OperatorTable;
use crate::fiql::splitter::{self, SubExpression};
use crate::property::{DynamicResolver, PropertyPath, PropertyResolver, Searchable, StaticResolver};
use crate::value::{Coercer, ValueType};

/// Deepest bracket nesting accepted by [`FiqlParser::parse`]
pub const MAX_NESTING: usize = 64;

/// Parser bound to one record shape and configuration
#[derive(Debug)]
pub struct FiqlParser {
    operators: &'static OperatorTable,
    resolver: Box<dyn PropertyResolver>,
    aliases: AHashMap<String, String>,
    coercer: Arc<Coercer>,
    wildcard_case_sensitive: bool,
}

impl FiqlParser {
    pub fn new(resolver: impl PropertyResolver + 'static, config: &ParserConfig) -> Self {
        Self {
            operators: OperatorTable::for_config(config.support_single_equals),
            resolver: Box::new(resolver),
            aliases: config.aliases.clone(),
            coercer: Arc::new(config.coercer()),
            wildcard_case_sensitive: config.wildcard_case_sensitive,
        }
    }

    /// Parser for a statically-typed record
    pub fn for_record<T: Searchable>(config: &ParserConfig) -> Self {
        Self::new(StaticResolver::of::<T>(), config)
    }

    /// Parser for [`PropertyBag`](crate::property::PropertyBag) records
    pub fn for_bag(config: &ParserConfig) -> Self {
        Self::new(DynamicResolver::new(config.type_hints.clone()), config)
    }

    pub fn operators(&self) -> &'static OperatorTable {
        self.operators
    }

    /// Parse a whole expression into a condition tree
    pub fn parse(&self, expression: &str) -> Result<ConditionNode> {
        self.build(expression, 0, 0)?
            .ok_or_else(|| SearchError::NoConditions(expression.to_string()))
    }

    /// Parse, treating any failure as "no condition"
    pub fn parse_lenient(&self, expression: &str) -> Option<ConditionNode> {
        match self.parse(expression) {
            Ok(node) => Some(node),
            Err(err) => {
                debug!(expression, error = %err, "Ignoring unparsable expression");
                None
            }
        }
    }

    fn build(&self, expression: &str, offset: usize, depth: usize) -> Result<Option<ConditionNode>> {
        if depth > MAX_NESTING {
            return Err(SearchError::NestingTooDeep(MAX_NESTING));
        }
        let members = splitter::split_from(expression, offset)?;

        let mut groups = Vec::new();
        let mut current = Vec::new();
        for member in members {
            if let Some(node) = self.parse_member(&member, depth)? {
                current.push(node);
            }
            if member.operator != Some(LogicalOperator::And) {
                let group = ConditionNode::composite(LogicalOperator::And, std::mem::take(&mut current));
                groups.extend(group);
            }
        }

        Ok(ConditionNode::composite(LogicalOperator::Or, groups))
    }

    fn parse_member(&self, member: &SubExpression<'_>, depth: usize) -> Result<Option<ConditionNode>> {
        if let Some(inner) = splitter::strip_brackets(member.text) {
            return self.build(inner, member.start + 1, depth + 1);
        }
        if member.text.starts_with('(') {
            return Err(SearchError::NotAComparison(member.text.to_string()));
        }
        self.parse_term(member.text)
    }

    /// Parse a single comparison
    ///
    /// Returns `Ok(None)` for a `count()` check on a property that is not a
    /// collection.
    pub fn parse_term(&self, text: &str) -> Result<Option<ConditionNode>> {
        let parts = self
            .operators
            .split_term(text)
            .filter(|parts| !parts.value.is_empty())
            .ok_or_else(|| SearchError::NotAComparison(text.to_string()))?;

        let written = PropertyPath::parse(parts.name)?;
        let path = self.apply_alias(&written)?;
        let type_info = self.resolver.resolve(&path)?;

        let (value, wildcard) = if path.is_size_check() {
            if !type_info.is_collection() {
                debug!(property = %path, "Dropping size check on a non-collection property");
                return Ok(None);
            }
            (self.coercer.coerce_count(parts.value)?, None)
        } else {
            let ty = type_info
                .value_type()
                .ok_or_else(|| SearchError::NotAValue(path.to_dotted()))?;
            let value = self.coercer.coerce(parts.value, ty)?;
            let wildcard = match (ty, parts.kind) {
                (ValueType::String, kind) if !kind.is_ordering() && Wildcard::is_pattern(parts.value) => {
                    Some(Wildcard::new(parts.value, self.wildcard_case_sensitive)?)
                }
                _ => None,
            };
            (value, wildcard)
        };

        Ok(Some(ConditionNode::Leaf(Comparison::new(
            path.to_dotted(),
            written.to_dotted(),
            parts.kind,
            TypedValue { value, type_info },
            parts.value.to_string(),
            path.is_size_check(),
            wildcard,
            Arc::clone(&self.coercer),
        ))))
    }

    fn apply_alias(&self, written: &PropertyPath) -> Result<PropertyPath> {
        let name = written.to_dotted();
        match self.aliases.get(&name) {
            Some(target) => PropertyPath::dotted(target, written.is_size_check()).map_err(|_| {
                SearchError::InvalidAlias {
                    alias: name.clone(),
                    target: target.clone(),
                }
            }),
            None => Ok(written.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::ConditionKind;
    use crate::property::TypeInfo;
    use crate::testing::Book;
    use crate::value::Value;

    fn book_parser() -> FiqlParser {
        FiqlParser::for_record::<Book>(&ParserConfig::default())
    }

    fn leaf(node: &ConditionNode) -> &Comparison {
        node.statement().expect("Expected a leaf")
    }

    #[test]
    fn test_parse_simple_comparison() {
        let node = book_parser().parse("id=gt=123").unwrap();
        let comparison = leaf(&node);
        assert_eq!(comparison.property(), "id");
        assert_eq!(comparison.kind(), ConditionKind::GreaterThan);
        assert_eq!(comparison.value().value, Value::Integer(123));
        assert_eq!(comparison.value().type_info, TypeInfo::scalar(ValueType::I64));
        assert_eq!(comparison.literal(), "123");
        assert!(!comparison.is_size_check());
    }

    #[test]
    fn test_parse_and_or_precedence() {
        let node = book_parser()
            .parse("id==1;name==a,id==2;name==b")
            .unwrap();
        match &node {
            ConditionNode::Or(groups) => {
                assert_eq!(groups.len(), 2);
                assert!(groups.iter().all(|g| g.operator() == Some(LogicalOperator::And)));
            }
            other => panic!("Expected OR, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_brackets() {
        let node = book_parser().parse("(id==1;name==a),id==2").unwrap();
        assert_eq!(node.operator(), Some(LogicalOperator::Or));
        assert_eq!(node.children()[0].operator(), Some(LogicalOperator::And));
        assert!(node.children()[1].statement().is_some());

        // Redundant brackets collapse away
        let node = book_parser().parse("((id==1))").unwrap();
        assert!(node.statement().is_some());
    }

    #[test]
    fn test_grammar_errors() {
        let parser = book_parser();
        assert!(matches!(
            parser.parse("(id==1;name==a"),
            Err(SearchError::UnmatchedBrackets(_))
        ));
        assert!(matches!(
            parser.parse("id==1;name==a;"),
            Err(SearchError::DanglingOperator(_))
        ));
        assert_eq!(
            parser.parse("id==1;(name==a));id==2").unwrap_err(),
            SearchError::UnexpectedClosingBracket(15)
        );
        assert_eq!(
            parser.parse("name=a").unwrap_err(),
            SearchError::NotAComparison("name=a".to_string())
        );
        assert_eq!(
            parser.parse("name==").unwrap_err(),
            SearchError::NotAComparison("name==".to_string())
        );
        assert!(matches!(
            parser.parse("(id==1)name==a"),
            Err(SearchError::NotAComparison(_))
        ));
        assert!(matches!(
            parser.parse("address..street==a"),
            Err(SearchError::InvalidPropertyPath(_))
        ));
    }

    #[test]
    fn test_nesting_limit() {
        let parser = book_parser();
        let at_limit = format!("{}id==1{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert!(parser.parse(&at_limit).unwrap().statement().is_some());

        let deep = format!("{}id==1{}", "(".repeat(5_000), ")".repeat(5_000));
        let err = parser.parse(&deep).unwrap_err();
        assert_eq!(err, SearchError::NestingTooDeep(MAX_NESTING));
        assert!(err.is_grammar());

        let deep_group = format!("{}id==1;name==a{}", "(".repeat(MAX_NESTING + 1), ")".repeat(MAX_NESTING + 1));
        assert_eq!(parser.parse(&deep_group).unwrap_err(), SearchError::NestingTooDeep(MAX_NESTING));
    }

    #[test]
    fn test_resolution_errors() {
        let parser = book_parser();
        assert_eq!(
            parser.parse("title==a").unwrap_err(),
            SearchError::UnknownProperty {
                path: "title".to_string(),
                segment: "title".to_string(),
            }
        );
        assert_eq!(
            parser.parse("address==a").unwrap_err(),
            SearchError::NotAValue("address".to_string())
        );
    }

    #[test]
    fn test_coercion_errors() {
        assert_eq!(
            book_parser().parse("id==abc").unwrap_err(),
            SearchError::coercion("abc", "i64")
        );
        assert!(matches!(
            book_parser().parse("count(tags)==-1"),
            Err(SearchError::Coercion { .. })
        ));
    }

    #[test]
    fn test_legacy_single_equals() {
        let parser = FiqlParser::for_record::<Book>(&ParserConfig::default().with_single_equals(true));
        let legacy = parser.parse("name=Foo").unwrap();
        let standard = book_parser().parse("name==Foo").unwrap();
        assert_eq!(leaf(&legacy).kind(), ConditionKind::Equals);
        assert_eq!(leaf(&legacy).value(), leaf(&standard).value());

        let node = parser.parse("name==Foo").unwrap();
        assert_eq!(leaf(&node).literal(), "Foo");
    }

    #[test]
    fn test_legacy_single_equals_with_size_check() {
        let parser = FiqlParser::for_record::<Book>(&ParserConfig::default().with_single_equals(true));
        let node = parser.parse("count(reviews.authors)=2").unwrap();
        let comparison = leaf(&node);
        assert!(comparison.is_size_check());
        assert_eq!(comparison.kind(), ConditionKind::Equals);
        assert_eq!(comparison.property(), "reviews.authors");
        assert_eq!(comparison.value().value, Value::Unsigned(2));

        let node = parser.parse("count(reviews.authors)=gt=1").unwrap();
        assert_eq!(leaf(&node).kind(), ConditionKind::GreaterThan);
        assert_eq!(leaf(&node).literal(), "1");
    }

    #[test]
    fn test_size_check() {
        let node = book_parser().parse("count(tags)=ge=2").unwrap();
        let comparison = leaf(&node);
        assert!(comparison.is_size_check());
        assert_eq!(comparison.property(), "tags");
        assert_eq!(comparison.value().value, Value::Unsigned(2));
    }

    #[test]
    fn test_size_check_on_scalar_is_dropped() {
        let parser = book_parser();
        assert_eq!(parser.parse_term("count(name)==2").unwrap(), None);

        let node = parser.parse("count(name)==2;id==1").unwrap();
        assert_eq!(leaf(&node).property(), "id");

        let node = parser.parse("count(name)==2,id==1").unwrap();
        assert_eq!(leaf(&node).property(), "id");

        assert_eq!(
            parser.parse("count(name)==2").unwrap_err(),
            SearchError::NoConditions("count(name)==2".to_string())
        );
    }

    #[test]
    fn test_aliases() {
        let config = ParserConfig::default()
            .with_alias("street", "address.street")
            .with_alias("labels", "tags")
            .with_alias("broken", "a..b")
            .with_alias("missing", "address.city");
        let parser = FiqlParser::for_record::<Book>(&config);

        let node = parser.parse("street==Street1").unwrap();
        assert_eq!(leaf(&node).property(), "address.street");
        assert_eq!(leaf(&node).name(), "street");

        let node = parser.parse("count(labels)==1").unwrap();
        assert!(leaf(&node).is_size_check());
        assert_eq!(leaf(&node).property(), "tags");

        assert_eq!(
            parser.parse("broken==x").unwrap_err(),
            SearchError::InvalidAlias {
                alias: "broken".to_string(),
                target: "a..b".to_string(),
            }
        );

        let err = parser.parse("missing==x").unwrap_err();
        assert_eq!(
            err,
            SearchError::UnknownProperty {
                path: "address.city".to_string(),
                segment: "city".to_string(),
            }
        );
        assert_eq!(err.category(), crate::error::ErrorCategory::Resolution);
    }

    #[test]
    fn test_wildcard_only_for_string_equality() {
        let parser = book_parser();
        let node = parser.parse("name==CXF*").unwrap();
        assert!(leaf(&node).wildcard().is_some());

        let node = parser.parse("name=gt=CXF*").unwrap();
        assert!(leaf(&node).wildcard().is_none());

        let node = parser.parse("name==CXF").unwrap();
        assert!(leaf(&node).wildcard().is_none());
    }

    #[test]
    fn test_bag_parser_uses_hints() {
        let config = ParserConfig::default().with_type_hint("id", ValueType::I64);
        let parser = FiqlParser::for_bag(&config);
        let node = parser.parse("id=lt=10;complex.name==x").unwrap();
        let children = node.children();
        assert_eq!(leaf(&children[0]).value().value, Value::Integer(10));
        assert_eq!(leaf(&children[1]).property(), "complex.name");
    }

    #[test]
    fn test_parse_lenient() {
        let parser = book_parser();
        assert!(parser.parse_lenient("id==1").is_some());
        assert!(parser.parse_lenient("_s=ab").is_none());
        assert!(parser.parse_lenient("").is_none());
    }
}

//! Comparator tokens and the term splitting pattern

use once_cell::sync::Lazy;
use regex::Regex;

use crate::condition::ConditionKind;

/// AND separator
pub const AND: char = ';';
/// OR separator
pub const OR: char = ',';

/// Legacy spelling of `==`
pub const SINGLE_EQUALS: &str = "=";

const CANONICAL_TOKENS: [(&str, ConditionKind); 6] = [
    ("==", ConditionKind::Equals),
    ("!=", ConditionKind::NotEquals),
    ("=gt=", ConditionKind::GreaterThan),
    ("=ge=", ConditionKind::GreaterOrEquals),
    ("=lt=", ConditionKind::LessThan),
    ("=le=", ConditionKind::LessOrEquals),
];

static STANDARD_OPERATORS: Lazy<OperatorTable> = Lazy::new(|| OperatorTable::build(false));

static LEGACY_OPERATORS: Lazy<OperatorTable> = Lazy::new(|| OperatorTable::build(true));

/// Comparison term split at its comparator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermParts<'t> {
    pub name: &'t str,
    pub token: &'t str,
    pub kind: ConditionKind,
    pub value: &'t str,
}

/// Token to kind mapping of one operator set
#[derive(Debug)]
pub struct OperatorTable {
    /// Longest tokens first
    tokens: Vec<(&'static str, ConditionKind)>,
    pattern: Regex,
    single_equals: bool,
}

impl OperatorTable {
    /// The six FIQL comparators
    pub fn standard() -> &'static OperatorTable {
        &STANDARD_OPERATORS
    }

    /// FIQL comparators plus `=` as `==`
    pub fn legacy() -> &'static OperatorTable {
        &LEGACY_OPERATORS
    }

    pub fn for_config(support_single_equals: bool) -> &'static OperatorTable {
        if support_single_equals {
            Self::legacy()
        } else {
            Self::standard()
        }
    }

    fn build(single_equals: bool) -> Self {
        let mut tokens = CANONICAL_TOKENS.to_vec();
        if single_equals {
            tokens.push((SINGLE_EQUALS, ConditionKind::Equals));
        }
        // Stable sort keeps table order between tokens of equal length
        tokens.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let alternatives = tokens
            .iter()
            .map(|(token, _)| regex::escape(token))
            .collect::<Vec<_>>()
            .join("|");
        // Lazy name: the comparator starting earliest wins, longest token first
        let pattern = Regex::new(&format!(r"(?s)^([\x20-\x7E]+?)({})(.*)$", alternatives))
            .expect("operator pattern is valid");

        Self {
            tokens,
            pattern,
            single_equals,
        }
    }

    /// Canonical token of a kind
    pub fn token_for(&self, kind: ConditionKind) -> &'static str {
        CANONICAL_TOKENS
            .iter()
            .find(|(_, k)| *k == kind)
            .map(|(token, _)| *token)
            .unwrap_or("==")
    }

    pub fn kind_for(&self, token: &str) -> Option<ConditionKind> {
        self.tokens
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, kind)| *kind)
    }

    /// Recognized tokens, longest first
    pub fn tokens(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tokens.iter().map(|(token, _)| *token)
    }

    pub fn supports_single_equals(&self) -> bool {
        self.single_equals
    }

    pub fn splitting_pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Split a comparison term into name, comparator and literal
    pub fn split_term<'t>(&self, term: &'t str) -> Option<TermParts<'t>> {
        let captures = self.pattern.captures(term)?;
        let name = captures.get(1)?.as_str();
        let token = captures.get(2)?.as_str();
        let value = captures.get(3)?.as_str();
        let kind = self.kind_for(token)?;
        Some(TermParts {
            name,
            token,
            kind,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_kind_bijection() {
        let table = OperatorTable::standard();
        for kind in ConditionKind::ALL {
            assert_eq!(table.kind_for(table.token_for(kind)), Some(kind));
        }
        assert_eq!(table.kind_for("="), None);
        assert_eq!(OperatorTable::legacy().kind_for("="), Some(ConditionKind::Equals));
        assert_eq!(OperatorTable::legacy().token_for(ConditionKind::Equals), "==");
    }

    #[test]
    fn test_split_standard_terms() {
        let table = OperatorTable::standard();
        let parts = table.split_term("id=gt=123").unwrap();
        assert_eq!(parts.name, "id");
        assert_eq!(parts.token, "=gt=");
        assert_eq!(parts.kind, ConditionKind::GreaterThan);
        assert_eq!(parts.value, "123");

        let parts = table.split_term("name==CXF Rocks").unwrap();
        assert_eq!(parts.name, "name");
        assert_eq!(parts.value, "CXF Rocks");

        let parts = table.split_term("name!=a==b").unwrap();
        assert_eq!(parts.kind, ConditionKind::NotEquals);
        assert_eq!(parts.value, "a==b");

        assert!(table.split_term("name=Foo").is_none());
        assert!(table.split_term("==Foo").is_none());
    }

    #[test]
    fn test_legacy_prefers_longest_token() {
        let table = OperatorTable::legacy();
        let parts = table.split_term("name==Foo").unwrap();
        assert_eq!(parts.token, "==");
        assert_eq!(parts.value, "Foo");

        let parts = table.split_term("name=Foo").unwrap();
        assert_eq!(parts.token, "=");
        assert_eq!(parts.kind, ConditionKind::Equals);
        assert_eq!(parts.value, "Foo");

        let parts = table.split_term("id=le=5").unwrap();
        assert_eq!(parts.kind, ConditionKind::LessOrEquals);
        assert_eq!(parts.value, "5");
    }

    #[test]
    fn test_empty_value_still_splits() {
        let parts = OperatorTable::standard().split_term("name==").unwrap();
        assert_eq!(parts.value, "");
    }

    #[test]
    fn test_tokens_longest_first() {
        let tokens: Vec<_> = OperatorTable::legacy().tokens().collect();
        assert_eq!(tokens.last(), Some(&"="));
        assert_eq!(tokens.len(), 7);
    }
}

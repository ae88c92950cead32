//! Property path grammar
//!
//! ```text
//! propertyPath := identifier ('.' identifier)* | 'count(' identifier ('.' identifier)* ')'
//! ```

use smallvec::SmallVec;
use std::fmt;

use crate::error::{Result, SearchError};

/// Opening of the collection-size extension
pub const COUNT_OPEN: &str = "count(";

/// Dotted property path, optionally wrapped in `count()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
    segments: SmallVec<[String; 4]>,
    size_check: bool,
}

impl PropertyPath {
    /// Parse a property name as written in a comparison
    pub fn parse(text: &str) -> Result<Self> {
        match text
            .strip_prefix(COUNT_OPEN)
            .and_then(|inner| inner.strip_suffix(')'))
        {
            Some(inner) => Self::dotted(inner, true),
            None => Self::dotted(text, false),
        }
    }

    /// Parse a plain dotted path
    pub fn dotted(text: &str, size_check: bool) -> Result<Self> {
        let segments = text
            .split('.')
            .map(|segment| {
                if is_identifier(segment) {
                    Ok(segment.to_string())
                } else {
                    Err(SearchError::InvalidPropertyPath(text.to_string()))
                }
            })
            .collect::<Result<SmallVec<[String; 4]>>>()?;
        Ok(Self {
            segments,
            size_check,
        })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_size_check(&self) -> bool {
        self.size_check
    }

    /// Same segments with another size-check flag
    pub fn with_size_check(mut self, size_check: bool) -> Self {
        self.size_check = size_check;
        self
    }

    /// The path without any `count()` wrapper
    pub fn to_dotted(&self) -> String {
        self.segments.join(".")
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.size_check {
            write!(f, "{}{})", COUNT_OPEN, self.to_dotted())
        } else {
            f.write_str(&self.to_dotted())
        }
    }
}

fn is_identifier(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_graphic() && !matches!(c, '=' | '!' | '(' | ')' | ';' | ',' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_path() {
        let path = PropertyPath::parse("name").unwrap();
        assert_eq!(path.segments(), ["name".to_string()]);
        assert!(!path.is_size_check());
    }

    #[test]
    fn test_dotted_path() {
        let path = PropertyPath::parse("owner.address.street").unwrap();
        assert_eq!(path.segments().len(), 3);
        assert_eq!(path.to_dotted(), "owner.address.street");
    }

    #[test]
    fn test_count_wrapper() {
        let path = PropertyPath::parse("count(reviews.authors)").unwrap();
        assert!(path.is_size_check());
        assert_eq!(path.to_dotted(), "reviews.authors");
        assert_eq!(path.to_string(), "count(reviews.authors)");
    }

    #[test]
    fn test_invalid_paths() {
        for text in ["", "a..b", ".a", "a.", "count()", "count(a", "a b", "na=me"] {
            assert!(
                matches!(
                    PropertyPath::parse(text),
                    Err(SearchError::InvalidPropertyPath(_))
                ),
                "Expected invalid path: {:?}",
                text
            );
        }
    }
}

//! Per-parser memo of parsed trees keyed by expression text
//!
//! The cache is bounded; once full it starts over empty.

use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::condition::ast::ConditionNode;
use crate::condition::evaluator;
use crate::error::Result;
use crate::fiql::FiqlParser;
use crate::property::Record;

/// Memoizes parsed trees per expression for one parser
#[derive(Debug)]
pub struct ConditionCache {
    parser: FiqlParser,
    capacity: usize,
    entries: RwLock<AHashMap<String, Arc<ConditionNode>>>,
}

impl ConditionCache {
    /// Expressions held by [`ConditionCache::new`] before it starts over
    pub const DEFAULT_CAPACITY: usize = 1024;

    pub fn new(parser: FiqlParser) -> Self {
        Self::with_capacity(parser, Self::DEFAULT_CAPACITY)
    }

    /// Cache holding at most `capacity` expressions (at least one)
    pub fn with_capacity(parser: FiqlParser, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            parser,
            capacity,
            entries: RwLock::new(AHashMap::with_capacity(capacity.min(256))),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn parser(&self) -> &FiqlParser {
        &self.parser
    }

    /// Get or parse an expression, using the cache for repeated expressions
    #[inline]
    pub fn get_or_parse(&self, expression: &str) -> Result<Arc<ConditionNode>> {
        // Fast path: check read lock first
        if let Some(node) = self.entries.read().get(expression) {
            trace!(expression, "Condition cache hit");
            return Ok(Arc::clone(node));
        }

        // Slow path: parse and cache
        let node = Arc::new(self.parser.parse(expression)?);
        trace!(expression, "Condition cache miss");
        let mut entries = self.entries.write();
        if entries.len() >= self.capacity && !entries.contains_key(expression) {
            debug!(capacity = self.capacity, "Condition cache full, clearing");
            entries.clear();
        }
        entries.insert(expression.to_string(), Arc::clone(&node));
        Ok(node)
    }

    /// Check an expression against a record; an empty expression always holds
    #[inline]
    pub fn check_condition<R: Record>(&self, expression: &str, record: &R) -> Result<bool> {
        if expression.is_empty() {
            return Ok(true);
        }
        let node = self.get_or_parse(expression)?;
        evaluator::check(&node, record)
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

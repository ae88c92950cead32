//! FIQL expression parsing
//!
//! This module handles comparator tokens, splitting expressions like
//! "a==1;(b==2,c==3)" at their separators, building condition trees, and
//! converting plain `name=value` queries into FIQL.

pub mod operators;
pub mod parser;
pub mod plain;
pub mod splitter;


pub use operators::*;
pub use parser::*;
pub use plain::to_fiql;
pub use splitter::{split, SubExpression};

//! Condition trees and their evaluation
//!
//! This module holds the parsed form of FIQL expressions like
//! "name==CXF*;id=gt=10", evaluates it against records and lets
//! visitors walk it.

mod ast;
pub mod cache;
mod evaluator;
pub mod visitor;


pub use ast::*;
pub use cache::*;
pub use evaluator::*;
pub use visitor::*;

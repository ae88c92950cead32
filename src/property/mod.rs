//! Property access for searchable records
//!
//! This module handles property paths like "reviews.authors" or
//! "count(tags)", the declared types behind them, and reading their
//! live values from records.

pub mod path;
pub mod record;
pub mod resolver;
pub mod schema;


pub use path::*;
pub use record::*;
pub use resolver::*;
pub use schema::*;

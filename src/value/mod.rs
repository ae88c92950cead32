//! Typed values and literal coercion

pub mod coerce;
mod types;

pub use coerce::*;
pub use types::*;

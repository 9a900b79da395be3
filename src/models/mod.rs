//! Data models module
//!
//! Defines the backend wire format, the model catalog and the comparison data structures

pub mod backend;
pub mod catalog;
pub mod comparison;

pub use backend::*;
pub use catalog::{ModelInfo, PriceEntry};
pub use comparison::{ComparisonResult, ModelSelection, QueryResponse, SelectionError};

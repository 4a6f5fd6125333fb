//! Core ETL (Extract, Transform, Load) abstractions
//!
//! This module provides the trait seams between sources, row transforms and
//! destinations, plus the sequential [`BatchLoader`] that drives them.

mod batch;
mod extract;
mod load;
mod transform;

pub use batch::{BatchLoader, LoadSummary};
pub use extract::Extractor;
pub use load::Loader;
pub use transform::Transformer;

//! Mock 8-K filing generation used by the `filingsim` tool and benchmarks

pub mod catalog;
mod generator;

pub use generator::*;

//! Stability report data model and parsing rules
//!
//! Turns the vendor's semi-structured report text into flat, keyed measurements.

pub mod parser;
pub mod report;
pub mod utils;

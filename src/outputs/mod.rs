//! Report outputs.
//!
//! - [`table`]: fixed-width text table printed to stdout
//! - [`json`]: optional JSON export written to a file

pub mod json;
pub mod table;

//! Document Model - Core document tree structure and types
//!
//! This crate provides the document model the table subsystem works on:
//! paragraphs, tables, rows and cells with stable node IDs, integer
//! positions over the tree, and the attribute/markup layer for cells.

mod node;
mod paragraph;
mod tree;
mod error;
mod attrs;
pub mod table;
pub mod schema;

pub use node::*;
pub use paragraph::*;
pub use tree::*;
pub use error::*;
pub use attrs::*;
pub use table::*;
pub use schema::*;

//! Table Resize - Grid maps over tables and interactive column/row resizing
//!
//! This crate derives a dense grid from a table's rows and cells (accounting
//! for merged cells), hit-tests cell borders under the pointer, and drives a
//! drag interaction that rewrites `colwidth` / `rowheight` cell attributes.

mod geometry;
mod table_map;
mod cache;
mod view;
mod edge;
mod state;
mod drag;
mod redistribute;
mod decorations;
mod table_view;
mod options;
mod plugin;
mod error;

pub use geometry::*;
pub use table_map::*;
pub use cache::*;
pub use view::*;
pub use edge::*;
pub use state::*;
pub use drag::*;
pub use redistribute::*;
pub use decorations::*;
pub use table_view::*;
pub use options::*;
pub use plugin::*;
pub use error::*;

//! Edit Engine - Steps, position mapping, and transaction dispatch
//!
//! This crate implements the editing layer the table subsystem mutates the
//! document through: position-addressed steps, mappings that carry positions
//! across a change, and atomic transactions applied by the engine.

mod step;
mod mapping;
mod transaction;
mod executor;
mod error;

pub use step::*;
pub use mapping::*;
pub use transaction::*;
pub use executor::*;
pub use error::*;

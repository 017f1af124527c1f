//! Roast Core - Entity Types
//!
//! Pure data structures for the startup roast playground. All other crates
//! depend on this. This crate contains ONLY data types - no business logic.

mod config;
mod entities;
mod enums;
mod error;
mod identity;

pub use config::*;
pub use entities::*;
pub use enums::*;
pub use error::*;
pub use identity::*;

//! Domain types shared across the crate.
//!
//! - the declaration vocabulary: handle newtypes, `Vector3`, the type table
//! - compiled native records and the natives database

pub mod handles;
pub mod schema;
pub mod types;
pub mod vector;

pub use handles::*;
pub use schema::{TypeClass, TypeEntry, TypeVocabulary};
pub use types::*;
pub use vector::{LayoutError, Vector3};

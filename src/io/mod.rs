//! Input/output helpers.
//!
//! - native document discovery + loading (`ingest`)
//! - natives database JSON (`export`)
//! - sitemap XML (`sitemap`)

pub mod export;
pub mod ingest;
pub mod sitemap;

pub use export::*;
pub use ingest::*;
pub use sitemap::*;

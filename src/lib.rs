//! `native-decls` library crate.
//!
//! The binary (`natives`) is a thin wrapper around this library so that:
//!
//! - the declaration vocabulary and annotation model are usable on their own
//! - the document compiler is testable without spawning processes
//! - each pipeline stage (parse, compile, export) stays easy to navigate

pub mod annotate;
pub mod app;
pub mod cli;
pub mod compat;
pub mod compile;
pub mod config;
pub mod decl;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;

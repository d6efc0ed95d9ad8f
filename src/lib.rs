//! Core library for the lenex-dian-sync command line application.
//!
//! The library distributes heat and lane assignments from a Lenex entry list
//! into a Dian meet document. Document adapters live under [`io`], the object
//! models and identity keys inside [`model`], the matching and assignment logic
//! in [`reconcile`], and the file-level orchestration under [`sync`].

pub mod error;
pub mod io;
pub mod model;
pub mod reconcile;
pub mod sync;

pub use error::{Result, ToolError};

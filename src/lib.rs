//! Core library for the aideon-catalog command line application.
//!
//! The library converts a book catalog between its XML document form and
//! tabular representations. IO adapters live under [`aideon::catalog::io`]
//! (XML, CSV and Excel), the record types inside [`aideon::catalog::model`],
//! the remote spreadsheet publisher in [`aideon::catalog::publish`], and the
//! file-to-file orchestration used by the CLI under [`aideon::catalog::sync`].

pub mod aideon;

pub use aideon::catalog::{CatalogError, Result, error, io, model, preview, publish, sync};

pub mod error;
pub mod io;
pub mod model;
pub mod preview;
pub mod publish;
pub mod sync;

pub use error::{CatalogError, Result};

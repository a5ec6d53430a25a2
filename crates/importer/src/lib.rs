pub mod column_map;
pub mod error;
pub mod pipeline;

pub use column_map::{CanonicalField, lookup_header};
pub use error::{ImporterError, Result};
pub use pipeline::{ImportRow, ImportSession};

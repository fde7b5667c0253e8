//! Output transformations applied to column values.

pub mod external;

pub use external::ExternalTransformation;

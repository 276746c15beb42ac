//! Infrastructure error conversions

pub mod conversions;

pub use conversions::{status_error, InfraError};

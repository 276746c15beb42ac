//! Tags, task associations and the batched tag lookup

pub mod lookup;
pub mod ports;
pub mod service;

pub use lookup::{TagLookup, TagLookupConfig};
pub use service::TagService;

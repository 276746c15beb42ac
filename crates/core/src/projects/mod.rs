//! Projects and their tasks

pub mod ports;
pub mod service;

pub use service::ProjectService;

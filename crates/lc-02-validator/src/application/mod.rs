//! Application layer for the System Validator

pub mod service;

pub use service::SystemValidator;

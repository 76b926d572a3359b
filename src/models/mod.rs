//! Core data models for the rewrite

pub mod context;
pub mod conversion;

pub use context::*;
pub use conversion::*;

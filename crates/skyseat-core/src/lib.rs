//! # skyseat-core
//!
//! Core crate for SkySeat. Contains the unified error system, the
//! configuration schemas, and typed identifiers shared by every other crate.
//!
//! This crate has **no** internal dependencies on other SkySeat crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;

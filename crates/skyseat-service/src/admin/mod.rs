//! Administrative operations outside the contended allocation path.

pub mod service;

pub use service::AdminService;

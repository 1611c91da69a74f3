//! Headless core for a unified communications client. The inbox view-model
//! (filtering, sectioning, detail sessions) lives in [`inbox`]; record
//! sources and the backend client live in [`api`].

pub mod api;
pub mod app;
pub mod error;
pub mod groups;
pub mod inbox;
pub mod storage;
pub mod utils;

pub use error::Error;

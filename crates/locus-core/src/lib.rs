//! Core types and trait definitions for the Locus tracking backend.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::TrackerStore`]; transports drive the
//! [`service::Tracker`] operations.

pub mod credential;
pub mod device;
pub mod error;
pub mod memory;
pub mod reading;
pub mod service;
pub mod store;

pub use error::{Error, Result};

//! # ldif-core
//!
//! Core types shared by the LDIF processing crates.
//!
//! This crate provides the error taxonomy and the immutable session configuration used by every
//! stage of the parse → validate → filter/sort → write pipeline.
//!
//! ## Modules
//!
//! - [`error`] - Error types and the crate-wide `Result` alias
//! - [`config`] - Validation policy and resource limits

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::LdifConfig;
pub use error::{Error, Result};

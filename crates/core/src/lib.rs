//! Learning Center Core - Shared types library.
//!
//! This crate provides common types used across all Learning Center
//! components:
//! - `api` - Public marketplace HTTP API
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, course names, emails,
//!   roles, and free-text course prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

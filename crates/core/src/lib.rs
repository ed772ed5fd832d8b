//! Lingofy Core - Shared types library.
//!
//! This crate provides common types used across all Lingofy components:
//! - `studio` - Content studio editing session (form state, image intake)
//! - `server` - HTTP server proxying the AI provider and accepting saves
//! - `cli` - Terminal front-end for the studio
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - The store profile, field paths, image references and wire types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

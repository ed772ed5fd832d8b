//! Core types for Lingofy.
//!
//! This module provides the editable profile record and the values that
//! travel between the studio and the server.

pub mod api;
pub mod field;
pub mod gallery;
pub mod image;
pub mod profile;
pub mod prompt;

pub use api::*;
pub use field::{FieldKind, FieldPath, FieldPathError, Section, apply_field_edit, parse_numeric};
pub use gallery::remove_at;
pub use image::{ImageReference, ImageReferenceError};
pub use profile::*;
pub use prompt::image_prompt;

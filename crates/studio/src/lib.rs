//! Lingofy Studio - the content studio's editing core.
//!
//! A [`StudioSession`] holds the creator's [`StoreProfile`](lingofy_core::StoreProfile),
//! the product image gallery and the assistant transcript. Anything that
//! leaves the process goes through a [`StudioBackend`]; [`HttpBackend`] is the
//! implementation that talks to `lingofy-server`.
//!
//! # Modules
//!
//! - [`form`] - Saving the profile and the save lifecycle
//! - [`intake`] - Validating and reading picked image files
//! - [`generation`] - AI product photos
//! - [`chat`] - The assistant conversation
//! - [`session`] - The editing session tying these together
//! - [`backend`] / [`http`] - The collaborator seam and its HTTP implementation
//! - [`config`] - Client configuration from the environment

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod chat;
pub mod config;
pub mod form;
pub mod generation;
pub mod http;
pub mod intake;
pub mod session;

#[cfg(test)]
mod testing;

pub use backend::{BackendError, StudioBackend};
pub use chat::{CHAT_GREETING, ChatError, ChatTranscript};
pub use config::{ConfigError, StudioConfig};
pub use form::{SaveError, SaveStatus, SavedConfirmation, save};
pub use generation::{GenerationError, generate_image};
pub use http::HttpBackend;
pub use intake::{
    DiskFile, IntakeError, MemoryFile, SelectedFile, ValidationError, remove_at,
    validate_and_ingest,
};
pub use session::StudioSession;

//! Shared command vocabulary.
//!
//! The closed set of identity tokens and control commands exchanged over
//! the transport. Producers and consumers both depend on this crate so the
//! wire contract lives in exactly one place.

pub mod command;
pub mod error;
pub mod identity;
pub mod tokens;

pub use command::Command;
pub use error::{ProtoError, Result};
pub use identity::Identity;

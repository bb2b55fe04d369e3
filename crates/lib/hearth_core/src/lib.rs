//! # hearth_core
//!
//! Core domain logic for Hearth: preferences, persona prompt, login ledger
//! and the Gemini chat relay.

pub mod chat;
pub mod gemini;
pub mod ledger;
pub mod password;
pub mod preferences;
pub mod prompt;
pub mod relay;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

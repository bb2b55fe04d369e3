//! Request handlers.

pub mod chat;
pub mod login;
pub mod preferences;

//! Durable prompt-specification storage.
//!
//! One JSON file per named session under `.promptcraft/sessions/`.
//! The CLI is stateless between runs; everything a user builds up
//! lives here.

pub mod store;

pub use store::SessionStore;

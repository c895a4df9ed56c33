//! Execution session lifecycle.
//!
//! This module owns the submit/await/classify cycle around the remote
//! execution service, the current language selection, and per-language
//! source persistence. UI/CLI layers call into this module to keep
//! responsibilities separated.

mod controller;

pub use controller::{SessionController, SessionError};

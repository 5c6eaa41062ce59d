//! Shared domain types for the visit statistics workspace.
//!
//! Holds the badge event model, the error type, timezone handling, the
//! allowed-hours policy and the CLI settings used by the binary.

pub mod error;
pub mod formatting;
pub mod models;
pub mod policy;
pub mod settings;
pub mod time_utils;

//! Helpers shared by the backend integration tests: logging init, unique
//! test values and assertions on the structured error body.

pub mod error_body;
pub mod logging;
pub mod unique_helpers;

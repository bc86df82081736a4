//! Shared test fixtures for the StudyGenie workspace.
//!
//! Provides a wiremock-backed stand-in for the Gemini `generateContent` API
//! and configurations pointing at it. Every fixture owns its own mock server,
//! so tests can run in parallel.

mod fixtures;

pub use fixtures::*;

//! # StudyGenie Core
//!
//! Shared types and traits for the StudyGenie completion gateway.
//!
//! This crate provides:
//! - Request/result types that live for a single HTTP request
//! - The [`ErrorClass`] taxonomy reported to callers
//! - The [`CompletionStrategy`] trait implemented by upstream clients

pub mod traits;
pub mod types;

pub use traits::CompletionStrategy;
pub use types::{
    ChatTurn, CompletionRequest, CompletionResult, ErrorClass, MAX_HISTORY_TURNS, QuizQuestion,
    Role, StrategyKind, validate_content
};

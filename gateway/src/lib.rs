//! # Completion Gateway
//!
//! Bounded, classified retries in front of the Gemini generation API.
//!
//! - [`CompletionGateway`]: the retry loop
//! - [`policy`]: pure attempt planning (strategy choice and backoff)
//! - [`classify`]: failure message → [`ErrorClass`](sg_core::ErrorClass)
//! - [`strategies`]: the two Gemini clients
//! - [`mock`]: scripted strategy for tests

pub mod classify;
pub mod gateway;
pub mod mock;
pub mod policy;
pub mod strategies;

pub use classify::{classify, classify_error};
pub use gateway::CompletionGateway;
pub use mock::ScriptedStrategy;
pub use policy::{AttemptPlan, RetryPolicy, plan_attempt};
pub use strategies::{DirectStrategy, SdkStrategy};

//! Knowledge stores, loading, and topic classification
//!
//! Implements the static knowledge side of the assistant:
//! - insertion-ordered fact tables with exact-then-substring lookup
//! - a verified store variant that bakes source attribution into answers
//! - a declarative loader for JSON and pipe-delimited sources
//! - keyword-based topic/aspect classification
//! - the built-in curated fact set and canned response table

pub mod builtin;
pub mod loader;
pub mod models;
pub mod store;
pub mod topics;

pub use builtin::{register_verified_facts, CannedResponses};
pub use loader::load_source;
pub use models::{normalize, FactEntry, Provenance, ResolutionResult};
pub use store::{FactStore, VerifiedStore};
pub use topics::{Aspect, Topic, TopicMatcher};

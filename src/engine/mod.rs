//! Resolution engine and safety filtering

pub mod resolver;
pub mod safety;

pub use resolver::{ResolutionEngine, DEFAULT_RESPONSE};
pub use safety::{RejectReason, SafetyConfig, SafetyFilter};

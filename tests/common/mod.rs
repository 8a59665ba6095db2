#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from agroscan for tests
pub use agroscan::screening::config::FilterConfig;
pub use agroscan::{Check, PlausibilityFilter, Verdict};

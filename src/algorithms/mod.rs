//! Optimization algorithms
//!
//! This module provides the generational genetic optimizer and its
//! cancellation handle.

pub mod cancellation;
pub mod genetic_optimizer;

pub mod prelude {
    pub use super::cancellation::*;
    pub use super::genetic_optimizer::*;
}

//! Gene-level building blocks
//!
//! This module provides the bounds genes are kept within.

pub mod bounds;

pub mod prelude {
    pub use super::bounds::*;
}

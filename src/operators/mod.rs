//! Genetic operators
//!
//! This module provides selection, regeneration, and mutation operators.

pub mod mutation;
pub mod regeneration;
pub mod selection;
pub mod traits;

pub mod prelude {
    pub use super::mutation::*;
    pub use super::regeneration::*;
    pub use super::selection::*;
    pub use super::traits::*;
}

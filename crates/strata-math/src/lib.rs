//! Numerical helpers for shape generation.

mod cubic;

pub use cubic::{CubicError, CubicRoots, solve_cubic};

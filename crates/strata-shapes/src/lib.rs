//! Block shape generators.

mod filling;
mod sphere;

pub use filling::Filling;
pub use sphere::{MAX_RADIUS, Sphere};

pub use atom::AtomPosition;
pub use geometry::*;

pub mod atom;
pub mod geometry;

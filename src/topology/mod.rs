//! Grid topology of the controlled intersections.
//!
//! Intersections are numbered row-major. Each one carries an orientation
//! flag that decides which pair of cardinal neighbours it shares rewards
//! with.

pub mod grid;
pub mod orientation;

pub use grid::{Direction, GridTopology};
pub use orientation::{Orientation, Orientations};

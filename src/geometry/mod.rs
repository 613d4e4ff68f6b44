//! Geometry: rectangles and the static hit-test primitives.
//!
//! Everything positioned on the canvas is a [`Rect`]; controls use the
//! `pick_*` helpers to implement their click and drag tests.

mod rect;

pub use rect::{pick_box, pick_circle, pick_point, Rect};

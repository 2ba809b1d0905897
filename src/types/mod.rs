mod shape;
mod value;

pub use shape::{Dimension, ElementKind, Shape};
pub use value::{ArrayValue, Bound, Bounds, BoxValue, Decoded, Element};

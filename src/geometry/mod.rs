/// Shapes, styles and the `Geometry` value produced by render calls.
pub mod shape;
/// Persistent, in-place mutable visual handles.
pub mod visual;

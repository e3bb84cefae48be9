//! Meshview Core Library - Geometry and paint-ordering logic
//!
//! This library provides the stateless core of an interactive triangle-mesh
//! viewer: the mesh data model, the text-format parser, fit-to-viewport
//! projection, drag-gesture rotation about a computed pivot, and the
//! back-to-front face ordering used to paint opaque faces without a depth
//! buffer. Rasterization lives behind the [`scene::Renderer`] trait and is
//! supplied by a frontend crate.

pub mod error;
pub mod geometry;
pub mod ordering;
pub mod parse;
pub mod projection;
pub mod rotation;
pub mod scene;

// Re-export commonly used types
pub use error::{ParseError, Result};
pub use geometry::{Bounds, Edge, Face, Mesh, Vertex, VertexId};
pub use ordering::{face_order, Occlusion, OrderingStrategy};
pub use parse::{load_mesh, parse_mesh};
pub use projection::{FitTransform, Viewport};
pub use rotation::{DragRotation, Gesture};
pub use scene::{Color, Renderer, Scene};

//! Scene orchestration: display flags, gestures, and the draw sequence
use nalgebra::Point2;
use tracing::debug;

use crate::geometry::{Face, Mesh};
use crate::ordering::{face_order, OrderingStrategy};
use crate::projection::{FitTransform, Viewport};
use crate::rotation::{pivot_for, DragRotation, Gesture};

/// Pointer deltas are scaled by this before they become rotation degrees
pub const DRAG_SENSITIVITY: f64 = 0.5;
/// Radius of vertex markers handed to the renderer
pub const VERTEX_RADIUS: f64 = 2.5;
/// Stroke width of edge lines
pub const EDGE_WIDTH: f64 = 2.0;

/// An RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Vertices and edges draw in plain blue
    pub const WIREFRAME: Color = Color { r: 0, g: 0, b: 255 };
}

/// Rasterization capability the scene draws through.
///
/// Points arrive already projected, in viewport coordinates with the origin
/// at the viewport center and y pointing up. Faces are emitted back-to-front
/// and must be painted in call order; there is no depth buffer.
pub trait Renderer {
    fn draw_line(&mut self, from: Point2<f64>, to: Point2<f64>, color: Color, width: f64);
    fn fill_polygon(&mut self, points: &[Point2<f64>], color: Color);
    fn fill_circle(&mut self, center: Point2<f64>, radius: f64, color: Color);
}

/// Face tint from the face's angle to the view axis: the more a face turns
/// toward the viewer, the brighter its blue
fn face_tint(mesh: &Mesh, face: &Face) -> Color {
    let normal = mesh.face_normal(face);
    let len = normal.norm();
    if len == 0.0 {
        return Color::WIREFRAME;
    }
    let angle = (normal.z.abs() / len).asin();
    Color {
        r: 0,
        g: 0,
        b: (95.0 + angle / std::f64::consts::PI * 320.0) as u8,
    }
}

/// Holds the active mesh, display flags, and interaction state, and turns
/// redraw requests into an ordered sequence of renderer calls.
#[derive(Debug)]
pub struct Scene {
    mesh: Mesh,
    gesture: Gesture,
    show_vertices_and_edges: bool,
    show_faces: bool,
    strategy: OrderingStrategy,
}

impl Scene {
    pub fn new(mesh: Mesh) -> Self {
        Self {
            mesh,
            gesture: Gesture::Idle,
            show_vertices_and_edges: true,
            show_faces: true,
            strategy: OrderingStrategy::default(),
        }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Replace the mesh wholesale. Display flags and the ordering strategy
    /// live for one mesh and reset with it; any in-flight gesture dies too.
    pub fn set_mesh(&mut self, mesh: Mesh) {
        *self = Self::new(mesh);
    }

    pub fn show_vertices_and_edges(&self) -> bool {
        self.show_vertices_and_edges
    }

    pub fn set_show_vertices_and_edges(&mut self, on: bool) {
        self.show_vertices_and_edges = on;
    }

    pub fn show_faces(&self) -> bool {
        self.show_faces
    }

    pub fn set_show_faces(&mut self, on: bool) {
        self.show_faces = on;
    }

    pub fn strategy(&self) -> OrderingStrategy {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: OrderingStrategy) {
        self.strategy = strategy;
    }

    /// Pointer press: fix the rotation pivot for the coming drag. Starting
    /// over an empty mesh stays idle.
    pub fn begin_drag(&mut self) {
        if let Some(pivot) = pivot_for(&self.mesh) {
            self.gesture = Gesture::Dragging { pivot };
        }
    }

    /// Pointer motion: `(dx, dy)` is the cumulative delta since the drag
    /// began, x right and y up. Recomputes the full rotation from the
    /// gesture's working base; a motion event while idle is ignored.
    pub fn drag_to(&mut self, dx: f64, dy: f64) {
        if let Gesture::Dragging { pivot } = self.gesture {
            let rotation =
                DragRotation::from_delta(dx * DRAG_SENSITIVITY, dy * DRAG_SENSITIVITY);
            rotation.apply_to_mesh(&mut self.mesh, pivot);
        }
    }

    /// Pointer release: commit the rotated coordinates and clear the pivot
    pub fn end_drag(&mut self) {
        if let Gesture::Dragging { .. } = self.gesture {
            self.mesh.commit_display();
            self.gesture = Gesture::Idle;
        }
    }

    /// Emit one frame. On `rescale` (initial load or viewport resize) the
    /// fit transform is recomputed and folded into the coordinates first.
    /// Faces go out back-to-front, then vertices and edges on top.
    pub fn draw<R: Renderer>(&mut self, viewport: Viewport, rescale: bool, renderer: &mut R) {
        if rescale {
            FitTransform::fit(&self.mesh, viewport).apply(&mut self.mesh);
        }

        if self.show_faces {
            let order = face_order(&self.mesh, self.strategy);
            debug!(faces = order.len(), strategy = ?self.strategy, "painting faces");
            for index in order {
                let face = &self.mesh.faces()[index];
                let points = self
                    .mesh
                    .face_points(face)
                    .map(|p| Point2::new(p.x, p.y));
                renderer.fill_polygon(&points, face_tint(&self.mesh, face));
            }
        }

        if self.show_vertices_and_edges {
            for v in self.mesh.vertices() {
                renderer.fill_circle(
                    Point2::new(v.display.x, v.display.y),
                    VERTEX_RADIUS,
                    Color::WIREFRAME,
                );
            }
            for e in self.mesh.edges() {
                let a = self.mesh.vertex(e.a).display;
                let b = self.mesh.vertex(e.b).display;
                renderer.draw_line(
                    Point2::new(a.x, a.y),
                    Point2::new(b.x, b.y),
                    Color::WIREFRAME,
                    EDGE_WIDTH,
                );
            }
        }
    }
}

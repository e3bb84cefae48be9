//! Drag-gesture rotation
//!
//! A drag delta `(dx, dy)` becomes a rotation of `|delta|` degrees about the
//! in-screen-plane axis perpendicular to the drag direction, so a horizontal
//! drag spins the mesh about a vertical axis and vice versa. The rotation is
//! recomputed in full from the gesture's fixed working base on every motion
//! event; deltas are never compounded incrementally.
use nalgebra::{Point3, Rotation3, Unit, Vector3};

use crate::geometry::Mesh;

/// Interaction state for the one possible pointer gesture. The pivot exists
/// exactly as long as a drag does, so it cannot be left behind stale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Idle,
    Dragging { pivot: Point3<f64> },
}

/// A rotation derived from a cumulative 2D drag delta
#[derive(Debug, Clone, Copy)]
pub struct DragRotation {
    rotation: Rotation3<f64>,
}

impl DragRotation {
    /// Axis-angle construction: angle in degrees is the drag magnitude, axis
    /// is the normalized `(-dy, dx, 0)`. A zero delta has no direction to
    /// rotate around and short-circuits to the identity; normalizing it would
    /// divide by zero.
    pub fn from_delta(dx: f64, dy: f64) -> Self {
        let angle_deg = (dx * dx + dy * dy).sqrt();
        if angle_deg == 0.0 {
            return Self {
                rotation: Rotation3::identity(),
            };
        }
        let axis = Unit::new_normalize(Vector3::new(-dy, dx, 0.0));
        Self {
            rotation: Rotation3::from_axis_angle(&axis, angle_deg.to_radians()),
        }
    }

    pub fn rotation(&self) -> &Rotation3<f64> {
        &self.rotation
    }

    /// Rotate a point about the pivot
    pub fn rotate_about(&self, point: Point3<f64>, pivot: Point3<f64>) -> Point3<f64> {
        pivot + self.rotation * (point - pivot)
    }

    /// Recompute every display coordinate from its working base. All vertices
    /// are rewritten before the caller can order or draw anything, so a
    /// redraw never sees a half-rotated mesh.
    pub fn apply_to_mesh(&self, mesh: &mut Mesh, pivot: Point3<f64>) {
        for v in mesh.vertices_mut() {
            v.display = self.rotate_about(v.working, pivot);
        }
    }
}

/// Pivot for a starting gesture: x and y from the vertex nearest the viewer
/// (maximum working z), z at the middle of the mesh's depth range. `None` for
/// an empty mesh, which has nothing to rotate.
pub fn pivot_for(mesh: &Mesh) -> Option<Point3<f64>> {
    let mut nearest: Option<&crate::geometry::Vertex> = None;
    let mut max_z = f64::NEG_INFINITY;
    let mut min_z = f64::INFINITY;
    for v in mesh.vertices() {
        if v.working.z > max_z {
            max_z = v.working.z;
            nearest = Some(v);
        }
        if v.working.z < min_z {
            min_z = v.working.z;
        }
    }
    nearest.map(|v| Point3::new(v.working.x, v.working.y, (max_z + min_z) / 2.0))
}

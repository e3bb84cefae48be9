//! Fit-to-viewport projection
//!
//! The viewer uses an orthographic-style mapping: a uniform scale and an x/y
//! shift that center the mesh and make its larger projected extent fill half
//! the viewport. Computed once per rescale event (initial load or viewport
//! resize), never per frame.
use crate::geometry::Mesh;

/// Target drawing area, in the same units the renderer consumes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Uniform scale plus center shift: `coord -> (coord + shift) * scale`.
///
/// The scale applies to all three components so depth stays proportional to
/// the view; the shift applies to x/y only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitTransform {
    pub scale: f64,
    pub shift_x: f64,
    pub shift_y: f64,
}

impl FitTransform {
    /// Compute the fit for the mesh's current working coordinates.
    ///
    /// Degenerate extents: a single point keeps scale 1, and when exactly one
    /// axis has zero extent the scale comes from the other axis alone.
    pub fn fit(mesh: &Mesh, viewport: Viewport) -> Self {
        if mesh.is_empty() {
            return Self {
                scale: 1.0,
                shift_x: 0.0,
                shift_y: 0.0,
            };
        }

        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for v in mesh.vertices() {
            min_x = min_x.min(v.working.x);
            max_x = max_x.max(v.working.x);
            min_y = min_y.min(v.working.y);
            max_y = max_y.max(v.working.y);
        }

        let size_x = max_x - min_x;
        let size_y = max_y - min_y;
        let half_w = viewport.width / 2.0;
        let half_h = viewport.height / 2.0;

        let scale = if size_x != 0.0 && size_y != 0.0 {
            (half_w / size_x).min(half_h / size_y)
        } else if size_x == 0.0 && size_y == 0.0 {
            1.0
        } else if size_x != 0.0 {
            half_w / size_x
        } else {
            half_h / size_y
        };

        Self {
            scale,
            shift_x: -(max_x + min_x) / 2.0,
            shift_y: -(max_y + min_y) / 2.0,
        }
    }

    /// Rewrite every vertex's working coordinate and reset display to match.
    /// Only valid while no gesture is active.
    pub fn apply(&self, mesh: &mut Mesh) {
        for v in mesh.vertices_mut() {
            v.working.x = (v.working.x + self.shift_x) * self.scale;
            v.working.y = (v.working.y + self.shift_y) * self.scale;
            v.working.z *= self.scale;
            v.display = v.working;
        }
    }
}

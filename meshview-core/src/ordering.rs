//! Back-to-front face ordering for painter-style rendering
//!
//! Display z increases toward the viewer, so painting runs in ascending z.
//! Two interchangeable strategies produce the order: a cheap sort on mean
//! vertex depth, and a pairwise-occlusion relation fed through a topological
//! sort for meshes where the approximation misorders overlapping faces.
use std::collections::VecDeque;

use nalgebra::{Point3, Vector2};
use tracing::warn;

use crate::geometry::{Face, Mesh};

/// Tolerance for depth comparisons at edge crossings
const DEPTH_EPS: f64 = 1e-5;

/// Which face-ordering algorithm the scene runs on redraw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderingStrategy {
    /// Sort by mean vertex depth. O(F log F), approximate for faces that
    /// cross or contain one another in projection.
    AverageDepth,
    /// Pairwise occlusion tests plus a topological sort. Exact wherever the
    /// pairwise relation is acyclic.
    Topological,
}

impl Default for OrderingStrategy {
    fn default() -> Self {
        OrderingStrategy::AverageDepth
    }
}

/// Paint-order relation between an ordered pair of faces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occlusion {
    /// The first face must be painted before (behind) the second
    Before,
    /// The first face must be painted after (in front of) the second
    After,
    /// No constraint between the pair
    Incomparable,
}

/// Compute the face paint order for the selected strategy. Indices refer to
/// `mesh.faces()`; the first index is painted first (farthest).
pub fn face_order(mesh: &Mesh, strategy: OrderingStrategy) -> Vec<usize> {
    match strategy {
        OrderingStrategy::AverageDepth => average_depth_order(mesh),
        OrderingStrategy::Topological => topological_order(mesh),
    }
}

/// Ascending sort on mean vertex depth
pub fn average_depth_order(mesh: &Mesh) -> Vec<usize> {
    let mut keyed: Vec<(usize, f64)> = mesh
        .faces()
        .iter()
        .enumerate()
        .map(|(i, f)| (i, mesh.face_mean_depth(f)))
        .collect();
    keyed.sort_by(|a, b| a.1.total_cmp(&b.1));
    keyed.into_iter().map(|(i, _)| i).collect()
}

/// Kahn's algorithm over the pairwise must-render-before relation.
///
/// Mutually overlapping faces can make the relation cyclic; whatever remains
/// with nonzero in-degree once the queue drains is appended in mean-depth
/// order instead of being dropped, so the output always paints every face
/// exactly once.
pub fn topological_order(mesh: &Mesh) -> Vec<usize> {
    let faces = mesh.faces();
    let n = faces.len();
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut in_degree = vec![0usize; n];

    for i in 0..n {
        for j in i + 1..n {
            match compare_faces(mesh, &faces[i], &faces[j]) {
                Occlusion::Before => {
                    successors[i].push(j);
                    in_degree[j] += 1;
                }
                Occlusion::After => {
                    successors[j].push(i);
                    in_degree[i] += 1;
                }
                Occlusion::Incomparable => {}
            }
        }
    }

    let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(head) = queue.pop_front() {
        order.push(head);
        for &next in &successors[head] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    if order.len() < n {
        let mut residual: Vec<usize> = (0..n).filter(|&i| in_degree[i] > 0).collect();
        warn!(
            residual = residual.len(),
            "occlusion relation is cyclic; painting the remainder in depth order"
        );
        residual.sort_by(|&a, &b| {
            mesh.face_mean_depth(&faces[a])
                .total_cmp(&mesh.face_mean_depth(&faces[b]))
        });
        order.extend(residual);
    }
    order
}

/// Decide the paint-order relation for a face pair. Stages short-circuit at
/// the first decisive answer: projected bounding boxes, depth separation,
/// edge crossings, then projected containment.
pub fn compare_faces(mesh: &Mesh, f1: &Face, f2: &Face) -> Occlusion {
    let b1 = mesh.face_bounds(f1);
    let b2 = mesh.face_bounds(f2);

    // Disjoint projections cannot occlude each other
    if b1.max_x <= b2.min_x
        || b2.max_x <= b1.min_x
        || b1.max_y <= b2.min_y
        || b2.max_y <= b1.min_y
    {
        return Occlusion::Incomparable;
    }
    // Fully separated depth ranges decide immediately
    if b1.max_z <= b2.min_z {
        return Occlusion::Before;
    }
    if b2.max_z <= b1.min_z {
        return Occlusion::After;
    }

    let p1 = mesh.face_points(f1);
    let p2 = mesh.face_points(f2);
    match edge_crossings(&p1, &p2) {
        Occlusion::Incomparable => containment(&p1, &p2),
        decided => decided,
    }
}

/// Test all nine edge pairs for a projected crossing with a decisive depth
/// difference. The first decisive pair wins.
fn edge_crossings(p1: &[Point3<f64>; 3], p2: &[Point3<f64>; 3]) -> Occlusion {
    for i in 0..3 {
        for j in 0..3 {
            let (a, b) = (p1[i], p1[(i + 1) % 3]);
            let (c, d) = (p2[j], p2[(j + 1) % 3]);
            if let Some((z1, z2)) = segment_depths(a, b, c, d) {
                if z1 < z2 - DEPTH_EPS {
                    return Occlusion::Before;
                }
                if z1 > z2 + DEPTH_EPS {
                    return Occlusion::After;
                }
            }
        }
    }
    Occlusion::Incomparable
}

/// Solve the 2x2 system for the crossing of segments `ab` and `cd` in x/y
/// projection. Returns both segments' interpolated depths at the crossing
/// when the parameters are strictly interior to (0, 1); parallel segments
/// and endpoint touches yield `None`.
fn segment_depths(
    a: Point3<f64>,
    b: Point3<f64>,
    c: Point3<f64>,
    d: Point3<f64>,
) -> Option<(f64, f64)> {
    let a1 = b.x - a.x;
    let b1 = c.x - d.x;
    let c1 = a.x - c.x;
    let a2 = b.y - a.y;
    let b2 = c.y - d.y;
    let c2 = a.y - c.y;
    let det = a1 * b2 - a2 * b1;
    if det == 0.0 {
        return None;
    }
    let alpha = (b1 * c2 - b2 * c1) / det;
    let beta = (a2 * c1 - a1 * c2) / det;
    if alpha <= 0.0 || alpha >= 1.0 || beta <= 0.0 || beta >= 1.0 {
        return None;
    }
    Some((a.z + alpha * (b.z - a.z), c.z + beta * (d.z - c.z)))
}

/// With no crossing edges the projections are either disjoint or nested. The
/// first vertex found inside the other face decides by comparing its own
/// depth with the containing face's surface depth there; an exact tie, or a
/// face too degenerate to interpolate, decides nothing.
fn containment(p1: &[Point3<f64>; 3], p2: &[Point3<f64>; 3]) -> Occlusion {
    for i in 0..3 {
        if point_in_triangle(p1[i], p2) {
            return match surface_depth(p1[i], p2) {
                Some(z) if p1[i].z < z => Occlusion::Before,
                Some(z) if p1[i].z > z => Occlusion::After,
                _ => Occlusion::Incomparable,
            };
        }
        if point_in_triangle(p2[i], p1) {
            return match surface_depth(p2[i], p1) {
                Some(z) if z < p2[i].z => Occlusion::Before,
                Some(z) if z > p2[i].z => Occlusion::After,
                _ => Occlusion::Incomparable,
            };
        }
    }
    Occlusion::Incomparable
}

fn xy(p: Point3<f64>) -> Vector2<f64> {
    Vector2::new(p.x, p.y)
}

/// Same-side test: `p` is strictly inside the projected triangle when, for
/// every edge, it lies on the same side as the opposite vertex.
fn point_in_triangle(p: Point3<f64>, tri: &[Point3<f64>; 3]) -> bool {
    for i in 0..3 {
        let a = tri[i];
        let b = tri[(i + 1) % 3];
        let opposite = tri[(i + 2) % 3];
        let edge = xy(b) - xy(a);
        let normal = Vector2::new(edge.y, -edge.x);
        if normal.dot(&(xy(opposite) - xy(a))) * normal.dot(&(xy(p) - xy(a))) <= 0.0 {
            return false;
        }
    }
    true
}

/// Depth of the triangle's surface at the x/y position of `p`, solved from
/// the two edge vectors out of the first vertex. `None` when the projected
/// triangle has zero area.
fn surface_depth(p: Point3<f64>, tri: &[Point3<f64>; 3]) -> Option<f64> {
    let e1 = xy(tri[1]) - xy(tri[0]);
    let e2 = xy(tri[2]) - xy(tri[0]);
    let e3 = xy(p) - xy(tri[0]);
    let det = e1.x * e2.y - e1.y * e2.x;
    if det == 0.0 {
        return None;
    }
    let a = (e3.x * e2.y - e2.x * e3.y) / det;
    let b = (e1.x * e3.y - e3.x * e1.y) / det;
    Some(tri[0].z + a * (tri[1].z - tri[0].z) + b * (tri[2].z - tri[0].z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Vertex, VertexId};
    use approx::assert_relative_eq;

    /// Build a mesh of triangles from raw coordinate triples
    fn mesh_of(triangles: &[[(f64, f64, f64); 3]]) -> Mesh {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        for (t, tri) in triangles.iter().enumerate() {
            let base = (t * 3) as VertexId;
            for (k, &(x, y, z)) in tri.iter().enumerate() {
                vertices.push(Vertex::new(base + k as VertexId, x, y, z));
            }
            faces.push(Face::new(base, base + 1, base + 2));
        }
        Mesh::from_parts(vertices, faces).unwrap()
    }

    fn positions(order: &[usize]) -> Vec<usize> {
        let mut pos = vec![0; order.len()];
        for (rank, &face) in order.iter().enumerate() {
            pos[face] = rank;
        }
        pos
    }

    #[test]
    fn single_face_orders_as_singleton() {
        let mesh = mesh_of(&[[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.0, 1.0, 0.0)]]);
        assert_eq!(face_order(&mesh, OrderingStrategy::AverageDepth), vec![0]);
        assert_eq!(face_order(&mesh, OrderingStrategy::Topological), vec![0]);
        assert_relative_eq!(mesh.face_mean_depth(&mesh.faces()[0]), 0.0);
    }

    #[test]
    fn average_depth_sorts_far_to_near() {
        let mesh = mesh_of(&[
            [(0.0, 0.0, 5.0), (1.0, 0.0, 5.0), (0.0, 1.0, 5.0)],
            [(0.0, 0.0, -2.0), (1.0, 0.0, -2.0), (0.0, 1.0, -2.0)],
            [(0.0, 0.0, 1.0), (1.0, 0.0, 1.0), (0.0, 1.0, 1.0)],
        ]);
        assert_eq!(average_depth_order(&mesh), vec![1, 2, 0]);
    }

    #[test]
    fn disjoint_projections_are_incomparable() {
        // Same z, bounding boxes apart in x
        let mesh = mesh_of(&[
            [(0.0, 0.0, 1.0), (1.0, 0.0, 1.0), (0.0, 1.0, 1.0)],
            [(5.0, 0.0, 1.0), (6.0, 0.0, 1.0), (5.0, 1.0, 1.0)],
        ]);
        let faces = mesh.faces();
        assert_eq!(
            compare_faces(&mesh, &faces[0], &faces[1]),
            Occlusion::Incomparable
        );
        // Either relative order is acceptable; both faces must be painted
        let mut order = topological_order(&mesh);
        order.sort_unstable();
        assert_eq!(order, vec![0, 1]);
    }

    #[test]
    fn depth_separated_overlap_orders_far_first() {
        // Identical footprint, one face entirely behind the other
        let mesh = mesh_of(&[
            [(0.0, 0.0, 4.0), (2.0, 0.0, 4.0), (0.0, 2.0, 4.0)],
            [(0.0, 0.0, -1.0), (2.0, 0.0, -1.0), (0.0, 2.0, -1.0)],
        ]);
        let faces = mesh.faces();
        assert_eq!(compare_faces(&mesh, &faces[0], &faces[1]), Occlusion::After);
        assert_eq!(compare_faces(&mesh, &faces[1], &faces[0]), Occlusion::Before);
        assert_eq!(topological_order(&mesh), vec![1, 0]);
    }

    #[test]
    fn crossing_edges_order_by_depth_at_the_crossing() {
        // Two slanted strips crossing in projection; overlapping z ranges so
        // the depth-separation stage cannot decide. The first strip passes
        // beneath the second at the crossing.
        let mesh = mesh_of(&[
            [(-4.0, -0.5, -3.0), (-4.0, 0.5, -3.0), (4.0, 0.0, 1.0)],
            [(-0.5, -4.0, 2.0), (0.5, -4.0, 2.0), (0.0, 4.0, 0.0)],
        ]);
        let faces = mesh.faces();
        assert_eq!(compare_faces(&mesh, &faces[0], &faces[1]), Occlusion::Before);
        assert_eq!(compare_faces(&mesh, &faces[1], &faces[0]), Occlusion::After);
        assert_eq!(topological_order(&mesh), vec![0, 1]);
    }

    #[test]
    fn crossing_strips_in_a_common_plane_are_incomparable() {
        // Both strips lie in the plane z = x, so the depths tie at every
        // projected crossing and no vertex is contained in the other face
        let mesh = mesh_of(&[
            [(-4.0, -0.5, -4.0), (-4.0, 0.5, -4.0), (4.0, 0.0, 4.0)],
            [(-0.5, -4.0, -0.5), (0.5, -4.0, 0.5), (0.0, 4.0, 0.0)],
        ]);
        let faces = mesh.faces();
        assert_eq!(
            compare_faces(&mesh, &faces[0], &faces[1]),
            Occlusion::Incomparable
        );
    }

    #[test]
    fn contained_face_orders_against_the_surface() {
        // A small high triangle floating over the middle of a large slanted
        // one; no edges cross and the z ranges overlap, so neither the depth
        // stage nor the edge stage can decide and containment must.
        let mesh = mesh_of(&[
            [(-10.0, -10.0, -2.0), (10.0, -10.0, 2.0), (0.0, 10.0, 0.0)],
            [(-1.0, -1.0, 1.5), (1.0, -1.0, 1.5), (0.0, 1.0, 1.5)],
        ]);
        let faces = mesh.faces();
        assert_eq!(compare_faces(&mesh, &faces[0], &faces[1]), Occlusion::Before);
        assert_eq!(compare_faces(&mesh, &faces[1], &faces[0]), Occlusion::After);
        assert_eq!(topological_order(&mesh), vec![0, 1]);
    }

    #[test]
    fn containment_depth_tie_is_incomparable() {
        // The small face's first vertex touches the big slanted face's
        // surface exactly (plane z = x at (-1, -1)); the tie decides nothing.
        // Power-of-two coordinates keep the interpolated depth exact.
        let mesh = mesh_of(&[
            [(-8.0, -8.0, -8.0), (8.0, -8.0, 8.0), (0.0, 8.0, 0.0)],
            [(-1.0, -1.0, -1.0), (1.0, -1.0, 0.5), (0.0, 1.0, 0.25)],
        ]);
        let faces = mesh.faces();
        assert_eq!(
            compare_faces(&mesh, &faces[0], &faces[1]),
            Occlusion::Incomparable
        );
    }

    #[test]
    fn degenerate_projection_cannot_decide_containment() {
        // The large face projects to a zero-area sliver: surface_depth has a
        // zero denominator and must report no decision, not panic
        let tri = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 1.0),
            Point3::new(4.0, 0.0, 2.0),
        ];
        assert_eq!(surface_depth(Point3::new(1.0, 0.0, 5.0), &tri), None);
    }

    #[test]
    fn parallel_segments_do_not_cross() {
        assert_eq!(
            segment_depths(
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 5.0),
                Point3::new(1.0, 1.0, 5.0),
            ),
            None
        );
    }

    #[test]
    fn endpoint_touch_is_not_a_crossing() {
        // Segments sharing an endpoint: alpha lands on the open bound
        assert_eq!(
            segment_depths(
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(1.0, 1.0, 5.0),
                Point3::new(2.0, 0.0, 5.0),
            ),
            None
        );
    }

    #[test]
    fn point_in_triangle_is_strict() {
        let tri = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
        ];
        assert!(point_in_triangle(Point3::new(1.0, 1.0, 9.0), &tri));
        // On an edge and outside are both rejected
        assert!(!point_in_triangle(Point3::new(2.0, 0.0, 0.0), &tri));
        assert!(!point_in_triangle(Point3::new(5.0, 5.0, 0.0), &tri));
    }

    #[test]
    fn topological_order_is_a_linear_extension() {
        let mesh = mesh_of(&[
            [(0.0, 0.0, 4.0), (2.0, 0.0, 4.0), (0.0, 2.0, 4.0)],
            [(0.0, 0.0, -1.0), (2.0, 0.0, -1.0), (0.0, 2.0, -1.0)],
            [(0.5, 0.2, 1.0), (1.5, 0.2, 1.0), (0.5, 1.2, 1.0)],
            [(40.0, 40.0, 0.0), (41.0, 40.0, 0.0), (40.0, 41.0, 0.0)],
        ]);
        let faces = mesh.faces();
        let order = topological_order(&mesh);
        let pos = positions(&order);
        for i in 0..faces.len() {
            for j in i + 1..faces.len() {
                match compare_faces(&mesh, &faces[i], &faces[j]) {
                    Occlusion::Before => assert!(pos[i] < pos[j], "{i} must precede {j}"),
                    Occlusion::After => assert!(pos[j] < pos[i], "{j} must precede {i}"),
                    Occlusion::Incomparable => {}
                }
            }
        }
    }

    /// Three sloped bars laid along the sides of a triangle, each passing
    /// over the start of the next. The pairwise relation is a 3-cycle.
    fn cyclic_bars() -> Mesh {
        let corners: [(f64, f64); 3] = [(0.0, 0.0), (12.0, 0.0), (6.0, 9.0)];
        let mut triangles = Vec::new();
        for i in 0..3 {
            let (sx, sy) = corners[i];
            let (ex, ey) = corners[(i + 1) % 3];
            let len = ((ex - sx).powi(2) + (ey - sy).powi(2)).sqrt();
            let (dx, dy) = ((ex - sx) / len, (ey - sy) / len);
            // Perpendicular spread at the low starting end, apex past the
            // high end; z climbs 0 -> 2 along the bar
            let (px, py) = (-dy, dx);
            triangles.push([
                (sx - dx + px * 0.6, sy - dy + py * 0.6, 0.0),
                (sx - dx - px * 0.6, sy - dy - py * 0.6, 0.0),
                (ex + dx, ey + dy, 2.0),
            ]);
        }
        mesh_of(&triangles)
    }

    #[test]
    fn mutually_overlapping_bars_form_a_cycle() {
        let mesh = cyclic_bars();
        let faces = mesh.faces();
        // Each bar's high end crosses over the next bar's low end
        assert_eq!(compare_faces(&mesh, &faces[0], &faces[1]), Occlusion::After);
        assert_eq!(compare_faces(&mesh, &faces[1], &faces[2]), Occlusion::After);
        assert_eq!(compare_faces(&mesh, &faces[2], &faces[0]), Occlusion::After);
    }

    #[test]
    fn cyclic_remainder_falls_back_to_depth_order() {
        let mesh = cyclic_bars();
        let mut order = topological_order(&mesh);
        // Every face is still painted exactly once
        order.sort_unstable();
        assert_eq!(order, vec![0, 1, 2]);
    }
}

//! Mesh data model: vertices, faces, and deduplicated edges
use std::collections::{BTreeMap, BTreeSet};

use nalgebra::{Point3, Vector3};

use crate::error::{ParseError, Result};

/// Key type for vertices within a mesh
pub type VertexId = i32;

/// A mesh vertex carrying the three coordinate stages of the viewing pipeline
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub id: VertexId,
    /// Coordinate as authored in the input file. Never mutated.
    pub original: Point3<f64>,
    /// Post-fit, pre-rotation coordinate. Rewritten on rescale and on gesture
    /// commit, nowhere else.
    pub working: Point3<f64>,
    /// Coordinate used for drawing and ordering. Equals `working` whenever no
    /// gesture is active; leads it while a drag is in flight.
    pub display: Point3<f64>,
}

impl Vertex {
    pub fn new(id: VertexId, x: f64, y: f64, z: f64) -> Self {
        let p = Point3::new(x, y, z);
        Self {
            id,
            original: p,
            working: p,
            display: p,
        }
    }
}

/// A triangular face referring to three vertices by id.
///
/// Ids are stored in ascending order regardless of the order they were given
/// in, so edge extraction and the pairwise occlusion tests see every face the
/// same way no matter the input winding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    ids: [VertexId; 3],
}

impl Face {
    pub fn new(a: VertexId, b: VertexId, c: VertexId) -> Self {
        let mut ids = [a, b, c];
        ids.sort_unstable();
        Self { ids }
    }

    /// Vertex ids in canonical (ascending) order
    pub fn ids(&self) -> [VertexId; 3] {
        self.ids
    }
}

/// An undirected edge between two vertices, `a < b` by construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub a: VertexId,
    pub b: VertexId,
}

/// Axis-aligned extrema of a set of display coordinates: the x/y extents feed
/// the projected-overlap tests, the z extents the depth-separation test.
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Bounds {
    pub fn of(points: &[Point3<f64>]) -> Self {
        let mut b = Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
            min_z: f64::INFINITY,
            max_z: f64::NEG_INFINITY,
        };
        for p in points {
            b.min_x = b.min_x.min(p.x);
            b.max_x = b.max_x.max(p.x);
            b.min_y = b.min_y.min(p.y);
            b.max_y = b.max_y.max(p.y);
            b.min_z = b.min_z.min(p.z);
            b.max_z = b.max_z.max(p.z);
        }
        b
    }
}

/// A triangle mesh: an id-keyed vertex store, the face list, and the edge
/// list derived from the faces.
///
/// Topology is fixed at construction; only vertex coordinates mutate
/// afterwards. Faces and edges refer into the vertex store by id rather than
/// holding copies, so rescaling and rotation are observed everywhere at once.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    vertices: BTreeMap<VertexId, Vertex>,
    faces: Vec<Face>,
    edges: Vec<Edge>,
}

impl Mesh {
    /// Build a mesh, validating that vertex ids are unique and that every
    /// face id resolves.
    pub fn from_parts(vertices: Vec<Vertex>, faces: Vec<Face>) -> Result<Self> {
        let mut store = BTreeMap::new();
        for v in vertices {
            let id = v.id;
            if store.insert(id, v).is_some() {
                return Err(ParseError::DuplicateVertex(id));
            }
        }
        for face in &faces {
            for id in face.ids() {
                if !store.contains_key(&id) {
                    return Err(ParseError::UnknownVertex(id));
                }
            }
        }
        Ok(Self::assemble(store, faces))
    }

    /// Many faces share edges, so edges are deduplicated by their normalized
    /// id pair while building. Face ids are already ascending, which makes
    /// each pair normalized for free.
    fn assemble(vertices: BTreeMap<VertexId, Vertex>, faces: Vec<Face>) -> Self {
        let mut edges = Vec::new();
        let mut seen: BTreeSet<(VertexId, VertexId)> = BTreeSet::new();
        for face in &faces {
            let [a, b, c] = face.ids();
            for pair in [(a, b), (a, c), (b, c)] {
                if seen.insert(pair) {
                    edges.push(Edge {
                        a: pair.0,
                        b: pair.1,
                    });
                }
            }
        }
        Self {
            vertices,
            faces,
            edges,
        }
    }

    /// A regular tetrahedron, handy as a demo object when no file is given
    pub fn tetrahedron(size: f64) -> Self {
        let h = size / 2.0;
        let mut store = BTreeMap::new();
        for v in [
            Vertex::new(0, h, h, h),
            Vertex::new(1, h, -h, -h),
            Vertex::new(2, -h, h, -h),
            Vertex::new(3, -h, -h, h),
        ] {
            store.insert(v.id, v);
        }
        let faces = vec![
            Face::new(0, 1, 2),
            Face::new(0, 1, 3),
            Face::new(0, 2, 3),
            Face::new(1, 2, 3),
        ];
        Self::assemble(store, faces)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Look up a vertex. Face and edge ids are validated at construction, so
    /// lookups through them cannot miss.
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[&id]
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    pub(crate) fn vertices_mut(&mut self) -> impl Iterator<Item = &mut Vertex> {
        self.vertices.values_mut()
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Display coordinates of a face's three vertices, in canonical order
    pub fn face_points(&self, face: &Face) -> [Point3<f64>; 3] {
        face.ids().map(|id| self.vertex(id).display)
    }

    /// Face normal in display space, from the cross product of two edge
    /// vectors. Not normalized; a degenerate face yields the zero vector.
    pub fn face_normal(&self, face: &Face) -> Vector3<f64> {
        let [a, b, c] = self.face_points(face);
        (b - a).cross(&(c - a))
    }

    /// Mean display depth of a face's vertices; the average-depth sort key
    pub fn face_mean_depth(&self, face: &Face) -> f64 {
        let [a, b, c] = self.face_points(face);
        (a.z + b.z + c.z) / 3.0
    }

    pub fn face_bounds(&self, face: &Face) -> Bounds {
        Bounds::of(&self.face_points(face))
    }

    /// Gesture commit: adopt the rotated display coordinates as the new
    /// working base. The only writer of `working` besides the projector.
    pub fn commit_display(&mut self) {
        for v in self.vertices.values_mut() {
            v.working = v.display;
        }
    }
}

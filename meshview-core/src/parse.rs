//! Parser for the comma-separated mesh text format
//!
//! ```text
//! N,M
//! id,x,y,z      (N vertex records)
//! v1,v2,v3      (M face records)
//! ```
//!
//! Construction is all-or-nothing: the first violation aborts with a
//! [`ParseError`] and no mesh is produced.
use std::path::Path;

use nom::character::complete::{i32 as nom_i32, u32 as nom_u32};
use nom::combinator::all_consuming;
use nom::number::complete::double;
use tracing::debug;

use crate::error::{ParseError, Result};
use crate::geometry::{Face, Mesh, Vertex, VertexId};

type NomError<'a> = nom::error::Error<&'a str>;

/// Parse mesh text into a [`Mesh`]
pub fn parse_mesh(text: &str) -> Result<Mesh> {
    let mut lines = text.lines();
    let header = lines
        .next()
        .ok_or_else(|| ParseError::MalformedHeader(String::new()))?;
    let (vertex_count, face_count) = parse_header(header)?;
    let want = 1 + vertex_count + face_count;

    let mut vertices = Vec::with_capacity(vertex_count);
    for offset in 0..vertex_count {
        let line_no = 2 + offset;
        let line = lines.next().ok_or(ParseError::TruncatedFile {
            want,
            got: line_no - 1,
        })?;
        vertices.push(parse_vertex_line(line, line_no)?);
    }

    let mut faces = Vec::with_capacity(face_count);
    for offset in 0..face_count {
        let line_no = 2 + vertex_count + offset;
        let line = lines.next().ok_or(ParseError::TruncatedFile {
            want,
            got: line_no - 1,
        })?;
        faces.push(parse_face_line(line, line_no)?);
    }

    let mesh = Mesh::from_parts(vertices, faces)?;
    debug!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        edges = mesh.edge_count(),
        "parsed mesh"
    );
    Ok(mesh)
}

/// Read and parse a mesh file
pub fn load_mesh(path: impl AsRef<Path>) -> Result<Mesh> {
    let text = std::fs::read_to_string(path)?;
    parse_mesh(&text)
}

fn parse_header(line: &str) -> Result<(usize, usize)> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 2 {
        return Err(ParseError::MalformedHeader(line.to_string()));
    }
    let n = count_field(fields[0], 1)?;
    let m = count_field(fields[1], 1)?;
    Ok((n, m))
}

fn parse_vertex_line(line: &str, line_no: usize) -> Result<Vertex> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 4 {
        return Err(ParseError::MalformedVertexLine { line: line_no });
    }
    let id = id_field(fields[0], line_no)?;
    let x = float_field(fields[1], line_no)?;
    let y = float_field(fields[2], line_no)?;
    let z = float_field(fields[3], line_no)?;
    Ok(Vertex::new(id, x, y, z))
}

fn parse_face_line(line: &str, line_no: usize) -> Result<Face> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 3 {
        return Err(ParseError::MalformedFaceLine { line: line_no });
    }
    let a = id_field(fields[0], line_no)?;
    let b = id_field(fields[1], line_no)?;
    let c = id_field(fields[2], line_no)?;
    Ok(Face::new(a, b, c))
}

fn count_field(raw: &str, line: usize) -> Result<usize> {
    all_consuming(nom_u32::<&str, NomError>)(raw.trim())
        .map(|(_, v)| v as usize)
        .map_err(|_| bad_number(raw, line))
}

fn id_field(raw: &str, line: usize) -> Result<VertexId> {
    all_consuming(nom_i32::<&str, NomError>)(raw.trim())
        .map(|(_, v)| v)
        .map_err(|_| bad_number(raw, line))
}

fn float_field(raw: &str, line: usize) -> Result<f64> {
    all_consuming(double::<&str, NomError>)(raw.trim())
        .map(|(_, v)| v)
        .map_err(|_| bad_number(raw, line))
}

fn bad_number(raw: &str, line: usize) -> ParseError {
    ParseError::BadNumber {
        line,
        field: raw.trim().to_string(),
    }
}

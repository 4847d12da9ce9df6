use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use glam::Vec3;
use tracing::{debug, info, warn};

use super::coordinates::normalize;
use super::{Edge, Mesh, Topology, TopologyKind};
use crate::error::{FxError, Result};

/// How a face-vertex file is turned into a drawable mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub kind: TopologyKind,
    /// Negate Y and Z after normalising.
    pub flip_yz: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            kind: TopologyKind::Edges,
            flip_yz: true,
        }
    }
}

/// Load and normalise an OBJ file.
pub fn load_mesh(path: &Path, options: &LoadOptions) -> Result<Mesh> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let mesh = parse_mesh(&mut reader, options)?;
    info!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        primitives = mesh.topology().primitive_count(),
        topology = %options.kind,
        "Loaded mesh"
    );
    Ok(mesh)
}

/// Parse OBJ text from any buffered reader and normalise the result.
///
/// Only `v` and `f` records matter. Vertices keep file order across all
/// `o`/`g` groups, so one index always names one vertex. Face tokens may be
/// `i`, `i/j`, `i//k` or `i/j/k`; negative indices count back from the
/// vertices read so far. A face naming a vertex that does not exist is
/// skipped on its own.
pub fn parse_mesh<R: BufRead>(reader: &mut R, options: &LoadOptions) -> Result<Mesh> {
    let mut vertices: Vec<Vec3> = Vec::new();
    let mut faces: Vec<Vec<usize>> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                if let Some(v) = parse_position(tokens) {
                    vertices.push(v);
                }
            }
            Some("f") => {
                let face: Vec<usize> = tokens
                    .filter_map(|t| resolve_index(t, vertices.len()))
                    .collect();
                if face.len() >= 3 {
                    faces.push(face);
                }
            }
            _ => {}
        }
    }

    debug!(
        vertices = vertices.len(),
        faces = faces.len(),
        "Parsed OBJ records"
    );

    if vertices.is_empty() {
        return Err(FxError::Load("Mesh has no vertices".into()));
    }

    let mut builder = TopologyBuilder::new(options.kind);
    let mut skipped = 0usize;
    for face in &faces {
        if face.iter().any(|&i| i >= vertices.len()) {
            skipped += 1;
            continue;
        }
        builder.add_face(face);
    }
    if skipped > 0 {
        warn!(skipped, "Skipped faces with out-of-range vertex indices");
    }

    let topology = builder.finish();
    if topology.is_empty() {
        return Err(FxError::Load("Mesh has no usable faces".into()));
    }

    let source = normalize(&mut vertices, options.flip_yz);
    debug!(
        min = ?source.min,
        max = ?source.max,
        "Normalised mesh from source bounds"
    );

    Ok(Mesh::new(vertices, topology))
}

fn parse_position<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Option<Vec3> {
    let mut next = || tokens.next()?.parse::<f32>().ok();
    Some(Vec3::new(next()?, next()?, next()?))
}

/// Zero-based vertex index of one face token, or `None` if it is malformed.
///
/// Positive indices are checked against the final vertex count later.
fn resolve_index(token: &str, seen: usize) -> Option<usize> {
    let head = token.split('/').next()?;
    let index: i64 = head.parse().ok()?;
    match index {
        0 => None,
        i if i > 0 => usize::try_from(i - 1).ok(),
        i => seen.checked_sub(usize::try_from(i.unsigned_abs()).ok()?),
    }
}

/// Accumulates faces into either a deduplicated edge list or a triangle list.
enum TopologyBuilder {
    Edges { seen: HashSet<u64>, edges: Vec<Edge> },
    Triangles(Vec<[u32; 3]>),
}

impl TopologyBuilder {
    fn new(kind: TopologyKind) -> Self {
        match kind {
            TopologyKind::Edges => TopologyBuilder::Edges {
                seen: HashSet::new(),
                edges: Vec::new(),
            },
            TopologyKind::Triangles => TopologyBuilder::Triangles(Vec::new()),
        }
    }

    fn add_face(&mut self, face: &[usize]) {
        if face.len() < 3 {
            return;
        }
        match self {
            TopologyBuilder::Edges { seen, edges } => {
                let n = face.len();
                for i in 0..n {
                    let Some(edge) = Edge::new(face[i] as u32, face[(i + 1) % n] as u32) else {
                        continue;
                    };
                    if seen.insert(edge.key()) {
                        edges.push(edge);
                    }
                }
            }
            TopologyBuilder::Triangles(tris) => {
                // Fan-triangulate: v0 with every consecutive pair
                for i in 1..face.len() - 1 {
                    tris.push([face[0] as u32, face[i] as u32, face[i + 1] as u32]);
                }
            }
        }
    }

    fn finish(self) -> Topology {
        match self {
            TopologyBuilder::Edges { edges, .. } => Topology::Edges(edges),
            TopologyBuilder::Triangles(tris) => Topology::Triangles(tris),
        }
    }
}

pub mod coordinates;
pub mod loader;
pub mod projector;

use glam::{Vec2, Vec3};

use crate::types::PrimVertex;

pub use loader::{LoadOptions, load_mesh, parse_mesh};
pub use projector::{MeshBatch, ProjectionKind, YawProjection, project_auto_fit, project_yaw};

/// Axis-aligned bounding box in 3-D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds3 {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds3 {
    /// Centre point of the box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Size along each axis.
    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }

    /// Largest of the three extents.
    pub fn max_extent(&self) -> f32 {
        self.extents().max_element()
    }
}

impl Default for Bounds3 {
    fn default() -> Self {
        Self {
            min: Vec3::ZERO,
            max: Vec3::ZERO,
        }
    }
}

/// Undirected edge between two vertices, stored as `(min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub a: u32,
    pub b: u32,
}

impl Edge {
    /// Build a normalised edge; `None` for a degenerate self-loop.
    pub fn new(a: u32, b: u32) -> Option<Self> {
        if a == b {
            return None;
        }
        Some(Self {
            a: a.min(b),
            b: a.max(b),
        })
    }

    /// Order-independent key: `(a, b)` and `(b, a)` fold to the same value.
    pub fn key(&self) -> u64 {
        ((self.a as u64) << 32) | self.b as u64
    }
}

/// Which connectivity the loader should build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TopologyKind {
    /// Deduplicated undirected edges, drawn as lines.
    #[default]
    #[value(name = "wire")]
    Edges,
    /// Fan-triangulated faces, drawn as filled triangles.
    #[value(name = "solid")]
    Triangles,
}

impl std::fmt::Display for TopologyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopologyKind::Edges => write!(f, "wire"),
            TopologyKind::Triangles => write!(f, "solid"),
        }
    }
}

/// Mesh connectivity.
#[derive(Debug, Clone, PartialEq)]
pub enum Topology {
    Edges(Vec<Edge>),
    Triangles(Vec<[u32; 3]>),
}

impl Topology {
    pub fn kind(&self) -> TopologyKind {
        match self {
            Topology::Edges(_) => TopologyKind::Edges,
            Topology::Triangles(_) => TopologyKind::Triangles,
        }
    }

    /// Number of edges or triangles.
    pub fn primitive_count(&self) -> usize {
        match self {
            Topology::Edges(e) => e.len(),
            Topology::Triangles(t) => t.len(),
        }
    }

    /// Vertices emitted per primitive (2 for lines, 3 for triangles).
    pub fn vertices_per_primitive(&self) -> usize {
        match self {
            Topology::Edges(_) => 2,
            Topology::Triangles(_) => 3,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.primitive_count() == 0
    }
}

/// Normalised mesh plus the per-frame scratch buffers the projector writes.
///
/// The scratch buffers are sized once by [`Mesh::new`] and never grow, so
/// projecting a frame does not allocate.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    topology: Topology,
    bounds: Bounds3,
    pub(crate) rotated: Vec<Vec3>,
    pub(crate) projected: Vec<Vec2>,
    pub(crate) depth_shade: Vec<f32>,
    pub(crate) batch: Vec<PrimVertex>,
}

impl Mesh {
    /// Wrap already-normalised geometry and allocate its scratch buffers.
    pub fn new(vertices: Vec<Vec3>, topology: Topology) -> Self {
        let bounds = coordinates::compute_bounds(&vertices);
        let n = vertices.len();
        let batch_len = topology.primitive_count() * topology.vertices_per_primitive();
        Self {
            rotated: vec![Vec3::ZERO; n],
            projected: vec![Vec2::ZERO; n],
            depth_shade: vec![1.0; n],
            batch: vec![PrimVertex::default(); batch_len],
            vertices,
            topology,
            bounds,
        }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn bounds(&self) -> Bounds3 {
        self.bounds
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Edge list, or `None` for a triangle mesh.
    pub fn edges(&self) -> Option<&[Edge]> {
        match &self.topology {
            Topology::Edges(e) => Some(e),
            Topology::Triangles(_) => None,
        }
    }

    /// Triangle list, or `None` for an edge mesh.
    pub fn triangles(&self) -> Option<&[[u32; 3]]> {
        match &self.topology {
            Topology::Triangles(t) => Some(t),
            Topology::Edges(_) => None,
        }
    }

    /// Whether the mesh has nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.topology.is_empty()
    }

    /// Length of the pre-sized output batch.
    pub fn batch_len(&self) -> usize {
        self.batch.len()
    }
}

use glam::{Vec2, Vec3};
use rayon::prelude::*;

use super::coordinates::MIN_EXTENT;
use super::{Bounds3, Mesh, Topology};
use crate::types::{Color, PrimVertex};

/// Focal constant of the perspective divide.
pub const FOCAL: f32 = 800.0;
/// How strongly screen-space scale feeds back into depth.
pub const DEPTH_COUPLING: f32 = 0.25;
/// Lower bound of the perspective denominator, as a fraction of [`FOCAL`].
const MIN_DENOMINATOR: f32 = 0.05;
/// Vertex count above which rotation runs on the rayon pool.
const PARALLEL_VERTICES: usize = 4096;

/// One frame's worth of projected geometry, ready for a single draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeshBatch<'a> {
    /// Consecutive vertex pairs.
    Lines(&'a [PrimVertex]),
    /// Consecutive vertex triples.
    Triangles(&'a [PrimVertex]),
}

impl<'a> MeshBatch<'a> {
    pub fn vertices(&self) -> &'a [PrimVertex] {
        match self {
            MeshBatch::Lines(v) | MeshBatch::Triangles(v) => *v,
        }
    }

    pub fn primitive_count(&self) -> usize {
        match self {
            MeshBatch::Lines(v) => v.len() / 2,
            MeshBatch::Triangles(v) => v.len() / 3,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices().is_empty()
    }
}

/// Parameters of the yaw + perspective projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YawProjection {
    pub center: Vec2,
    /// Largest on-screen footprint of the model, in pixels.
    pub target_px: f32,
    pub yaw_deg: f32,
    pub offset: Vec2,
    pub color: Color,
}

/// How the overlay is projected each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ProjectionKind {
    /// Spin about the vertical axis with perspective.
    #[default]
    #[value(name = "yaw")]
    Yaw,
    /// Static orthographic view of the dominant plane.
    #[value(name = "autofit")]
    AutoFit,
}

impl std::fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectionKind::Yaw => write!(f, "yaw"),
            ProjectionKind::AutoFit => write!(f, "autofit"),
        }
    }
}

/// Coordinate plane used by the auto-fit projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    XY,
    XZ,
    YZ,
}

/// Pixel scale that keeps the model inside `target_px` at every yaw angle.
///
/// A rotation about Y sweeps X and Z through each other, so the widest
/// possible silhouette is `max(sqrt(ex² + ez²), ey)`.
pub fn yaw_scale(bounds: &Bounds3, target_px: f32) -> f32 {
    let e = bounds.extents();
    let side = (e.x * e.x + e.z * e.z).sqrt().max(e.y).max(MIN_EXTENT);
    target_px / side
}

/// Plane with the largest bounding-box area. Ties prefer XZ, then YZ.
pub fn dominant_plane(bounds: &Bounds3) -> Plane {
    let e = bounds.extents();
    let xy = e.x * e.y;
    let xz = e.x * e.z;
    let yz = e.y * e.z;
    if xz >= xy && xz >= yz {
        Plane::XZ
    } else if yz >= xy && yz >= xz {
        Plane::YZ
    } else {
        Plane::XY
    }
}

/// Rotate about the vertical axis, then project with a simple perspective divide.
pub fn project_yaw<'a>(mesh: &'a mut Mesh, params: &YawProjection) -> MeshBatch<'a> {
    let scale = yaw_scale(&mesh.bounds, params.target_px);
    let (sin, cos) = params.yaw_deg.to_radians().sin_cos();
    let origin = params.center + params.offset;

    let step = |v: &Vec3, rotated: &mut Vec3, screen: &mut Vec2, shade: &mut f32| {
        let r = Vec3::new(cos * v.x + sin * v.z, v.y, -sin * v.x + cos * v.z);
        let denominator = (FOCAL + r.z * scale * DEPTH_COUPLING).max(FOCAL * MIN_DENOMINATOR);
        let perspective = FOCAL / denominator;
        *rotated = r;
        *screen = origin + Vec2::new(r.x, r.y) * scale * perspective;
        // Nearer (negative z) vertices are drawn brighter
        *shade = (0.775 - 0.3 * r.z).clamp(0.55, 1.0);
    };

    let Mesh {
        vertices,
        rotated,
        projected,
        depth_shade,
        ..
    } = &mut *mesh;

    if vertices.len() >= PARALLEL_VERTICES {
        vertices
            .par_iter()
            .zip(rotated.par_iter_mut())
            .zip(projected.par_iter_mut())
            .zip(depth_shade.par_iter_mut())
            .for_each(|(((v, r), s), d)| step(v, r, s, d));
    } else {
        for (((v, r), s), d) in vertices
            .iter()
            .zip(rotated.iter_mut())
            .zip(projected.iter_mut())
            .zip(depth_shade.iter_mut())
        {
            step(v, r, s, d);
        }
    }

    fill_batch(mesh, params.color);
    mesh.batch_view()
}

/// Orthographic projection onto the dominant plane, scaled to `target_px`.
pub fn project_auto_fit<'a>(
    mesh: &'a mut Mesh,
    center: Vec2,
    target_px: f32,
    color: Color,
) -> MeshBatch<'a> {
    let bounds = mesh.bounds;
    let e = bounds.extents();
    let c = bounds.center();
    let plane = dominant_plane(&bounds);
    let (side_u, side_v) = match plane {
        Plane::XY => (e.x, e.y),
        Plane::XZ => (e.x, e.z),
        Plane::YZ => (e.y, e.z),
    };
    let scale = target_px / side_u.max(side_v).max(MIN_EXTENT);

    let Mesh {
        vertices,
        rotated,
        projected,
        depth_shade,
        ..
    } = &mut *mesh;

    for (((v, r), s), d) in vertices
        .iter()
        .zip(rotated.iter_mut())
        .zip(projected.iter_mut())
        .zip(depth_shade.iter_mut())
    {
        let local = *v - c;
        let uv = match plane {
            Plane::XY => Vec2::new(local.x, local.y),
            Plane::XZ => Vec2::new(local.x, local.z),
            Plane::YZ => Vec2::new(local.y, local.z),
        };
        *r = local;
        *s = center + uv * scale;
        *d = 1.0;
    }

    fill_batch(mesh, color);
    mesh.batch_view()
}

/// Expand projected points into the pre-sized primitive batch.
fn fill_batch(mesh: &mut Mesh, color: Color) {
    let Mesh {
        topology,
        projected,
        depth_shade,
        batch,
        ..
    } = mesh;
    let vertex = |i: u32| {
        let i = i as usize;
        PrimVertex::new(projected[i], color.scale_rgb(depth_shade[i]))
    };

    match topology {
        Topology::Edges(edges) => {
            for (out, edge) in batch.chunks_exact_mut(2).zip(edges.iter()) {
                out[0] = vertex(edge.a);
                out[1] = vertex(edge.b);
            }
        }
        Topology::Triangles(tris) => {
            for (out, tri) in batch.chunks_exact_mut(3).zip(tris.iter()) {
                out[0] = vertex(tri[0]);
                out[1] = vertex(tri[1]);
                out[2] = vertex(tri[2]);
            }
        }
    }
}

impl Mesh {
    /// The most recently projected batch.
    pub fn batch_view(&self) -> MeshBatch<'_> {
        match self.topology {
            Topology::Edges(_) => MeshBatch::Lines(&self.batch),
            Topology::Triangles(_) => MeshBatch::Triangles(&self.batch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Edge, LoadOptions, TopologyKind, parse_mesh};
    use approx::assert_abs_diff_eq;

    fn cube(kind: TopologyKind) -> Mesh {
        let src = "\
v -1 -1 -1
v 1 -1 -1
v 1 1 -1
v -1 1 -1
v -1 -1 1
v 1 -1 1
v 1 1 1
v -1 1 1
f 1 2 3 4
f 5 6 7 8
f 1 2 6 5
f 2 3 7 6
f 3 4 8 7
f 4 1 5 8
";
        let options = LoadOptions {
            kind,
            ..Default::default()
        };
        parse_mesh(&mut src.as_bytes(), &options).unwrap()
    }

    fn params(yaw_deg: f32) -> YawProjection {
        YawProjection {
            center: Vec2::new(400.0, 300.0),
            target_px: 200.0,
            yaw_deg,
            offset: Vec2::ZERO,
            color: Color::rgb(255, 255, 255),
        }
    }

    #[test]
    fn cube_wireframe_has_twelve_lines() {
        let mut mesh = cube(TopologyKind::Edges);
        let batch = project_yaw(&mut mesh, &params(30.0));
        assert!(matches!(batch, MeshBatch::Lines(_)));
        assert_eq!(batch.primitive_count(), 12);
        assert_eq!(batch.vertices().len(), 24);
    }

    #[test]
    fn solid_cube_has_twelve_triangles() {
        let mut mesh = cube(TopologyKind::Triangles);
        let batch = project_yaw(&mut mesh, &params(0.0));
        assert!(matches!(batch, MeshBatch::Triangles(_)));
        assert_eq!(batch.primitive_count(), 12);
    }

    #[test]
    fn yaw_scale_uses_rotational_silhouette() {
        let bounds = Bounds3 {
            min: Vec3::new(-0.5, -0.25, -0.5),
            max: Vec3::new(0.5, 0.25, 0.5),
        };
        assert_abs_diff_eq!(yaw_scale(&bounds, 100.0), 100.0 / 2f32.sqrt(), epsilon = 1e-4);

        let degenerate = Bounds3::default();
        assert!(yaw_scale(&degenerate, 100.0).is_finite());
    }

    #[test]
    fn footprint_stays_near_target_at_every_yaw() {
        let mut mesh = cube(TopologyKind::Edges);
        let p = params(0.0);
        for step in 0..36 {
            let mut p = p;
            p.yaw_deg = step as f32 * 10.0;
            let batch = project_yaw(&mut mesh, &p);
            for v in batch.vertices() {
                let d = v.pos() - p.center;
                // Perspective may enlarge near vertices slightly beyond the orthographic bound
                assert!(d.x.abs() <= p.target_px * 0.5 * 1.1, "x {}", d.x);
                assert!(d.y.abs() <= p.target_px * 0.5 * 1.1, "y {}", d.y);
            }
        }
    }

    #[test]
    fn offset_translates_every_vertex() {
        let mut mesh = cube(TopologyKind::Edges);
        let base: Vec<Vec2> = project_yaw(&mut mesh, &params(15.0))
            .vertices()
            .iter()
            .map(|v| v.pos())
            .collect();
        let mut shifted = params(15.0);
        shifted.offset = Vec2::new(30.0, -12.0);
        let moved = project_yaw(&mut mesh, &shifted);
        for (a, b) in base.iter().zip(moved.vertices()) {
            assert_abs_diff_eq!(b.pos().x - a.x, 30.0, epsilon = 1e-3);
            assert_abs_diff_eq!(b.pos().y - a.y, -12.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn nearer_vertices_are_brighter() {
        let verts = vec![Vec3::new(0.0, 0.0, -0.5), Vec3::new(0.0, 0.0, 0.5)];
        let mut mesh = Mesh::new(verts, Topology::Edges(vec![Edge::new(0, 1).unwrap()]));
        let batch = project_yaw(&mut mesh, &params(0.0));
        let near = batch.vertices()[0].color[0];
        let far = batch.vertices()[1].color[0];
        assert!(near > far);
    }

    #[test]
    fn dominant_plane_selection() {
        let flat_xz = Bounds3 {
            min: Vec3::new(-0.5, -0.01, -0.4),
            max: Vec3::new(0.5, 0.01, 0.4),
        };
        assert_eq!(dominant_plane(&flat_xz), Plane::XZ);

        let flat_xy = Bounds3 {
            min: Vec3::new(-0.5, -0.4, -0.01),
            max: Vec3::new(0.5, 0.4, 0.01),
        };
        assert_eq!(dominant_plane(&flat_xy), Plane::XY);

        let flat_yz = Bounds3 {
            min: Vec3::new(-0.01, -0.5, -0.4),
            max: Vec3::new(0.01, 0.5, 0.4),
        };
        assert_eq!(dominant_plane(&flat_yz), Plane::YZ);
    }

    #[test]
    fn auto_fit_spans_target() {
        let mut mesh = cube(TopologyKind::Triangles);
        let center = Vec2::new(100.0, 100.0);
        let batch = project_auto_fit(&mut mesh, center, 80.0, Color::MESH);
        let (mut lo, mut hi) = (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN));
        for v in batch.vertices() {
            lo = lo.min(v.pos());
            hi = hi.max(v.pos());
        }
        assert_abs_diff_eq!(hi.x - lo.x, 80.0, epsilon = 1e-3);
        assert_abs_diff_eq!((hi + lo).x * 0.5, center.x, epsilon = 1e-3);
    }
}

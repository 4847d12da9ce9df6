use criterion::{Criterion, criterion_group, criterion_main};
use glam::{Vec2, Vec3};
use matrix_fx::mesh::coordinates::normalize;
use matrix_fx::mesh::{Edge, Mesh, Topology, YawProjection, project_auto_fit, project_yaw};
use matrix_fx::types::Color;

/// Height-field grid with `(n + 1)^2` vertices, as edges or triangles.
fn make_grid(n: usize, triangles: bool) -> Mesh {
    let verts = n + 1;
    let mut vertices = Vec::with_capacity(verts * verts);
    for z in 0..verts {
        for x in 0..verts {
            let fx = x as f32 / n as f32;
            let fz = z as f32 / n as f32;
            vertices.push(Vec3::new(fx, 0.1 * (fx * 9.0).sin() * (fz * 7.0).cos(), fz));
        }
    }
    normalize(&mut vertices, true);

    let v = |x: usize, z: usize| (z * verts + x) as u32;
    let topology = if triangles {
        let mut tris = Vec::with_capacity(n * n * 2);
        for z in 0..n {
            for x in 0..n {
                tris.push([v(x, z), v(x + 1, z), v(x + 1, z + 1)]);
                tris.push([v(x, z), v(x + 1, z + 1), v(x, z + 1)]);
            }
        }
        Topology::Triangles(tris)
    } else {
        let mut edges = Vec::with_capacity(2 * n * verts);
        for z in 0..verts {
            for x in 0..verts {
                if x < n {
                    edges.extend(Edge::new(v(x, z), v(x + 1, z)));
                }
                if z < n {
                    edges.extend(Edge::new(v(x, z), v(x, z + 1)));
                }
            }
        }
        Topology::Edges(edges)
    };
    Mesh::new(vertices, topology)
}

fn params(yaw_deg: f32) -> YawProjection {
    YawProjection {
        center: Vec2::new(960.0, 540.0),
        target_px: 486.0,
        yaw_deg,
        offset: Vec2::ZERO,
        color: Color::MESH,
    }
}

fn bench_yaw_wire(c: &mut Criterion) {
    // ~40K vertices: above the parallel threshold
    let mut mesh = make_grid(200, false);
    let mut yaw = 0.0;
    c.bench_function("project_yaw_wire_40k", |b| {
        b.iter(|| {
            yaw = (yaw + 1.0) % 360.0;
            project_yaw(&mut mesh, &params(yaw)).primitive_count()
        });
    });
}

fn bench_yaw_small(c: &mut Criterion) {
    // ~2.5K vertices: sequential path
    let mut mesh = make_grid(49, false);
    c.bench_function("project_yaw_wire_2k", |b| {
        b.iter(|| project_yaw(&mut mesh, &params(33.0)).primitive_count());
    });
}

fn bench_auto_fit_solid(c: &mut Criterion) {
    let mut mesh = make_grid(200, true);
    c.bench_function("project_auto_fit_solid_80k_tris", |b| {
        b.iter(|| {
            project_auto_fit(&mut mesh, Vec2::new(960.0, 540.0), 486.0, Color::MESH)
                .primitive_count()
        });
    });
}

criterion_group!(benches, bench_yaw_wire, bench_yaw_small, bench_auto_fit_solid);
criterion_main!(benches);

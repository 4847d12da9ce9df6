use glam::Vec3;

use super::Bounds3;

/// Smallest extent used as a divisor when scaling; keeps degenerate meshes finite.
pub const MIN_EXTENT: f32 = 1e-6;

/// Scan all vertices and return the axis-aligned bounding box.
pub fn compute_bounds(vertices: &[Vec3]) -> Bounds3 {
    let Some(first) = vertices.first() else {
        return Bounds3::default();
    };

    let (min, max) = vertices
        .iter()
        .fold((*first, *first), |(min, max), v| (min.min(*v), max.max(*v)));

    Bounds3 { min, max }
}

/// Translate so the bounding-box centre sits at the origin; returns the offset removed.
pub fn center_on_bounds(vertices: &mut [Vec3]) -> Vec3 {
    let center = compute_bounds(vertices).center();
    for v in vertices.iter_mut() {
        *v -= center;
    }
    center
}

/// Uniformly scale so the largest extent becomes 1.0; returns the factor applied.
pub fn scale_to_unit(vertices: &mut [Vec3]) -> f32 {
    let extent = compute_bounds(vertices).max_extent().max(MIN_EXTENT);
    let factor = 1.0 / extent;
    for v in vertices.iter_mut() {
        *v *= factor;
    }
    factor
}

/// Negate Y and Z (a half turn about X) so source "up" reads as screen "up".
///
/// `(x, y, z)` → `(x, -y, -z)`
pub fn flip_yz(vertices: &mut [Vec3]) {
    for v in vertices.iter_mut() {
        v.y = -v.y;
        v.z = -v.z;
    }
}

/// Center, scale to unit size and optionally flip. Returns the source bounds.
pub fn normalize(vertices: &mut [Vec3], flip: bool) -> Bounds3 {
    let source = compute_bounds(vertices);
    center_on_bounds(vertices);
    scale_to_unit(vertices);
    if flip {
        flip_yz(vertices);
    }
    source
}

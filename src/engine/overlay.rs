use glam::Vec2;
use rand::Rng;

use crate::control::ModelControl;
use crate::mesh::{Mesh, MeshBatch, ProjectionKind, YawProjection, project_auto_fit, project_yaw};
use crate::types::{Color, Viewport};

/// Share of the shorter viewport side the model may cover.
pub const TARGET_FRACTION: f32 = 0.45;

/// A loaded mesh plus the automaton that moves it.
#[derive(Debug, Clone)]
pub struct MeshOverlay {
    mesh: Mesh,
    control: ModelControl,
    projection: ProjectionKind,
    color: Color,
}

impl MeshOverlay {
    pub fn new<R: Rng + ?Sized>(mesh: Mesh, projection: ProjectionKind, rng: &mut R) -> Self {
        Self {
            mesh,
            control: ModelControl::new(rng),
            projection,
            color: Color::MESH,
        }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn control(&self) -> &ModelControl {
        &self.control
    }

    pub fn projection(&self) -> ProjectionKind {
        self.projection
    }

    pub fn target_px(viewport: Viewport) -> f32 {
        viewport.min_side() * TARGET_FRACTION
    }

    /// Half-size of the box the drifting model may wander in.
    pub fn drift_bounds(viewport: Viewport) -> Vec2 {
        ((viewport.size() - Vec2::splat(Self::target_px(viewport))) * 0.5).max(Vec2::ZERO)
    }

    /// Advance the automaton. The auto-fit view is static and skips it.
    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, viewport: Viewport, rng: &mut R) {
        if self.projection == ProjectionKind::Yaw {
            self.control.update(dt, Self::drift_bounds(viewport), rng);
        }
    }

    /// Project into the mesh's scratch buffers and return the batch.
    pub fn project(&mut self, viewport: Viewport) -> MeshBatch<'_> {
        let target_px = Self::target_px(viewport);
        match self.projection {
            ProjectionKind::Yaw => {
                let params = YawProjection {
                    center: viewport.center(),
                    target_px,
                    yaw_deg: self.control.yaw(),
                    offset: self.control.offset(),
                    color: self.color,
                };
                project_yaw(&mut self.mesh, &params)
            }
            ProjectionKind::AutoFit => {
                project_auto_fit(&mut self.mesh, viewport.center(), target_px, self.color)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{LoadOptions, parse_mesh};
    use crate::rng::session_rng;

    fn overlay(projection: ProjectionKind) -> MeshOverlay {
        let src = "v 0 0 0\nv 2 0 0\nv 0 2 0\nv 0 0 2\nf 1 2 3\nf 1 3 4\n";
        let mesh = parse_mesh(&mut src.as_bytes(), &LoadOptions::default()).unwrap();
        MeshOverlay::new(mesh, projection, &mut session_rng(Some(1)))
    }

    #[test]
    fn drift_bounds_keep_model_on_screen() {
        let vp = Viewport::new(800, 600);
        let b = MeshOverlay::drift_bounds(vp);
        // target 270 px
        assert_eq!(b, Vec2::new(265.0, 165.0));
    }

    #[test]
    fn projected_points_stay_near_target_box() {
        let vp = Viewport::new(800, 600);
        let mut o = overlay(ProjectionKind::Yaw);
        let batch = o.project(vp);
        assert_eq!(batch.primitive_count(), 5);
        let half = MeshOverlay::target_px(vp);
        for v in batch.vertices() {
            assert!((v.pos() - vp.center()).abs().max_element() <= half);
        }
    }

    #[test]
    fn autofit_ignores_automaton() {
        let vp = Viewport::new(800, 600);
        let mut rng = session_rng(Some(2));
        let mut o = overlay(ProjectionKind::AutoFit);
        for _ in 0..600 {
            o.update(0.05, vp, &mut rng);
        }
        assert_eq!(o.control().transitions(), 0);
    }
}

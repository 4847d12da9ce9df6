//! Model control automaton.
//!
//! Alternates the mesh overlay between spinning in place and drifting across
//! the screen, returning to the centre before spinning again.

use std::f32::consts::FRAC_1_SQRT_2;

use glam::Vec2;
use rand::Rng;
use tracing::debug;

use crate::rng::signed_range;

/// Offset decay rate while rotating, 1/s.
const CENTER_DECAY: f32 = 3.0;
/// Speed of the return leg, px/s.
const RETURN_SPEED: f32 = 220.0;
/// Per-axis distance under which the return leg snaps to the origin.
const RETURN_EPS: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    RotateY,
    Drift,
}

impl std::fmt::Display for ControlMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlMode::RotateY => write!(f, "rotate-y"),
            ControlMode::Drift => write!(f, "drift"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelControl {
    mode: ControlMode,
    /// Degrees in `[0, 360)`.
    yaw: f32,
    yaw_velocity: f32,
    offset: Vec2,
    drift_velocity: Vec2,
    timer: f32,
    returning: bool,
    transitions: u64,
}

impl ModelControl {
    /// Start rotating with a random yaw velocity and countdown.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::rotating(signed_range(rng, 25.0, 70.0), rng.gen_range(2.5..=5.0))
    }

    /// Start rotating with explicit parameters.
    pub fn rotating(yaw_velocity: f32, timer: f32) -> Self {
        Self {
            mode: ControlMode::RotateY,
            yaw: 0.0,
            yaw_velocity,
            offset: Vec2::ZERO,
            drift_velocity: Vec2::ZERO,
            timer,
            returning: false,
            transitions: 0,
        }
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn yaw_velocity(&self) -> f32 {
        self.yaw_velocity
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn drift_velocity(&self) -> Vec2 {
        self.drift_velocity
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn is_returning(&self) -> bool {
        self.returning
    }

    /// Number of mode changes so far.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Advance by `dt` seconds. `bounds` is the half-size of the box the
    /// offset may drift in.
    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, bounds: Vec2, rng: &mut R) {
        match self.mode {
            ControlMode::RotateY => {
                self.yaw = (self.yaw + self.yaw_velocity * dt).rem_euclid(360.0);
                if self.yaw >= 360.0 {
                    self.yaw = 0.0;
                }
                self.offset *= (-CENTER_DECAY * dt).exp();
                self.timer -= dt;
                if self.timer <= 0.0 {
                    self.enter_drift(rng);
                }
            }
            ControlMode::Drift if self.returning => {
                let step = RETURN_SPEED * dt;
                let distance = self.offset.length();
                if distance <= step {
                    self.offset = Vec2::ZERO;
                } else {
                    self.offset -= self.offset / distance * step;
                }
                if self.offset.x.abs() < RETURN_EPS && self.offset.y.abs() < RETURN_EPS {
                    self.enter_rotate(rng);
                }
            }
            ControlMode::Drift => {
                self.offset += self.drift_velocity * dt;
                reflect(&mut self.offset.x, &mut self.drift_velocity.x, bounds.x.max(0.0));
                reflect(&mut self.offset.y, &mut self.drift_velocity.y, bounds.y.max(0.0));
                self.timer -= dt;
                if self.timer <= 0.0 {
                    self.returning = true;
                    debug!(offset = ?self.offset, "Model returning to centre");
                }
            }
        }
    }

    fn enter_drift<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let speed = rng.gen_range(60.0..=160.0);
        let sx = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let sy = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        self.drift_velocity = Vec2::new(sx, sy) * FRAC_1_SQRT_2 * speed;
        self.timer = rng.gen_range(2.0..=4.0);
        self.returning = false;
        self.mode = ControlMode::Drift;
        self.transitions += 1;
        debug!(speed, timer = self.timer, "Model drifting");
    }

    fn enter_rotate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.offset = Vec2::ZERO;
        self.drift_velocity = Vec2::ZERO;
        self.yaw_velocity = signed_range(rng, 25.0, 70.0);
        self.timer = rng.gen_range(2.5..=5.0);
        self.returning = false;
        self.mode = ControlMode::RotateY;
        self.transitions += 1;
        debug!(yaw_velocity = self.yaw_velocity, timer = self.timer, "Model rotating");
    }
}

fn reflect(offset: &mut f32, velocity: &mut f32, bound: f32) {
    if *offset > bound {
        *offset = bound;
        *velocity = -velocity.abs();
    } else if *offset < -bound {
        *offset = -bound;
        *velocity = velocity.abs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::session_rng;
    use approx::assert_abs_diff_eq;

    const BOUNDS: Vec2 = Vec2::new(200.0, 150.0);

    #[test]
    fn rotates_until_timer_expires() {
        let mut rng = session_rng(Some(1));
        let mut c = ModelControl::rotating(40.0, 1.0);
        c.update(0.5, BOUNDS, &mut rng);
        assert_eq!(c.mode(), ControlMode::RotateY);
        assert_abs_diff_eq!(c.yaw(), 20.0, epsilon = 1e-5);
        assert_eq!(c.transitions(), 0);
    }

    #[test]
    fn yaw_wraps_into_full_turn() {
        let mut rng = session_rng(Some(1));
        let mut c = ModelControl::rotating(-70.0, 100.0);
        for _ in 0..50 {
            c.update(0.1, BOUNDS, &mut rng);
            assert!((0.0..360.0).contains(&c.yaw()));
        }
    }

    #[test]
    fn transitions_to_drift_exactly_once_after_timer() {
        for seed in 0..20 {
            let mut rng = session_rng(Some(seed));
            let mut c = ModelControl::rotating(30.0, 3.0);
            for _ in 0..12 {
                c.update(0.25, BOUNDS, &mut rng);
            }
            assert_eq!(c.mode(), ControlMode::Drift);
            assert_eq!(c.transitions(), 1);
            let speed = c.drift_velocity().length();
            assert!((60.0 - 1e-3..=160.0 + 1e-3).contains(&speed), "speed {speed}");
            assert!((2.0..=4.0).contains(&c.timer()));
            // Diagonal
            assert_abs_diff_eq!(
                c.drift_velocity().x.abs(),
                c.drift_velocity().y.abs(),
                epsilon = 1e-3
            );
        }
    }

    #[test]
    fn drift_stays_inside_bounds() {
        let mut rng = session_rng(Some(5));
        let mut c = ModelControl::rotating(30.0, 0.01);
        c.update(0.02, BOUNDS, &mut rng);
        assert_eq!(c.mode(), ControlMode::Drift);
        for _ in 0..40 {
            c.update(0.05, BOUNDS, &mut rng);
            assert!(c.offset().x.abs() <= BOUNDS.x);
            assert!(c.offset().y.abs() <= BOUNDS.y);
        }
    }

    #[test]
    fn returns_to_origin_and_rotates_again() {
        let mut rng = session_rng(Some(9));
        let mut c = ModelControl::rotating(30.0, 0.01);
        c.update(0.02, BOUNDS, &mut rng);
        let mut saw_returning = false;
        for _ in 0..2000 {
            c.update(1.0 / 60.0, BOUNDS, &mut rng);
            saw_returning |= c.is_returning();
            if c.mode() == ControlMode::RotateY {
                break;
            }
        }
        assert!(saw_returning);
        assert_eq!(c.mode(), ControlMode::RotateY);
        assert_eq!(c.offset(), Vec2::ZERO);
        assert_eq!(c.transitions(), 2);
        assert!((25.0..=70.0).contains(&c.yaw_velocity().abs()));
        assert!((2.5..=5.0).contains(&c.timer()));
    }

    #[test]
    fn return_leg_never_overshoots() {
        let mut rng = session_rng(Some(2));
        let mut c = ModelControl::rotating(30.0, 0.01);
        c.update(0.02, BOUNDS, &mut rng);
        // Drift for the whole timer, then start returning
        while !c.is_returning() {
            c.update(0.1, BOUNDS, &mut rng);
        }
        let start = c.offset();
        let mut last = start.length();
        while c.mode() == ControlMode::Drift {
            c.update(0.1, BOUNDS, &mut rng);
            let d = c.offset().length();
            assert!(d <= last + 1e-4);
            if c.mode() == ControlMode::Drift {
                // Same direction as where it started
                assert!(c.offset().dot(start) >= 0.0);
            }
            last = d;
        }
        assert_eq!(c.offset(), Vec2::ZERO);
    }

    #[test]
    fn zero_bounds_keep_model_centred() {
        let mut rng = session_rng(Some(3));
        let mut c = ModelControl::rotating(30.0, 0.01);
        c.update(0.02, Vec2::ZERO, &mut rng);
        for _ in 0..10 {
            c.update(0.1, Vec2::ZERO, &mut rng);
            assert_eq!(c.offset(), Vec2::ZERO);
        }
    }

    #[test]
    fn rotation_decays_residual_offset() {
        let mut rng = session_rng(Some(4));
        let mut c = ModelControl::rotating(30.0, 10.0);
        c.offset = Vec2::new(100.0, 0.0);
        c.update(1.0, BOUNDS, &mut rng);
        assert_abs_diff_eq!(c.offset().x, 100.0 * (-3.0f32).exp(), epsilon = 1e-3);
    }
}

use glam::Vec2;

/// Peak acceleration of the flow field, px/s².
pub const FLOW_STRENGTH: f32 = 12.0;

/// Smooth, time-varying pseudo flow field sampled per entity.
///
/// `seed` decorrelates entities so they do not all drift in lockstep.
#[inline]
pub fn flow_field(t: f32, seed: f32) -> Vec2 {
    Vec2::new(
        FLOW_STRENGTH * (0.08 * t + 0.71 * seed).sin(),
        FLOW_STRENGTH * (0.11 * t + 1.31 * seed).cos(),
    )
}

/// Advance `value` by `velocity * dt` and reflect off `[lo, hi]`.
///
/// On contact the value is clamped and the velocity is pointed back inside,
/// so it flips at most once per contact and never oscillates at a bound.
/// Returns whether a bound was hit.
#[inline]
pub fn ping_pong(value: &mut f32, velocity: &mut f32, dt: f32, lo: f32, hi: f32) -> bool {
    *value += *velocity * dt;
    if *value < lo {
        *value = lo;
        *velocity = velocity.abs();
        true
    } else if *value > hi {
        *value = hi;
        *velocity = -velocity.abs();
        true
    } else {
        false
    }
}

/// RGBA colour with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color(pub [u8; 4]);

impl Color {
    /// Classic phosphor green used by rain tails and bounce glyphs.
    pub const MATRIX_GREEN: Self = Self([0, 255, 70, 255]);
    /// Default mesh overlay colour.
    pub const MESH: Self = Self([220, 220, 220, 235]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    pub fn r(&self) -> u8 {
        self.0[0]
    }

    pub fn g(&self) -> u8 {
        self.0[1]
    }

    pub fn b(&self) -> u8 {
        self.0[2]
    }

    pub fn a(&self) -> u8 {
        self.0[3]
    }

    /// Same RGB with a new alpha.
    pub fn with_alpha(self, a: u8) -> Self {
        Self([self.0[0], self.0[1], self.0[2], a])
    }

    /// Multiply the RGB channels by `factor` (clamped to `[0, 1]`), alpha untouched.
    pub fn scale_rgb(self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        let c = |v: u8| (v as f32 * f).round() as u8;
        Self([c(self.0[0]), c(self.0[1]), c(self.0[2]), self.0[3]])
    }

    /// Channel-wise linear interpolation; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mut out = [0u8; 4];
        for (i, o) in out.iter_mut().enumerate() {
            let a = self.0[i] as f32;
            let b = other.0[i] as f32;
            *o = (a + (b - a) * t).round() as u8;
        }
        Self(out)
    }

    pub fn to_array(&self) -> [u8; 4] {
        self.0
    }
}

/// Piecewise-linear gradient over four evenly spaced stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient4 {
    pub stops: [Color; 4],
}

impl Gradient4 {
    /// Violet → magenta → cyan → green palette used by the nebula field.
    pub const NEBULA: Self = Self {
        stops: [
            Color::rgb(70, 30, 160),
            Color::rgb(210, 60, 170),
            Color::rgb(60, 200, 230),
            Color::rgb(90, 255, 140),
        ],
    };

    pub const fn new(stops: [Color; 4]) -> Self {
        Self { stops }
    }

    /// Sample at `t` in `[0, 1]`; values outside are clamped, NaN maps to the first stop.
    pub fn sample(&self, t: f32) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let scaled = t * 3.0;
        let segment = (scaled.floor() as usize).min(2);
        let local = scaled - segment as f32;
        self.stops[segment].lerp(self.stops[segment + 1], local)
    }

    /// Sample with a cyclic phase: any real `phase` is folded with a triangle
    /// wave so the colour sweeps 0 → 1 → 0 without a jump at the wrap.
    pub fn sample_cyclic(&self, phase: f32) -> Color {
        let p = phase.rem_euclid(1.0);
        self.sample(1.0 - (2.0 * p - 1.0).abs())
    }
}

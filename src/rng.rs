//! Session randomness and deterministic per-glyph hashing.
//!
//! Every engine owns one seeded [`StdRng`]; nothing reads a global or
//! clock-seeded generator. Per-frame effects that run inside parallel passes
//! (rain flicker) use [`hash3`] instead so their outcome does not depend on
//! worker scheduling.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Build the session generator: fixed seed when given, OS entropy otherwise.
pub fn session_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// SplitMix64 finaliser.
#[inline]
pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

/// Mix a seed with three coordinates into a well-distributed 64-bit value.
#[inline]
pub fn hash3(seed: u64, a: u64, b: u64, c: u64) -> u64 {
    let h = splitmix64(seed ^ a.wrapping_mul(0xA24B_AED4_963E_E407));
    let h = splitmix64(h ^ b.wrapping_mul(0x9FB2_1C65_1E98_DF25));
    splitmix64(h ^ c)
}

/// Uniform sample from `[lo, hi]` with a random sign.
pub fn signed_range<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    let magnitude = rng.gen_range(lo..=hi);
    if rng.gen_bool(0.5) { magnitude } else { -magnitude }
}

//! Source of uniform randoms for `rand`.

use crate::errors::host_error;
use crate::EvalResult;

pub enum RandomSource {
    /// Fresh OS entropy per draw.
    Os,
    /// SplitMix64 stream, reproducible from its seed.
    Seeded(u64),
}

impl RandomSource {
    pub fn from_entropy() -> Self {
        RandomSource::Os
    }

    pub fn seeded(seed: u64) -> Self {
        RandomSource::Seeded(seed)
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> EvalResult<f64> {
        let bits = match self {
            RandomSource::Os => {
                getrandom::u64().map_err(|err| host_error(format!("entropy source: {err}")))?
            }
            RandomSource::Seeded(state) => splitmix64(state),
        };
        Ok(unit_interval(bits))
    }
}

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Top 53 bits as a fraction of 2^53.
#[expect(
    clippy::cast_precision_loss,
    reason = "a 53-bit integer is exact in f64"
)]
fn unit_interval(bits: u64) -> f64 {
    (bits >> 11) as f64 / (1u64 << 53) as f64
}

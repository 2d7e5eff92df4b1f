use crate::constants::WORD_BITS;
use crate::error::MathError;
use log::trace;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::RngCore;

/// Assembles exactly `bits` random bits from 64-bit words, most significant
/// chunk first. The final chunk is masked down to the remaining bit count.
pub fn random_bits<R: RngCore + ?Sized>(rng: &mut R, bits: usize) -> BigUint {
    let mut value = BigUint::zero();
    let mut produced = 0;
    while produced < bits {
        let take = WORD_BITS.min(bits - produced);
        let mut chunk = rng.next_u64();
        if take < WORD_BITS {
            chunk &= (1u64 << take) - 1;
        }
        value <<= take;
        value |= BigUint::from(chunk);
        produced += take;
    }
    value
}

/// 閉区間 [min, max] から一様乱数を棄却サンプリングで取り出す
pub fn sample_range<R: RngCore + ?Sized>(
    rng: &mut R,
    min: &BigUint,
    max: &BigUint,
) -> Result<BigUint, MathError> {
    if min > max {
        return Err(MathError::InvalidBounds);
    }
    let range = max - min + BigUint::one();
    let bits = range.bits() as usize;
    let mut rejected = 0u32;
    loop {
        let candidate = random_bits(rng, bits);
        if candidate < range {
            if rejected > 0 {
                trace!("sample_range: {} candidates rejected", rejected);
            }
            return Ok(min + candidate);
        }
        rejected += 1;
    }
}

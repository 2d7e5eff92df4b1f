use crate::arith::mod_pow;
use crate::config::GenerationConfig;
use crate::constants::SMALL_PRIMES;
use crate::error::MathError;
use crate::sampling::{random_bits, sample_range};
use log::{debug, trace};
use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};
use rand::RngCore;

/// Miller-Rabin 確率的素数判定
///
/// Small inputs are settled by trial division against [`SMALL_PRIMES`]; the
/// rest run `rounds` Miller-Rabin rounds with witnesses drawn uniformly from
/// `[2, n - 2]`. A composite survives with probability at most `4^-rounds`.
pub fn is_probable_prime<R: RngCore + ?Sized>(n: &BigUint, rng: &mut R, rounds: u32) -> bool {
    let two = BigUint::from(2u32);
    if n < &two {
        return false;
    }
    for &p in SMALL_PRIMES.iter() {
        if n.to_u32() == Some(p) {
            return true;
        }
        if (n % p).is_zero() {
            return false;
        }
    }

    // n - 1 = d * 2^s (d は奇数)
    let n_minus_one = n - BigUint::one();
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    let upper = n - &two;
    for round in 0..rounds {
        // n >= 37 なので [2, n-2] は空にならない
        let a = match sample_range(rng, &two, &upper) {
            Ok(a) => a,
            Err(_) => return false,
        };
        let mut x = mod_pow(&a, &d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        let mut witnessed = true;
        for _ in 1..s {
            x = mod_pow(&x, &two, n);
            if x == n_minus_one {
                witnessed = false;
                break;
            }
        }
        if witnessed {
            trace!("is_probable_prime: composite witness found in round {}", round);
            return false;
        }
    }
    true
}

/// Generates a random probable prime of exactly `bits` bits.
pub fn generate_prime<R: RngCore + ?Sized>(rng: &mut R, bits: usize) -> Result<BigUint, MathError> {
    generate_prime_with(rng, bits, &GenerationConfig::default())
}

/// 指定ビット長の素数を生成 (反復回数と試行上限は config に従う)
pub fn generate_prime_with<R: RngCore + ?Sized>(
    rng: &mut R,
    bits: usize,
    config: &GenerationConfig,
) -> Result<BigUint, MathError> {
    if bits < 2 {
        return Err(MathError::BitsTooSmall(bits));
    }
    config.check_rounds()?;
    let top = BigUint::one() << (bits - 1);
    let mut attempts = config.attempts("prime generation");
    loop {
        attempts.next()?;
        let mut candidate = random_bits(rng, bits);
        // 最上位ビットでビット長を固定し、最下位ビットで奇数にする
        candidate |= &top;
        candidate |= BigUint::one();
        if is_probable_prime(&candidate, rng, config.rounds) {
            debug!(
                "generate_prime: {}-bit prime found after {} candidates",
                bits,
                attempts.count()
            );
            return Ok(candidate);
        }
    }
}

//! Domain parameters `(p, q, a)` shared by a key pair.

use crate::arith::mod_pow;
use crate::config::GenerationConfig;
use crate::error::MathError;
use crate::prime::{generate_prime_with, is_probable_prime};
use crate::sampling::sample_range;
use log::{debug, info};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::RngCore;

/// GOST 94 ドメインパラメータ
///
/// `p` and `q` are prime, `q` divides `p - 1`, and `a` generates the subgroup
/// of order `q` in the multiplicative group modulo `p`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainParams {
    // 法 (素数)
    pub p: BigUint,
    // 部分群の位数 (p - 1 の素因数)
    pub q: BigUint,
    // 位数 q の生成元
    pub a: BigUint,
}

impl DomainParams {
    /// Re-checks every invariant of the triple. Primality uses `rounds`
    /// Miller-Rabin rounds drawn from `rng`.
    pub fn validate<R: RngCore + ?Sized>(&self, rng: &mut R, rounds: u32) -> Result<(), MathError> {
        if rounds == 0 {
            return Err(MathError::InvalidRounds);
        }
        if self.q <= BigUint::one() || self.q >= self.p {
            return Err(MathError::InvalidParams("q must satisfy 1 < q < p"));
        }
        if !is_probable_prime(&self.q, rng, rounds) {
            return Err(MathError::InvalidParams("q is not prime"));
        }
        if !is_probable_prime(&self.p, rng, rounds) {
            return Err(MathError::InvalidParams("p is not prime"));
        }
        if !(&self.p % &self.q).is_one() {
            return Err(MathError::InvalidParams("q does not divide p - 1"));
        }
        if self.a.is_zero() || self.a.is_one() || self.a >= self.p {
            return Err(MathError::InvalidParams("a must satisfy 1 < a < p"));
        }
        if !mod_pow(&self.a, &self.q, &self.p).is_one() {
            return Err(MathError::InvalidParams("a does not have order q"));
        }
        Ok(())
    }
}

/// Generates parameters with a `p_bits`-bit `p` and a `q_bits`-bit `q`.
pub fn generate_params<R: RngCore + ?Sized>(
    rng: &mut R,
    p_bits: usize,
    q_bits: usize,
) -> Result<DomainParams, MathError> {
    let config = GenerationConfig::default().with_bits(p_bits, q_bits);
    generate_params_with(rng, &config)
}

/// ドメインパラメータ生成
pub fn generate_params_with<R: RngCore + ?Sized>(
    rng: &mut R,
    config: &GenerationConfig,
) -> Result<DomainParams, MathError> {
    config.check()?;
    let (p_bits, q_bits) = (config.p_bits, config.q_bits);
    info!("ドメインパラメータ生成開始: p_bits = {}, q_bits = {}", p_bits, q_bits);

    let q = generate_prime_with(rng, q_bits, config)?;
    debug!("generate_params: q = {:x}", q);

    // p = k * q + 1 がちょうど p_bits ビットの素数になるまで k を引き直す
    let k_min = BigUint::from(2u32);
    let k_max = BigUint::one() << (p_bits - q_bits);
    let mut attempts = config.attempts("modulus search");
    let p = loop {
        attempts.next()?;
        let k = sample_range(rng, &k_min, &k_max)?;
        let candidate = &k * &q + BigUint::one();
        if candidate.bits() as usize != p_bits {
            continue;
        }
        if is_probable_prime(&candidate, rng, config.rounds) {
            break candidate;
        }
    };
    debug!(
        "generate_params: p = {:x} ({} candidates)",
        p,
        attempts.count()
    );

    // a = g^((p-1)/q) mod p, a != 1
    let exponent = (&p - BigUint::one()) / &q;
    let g_min = BigUint::from(2u32);
    let g_max = &p - BigUint::from(2u32);
    let mut attempts = config.attempts("generator search");
    let a = loop {
        attempts.next()?;
        let g = sample_range(rng, &g_min, &g_max)?;
        let a = mod_pow(&g, &exponent, &p);
        if !a.is_one() {
            break a;
        }
    };
    debug!("generate_params: a = {:x}", a);

    info!(
        "ドメインパラメータ生成完了: p bits = {}, q bits = {}",
        p.bits(),
        q.bits()
    );
    Ok(DomainParams { p, q, a })
}

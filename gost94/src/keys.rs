use crate::arith::mod_pow;
use crate::config::GenerationConfig;
use crate::error::MathError;
use crate::params::{generate_params_with, DomainParams};
use crate::sampling::sample_range;
use log::{debug, info};
use num_bigint::BigUint;
use num_traits::One;
use rand::RngCore;
use std::fmt;

// GOST 94 秘密鍵
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    pub params: DomainParams,
    // 秘密指数 (1 <= x <= q - 1)
    pub x: BigUint,
    // 公開値 y = a^x mod p
    pub y: BigUint,
}

// GOST 94 公開鍵
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    pub params: DomainParams,
    pub y: BigUint,
}

impl PrivateKey {
    /// Builds a key from a secret exponent, deriving `y = a^x mod p`.
    pub fn from_secret(params: DomainParams, x: BigUint) -> Self {
        let y = mod_pow(&params.a, &x, &params.p);
        Self { params, x, y }
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            params: self.params.clone(),
            y: self.y.clone(),
        }
    }

    /// `1 <= x < q` かつ `y == a^x mod p` であることを確認
    pub fn check_consistency(&self) -> Result<(), MathError> {
        if self.x < BigUint::one() || self.x >= self.params.q || self.params.p <= BigUint::one() {
            return Err(MathError::InconsistentKey);
        }
        if mod_pow(&self.params.a, &self.x, &self.params.p) != self.y {
            return Err(MathError::InconsistentKey);
        }
        Ok(())
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("params", &self.params)
            .field("x", &"<redacted>")
            .field("y", &self.y)
            .finish()
    }
}

impl From<&PrivateKey> for PublicKey {
    fn from(key: &PrivateKey) -> Self {
        key.public_key()
    }
}

/// Generates fresh domain parameters of the default size and a key pair on them.
pub fn generate_private_key<R: RngCore + ?Sized>(rng: &mut R) -> Result<PrivateKey, MathError> {
    generate_private_key_with(rng, &GenerationConfig::default())
}

/// 鍵ペア生成
pub fn generate_private_key_with<R: RngCore + ?Sized>(
    rng: &mut R,
    config: &GenerationConfig,
) -> Result<PrivateKey, MathError> {
    info!(
        "鍵ペア生成開始: p_bits = {}, q_bits = {}",
        config.p_bits, config.q_bits
    );
    let params = generate_params_with(rng, config)?;
    let key = generate_key_for_params(rng, params)?;
    info!("鍵ペア生成完了: y bits = {}", key.y.bits());
    Ok(key)
}

/// Draws a new secret exponent on existing parameters.
pub fn generate_key_for_params<R: RngCore + ?Sized>(
    rng: &mut R,
    params: DomainParams,
) -> Result<PrivateKey, MathError> {
    if params.q <= BigUint::one() || params.p <= BigUint::one() {
        return Err(MathError::InvalidParams("q must satisfy 1 < q < p"));
    }
    let x = sample_range(rng, &BigUint::one(), &(&params.q - BigUint::one()))?;
    let key = PrivateKey::from_secret(params, x);
    debug!("generate_key_for_params: y = {:x}", key.y);
    Ok(key)
}

use crate::arith::{mod_inverse, mod_pow};
use crate::config::GenerationConfig;
use crate::crypto_utils::HashAlgorithm;
use crate::error::MathError;
use crate::keys::{PrivateKey, PublicKey};
use crate::sampling::sample_range;
use log::{debug, info, trace};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::RngCore;

// GOST 94 署名 (r, s)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub r: BigUint,
    pub s: BigUint,
}

/// ハッシュ値を q で割った余り。0 の場合は 1 に置き換える
///
/// Panics if `q` is zero.
pub fn hash_mod_q(message: &[u8], q: &BigUint, hash: HashAlgorithm) -> BigUint {
    let digest = hash.digest(message);
    let h = BigUint::from_bytes_be(&digest) % q;
    if h.is_zero() {
        debug!("hash_mod_q: hash reduced to zero, using 1");
        return BigUint::one();
    }
    h
}

/// Signs `message` with SHA-256 and an unbounded retry loop.
pub fn sign<R: RngCore + ?Sized>(
    message: &[u8],
    key: &PrivateKey,
    rng: &mut R,
) -> Result<Signature, MathError> {
    sign_with(
        message,
        key,
        rng,
        HashAlgorithm::default(),
        &GenerationConfig::default(),
    )
}

/// 署名生成
///
/// A fresh ephemeral `k` is drawn from `[1, q - 1]` on every attempt and never
/// leaves this function. Attempts yielding `r == 0` or `s == 0` are retried.
pub fn sign_with<R: RngCore + ?Sized>(
    message: &[u8],
    key: &PrivateKey,
    rng: &mut R,
    hash: HashAlgorithm,
    config: &GenerationConfig,
) -> Result<Signature, MathError> {
    let (p, q, a) = (&key.params.p, &key.params.q, &key.params.a);
    info!(
        "署名生成開始: m_len = {}, q bits = {}, hash = {}",
        message.len(),
        q.bits(),
        hash
    );
    if q <= &BigUint::one() || p <= &BigUint::one() {
        return Err(MathError::InvalidParams("q must satisfy 1 < q < p"));
    }

    let h = hash_mod_q(message, q, hash);
    trace!("sign: h = {:x}", h);
    let k_max = q - BigUint::one();
    let mut attempts = config.attempts("signing");
    loop {
        attempts.next()?;
        let k = sample_range(rng, &BigUint::one(), &k_max)?;
        let r = mod_pow(a, &k, p) % q;
        if r.is_zero() {
            debug!("sign: r == 0, retrying");
            continue;
        }
        let s = (&k * &h + &key.x * &r) % q;
        if s.is_zero() {
            debug!("sign: s == 0, retrying");
            continue;
        }
        info!("署名生成完了: attempts = {}", attempts.count());
        return Ok(Signature { r, s });
    }
}

/// Verifies `signature` with SHA-256.
pub fn verify(message: &[u8], key: &PublicKey, signature: &Signature) -> bool {
    verify_with(message, key, signature, HashAlgorithm::default())
}

/// 署名検証
///
/// Never fails: out-of-range components and degenerate keys simply yield `false`.
pub fn verify_with(
    message: &[u8],
    key: &PublicKey,
    signature: &Signature,
    hash: HashAlgorithm,
) -> bool {
    let (p, q, a) = (&key.params.p, &key.params.q, &key.params.a);
    let Signature { r, s } = signature;
    info!(
        "署名検証開始: m_len = {}, q bits = {}, hash = {}",
        message.len(),
        q.bits(),
        hash
    );
    if p.is_zero() {
        info!("署名検証結果: false (p == 0)");
        return false;
    }
    if r.is_zero() || r >= q || s.is_zero() || s >= q {
        info!("署名検証結果: false (r or s out of range)");
        return false;
    }

    let h = hash_mod_q(message, q, hash);
    let v = match mod_inverse(&h, q) {
        Ok(v) => v,
        Err(e) => {
            debug!("verify: {}", e);
            info!("署名検証結果: false");
            return false;
        }
    };
    let z1 = (s * &v) % q;
    let z2 = ((q - r) * &v) % q;
    let u = (mod_pow(a, &z1, p) * mod_pow(&key.y, &z2, p)) % p % q;
    trace!("verify: u = {:x}", u);

    let verification = &u == r;
    info!("署名検証結果: {}", verification);
    verification
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::generate_private_key_with;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_key(seed: u64) -> PrivateKey {
        let mut rng = StdRng::seed_from_u64(seed);
        let config = GenerationConfig::default().with_bits(256, 64);
        generate_private_key_with(&mut rng, &config).unwrap()
    }

    #[test]
    fn test_hash_mod_q_range() {
        let q = BigUint::from(1_000_003u32);
        let h = hash_mod_q(b"hello", &q, HashAlgorithm::Sha256);
        assert!(!h.is_zero());
        assert!(h < q);
        let expected =
            BigUint::from_bytes_be(&crate::crypto_utils::hash256(b"hello")) % &q;
        assert_eq!(h, expected);
    }

    #[test]
    fn test_hash_mod_q_zero_becomes_one() {
        // q = 1 なら必ず 0 になり、1 に置き換わる
        let q = BigUint::one();
        assert_eq!(hash_mod_q(b"anything", &q, HashAlgorithm::Sha256), BigUint::one());
        // q がハッシュ値そのものを割り切る場合
        let digest = BigUint::from_bytes_be(&crate::crypto_utils::hash256(b"hello"));
        assert_eq!(hash_mod_q(b"hello", &digest, HashAlgorithm::Sha256), BigUint::one());
    }

    #[test]
    fn test_sign_success() {
        let key = test_key(10);
        let mut rng = StdRng::seed_from_u64(100);
        let signature = sign(b"hello", &key, &mut rng).unwrap();
        assert!(!signature.r.is_zero() && signature.r < key.params.q);
        assert!(!signature.s.is_zero() && signature.s < key.params.q);
        assert!(verify(b"hello", &key.public_key(), &signature));
    }

    #[test]
    fn test_sign_default_sizes() {
        let mut rng = StdRng::seed_from_u64(2048);
        let key = crate::keys::generate_private_key(&mut rng).unwrap();
        assert_eq!(key.params.p.bits(), 512);
        assert_eq!(key.params.q.bits(), 160);
        let signature = sign(b"hello", &key, &mut rng).unwrap();
        assert!(verify(b"hello", &key.public_key(), &signature));
    }

    #[test]
    fn test_sign_fail_wrong_message() {
        let key = test_key(11);
        let mut rng = StdRng::seed_from_u64(101);
        let signature = sign(b"hello", &key, &mut rng).unwrap();
        let public = key.public_key();
        assert!(!verify(b"hellp", &public, &signature));
        assert!(!verify(b"Hello", &public, &signature));
        assert!(!verify(b"", &public, &signature));
    }

    #[test]
    fn test_verify_fail_mutated_components() {
        let key = test_key(12);
        let public = key.public_key();
        let mut rng = StdRng::seed_from_u64(102);
        let signature = sign(b"hello", &key, &mut rng).unwrap();
        let one = BigUint::one();

        let mutated = [
            Signature { r: &signature.r + &one, s: signature.s.clone() },
            Signature { r: &signature.r - &one, s: signature.s.clone() },
            Signature { r: signature.r.clone(), s: &signature.s + &one },
            Signature { r: signature.r.clone(), s: &signature.s - &one },
        ];
        for bad in mutated.iter() {
            assert!(!verify(b"hello", &public, bad), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_verify_out_of_range() {
        let key = test_key(13);
        let public = key.public_key();
        let q = key.params.q.clone();
        let one = BigUint::one();
        let cases = [
            Signature { r: BigUint::zero(), s: one.clone() },
            Signature { r: q.clone(), s: one.clone() },
            Signature { r: one.clone(), s: q.clone() },
            Signature { r: one.clone(), s: BigUint::zero() },
            Signature { r: &q + &one, s: &q * 2u32 },
        ];
        for sig in cases.iter() {
            assert!(!verify(b"hello", &public, sig));
        }
    }

    #[test]
    fn test_verify_wrong_key() {
        let key = test_key(14);
        let other = test_key(15);
        let mut rng = StdRng::seed_from_u64(103);
        let signature = sign(b"hello", &key, &mut rng).unwrap();
        assert!(!verify(b"hello", &other.public_key(), &signature));
    }

    #[test]
    fn test_fresh_nonce_per_signature() {
        let key = test_key(16);
        let mut rng = StdRng::seed_from_u64(104);
        let first = sign(b"hello", &key, &mut rng).unwrap();
        let second = sign(b"hello", &key, &mut rng).unwrap();
        // 同じメッセージでも k が異なるので r も異なる
        assert_ne!(first.r, second.r);
        assert!(verify(b"hello", &key.public_key(), &first));
        assert!(verify(b"hello", &key.public_key(), &second));
    }

    #[test]
    fn test_sha3_round_trip() {
        let key = test_key(17);
        let public = key.public_key();
        let mut rng = StdRng::seed_from_u64(105);
        let config = GenerationConfig::default();
        let signature =
            sign_with(b"hello", &key, &mut rng, HashAlgorithm::Sha3_256, &config).unwrap();
        assert!(verify_with(b"hello", &public, &signature, HashAlgorithm::Sha3_256));
        assert!(!verify_with(b"hello", &public, &signature, HashAlgorithm::Sha256));
    }

    #[test]
    fn test_sign_rejects_degenerate_params() {
        let mut key = test_key(18);
        key.params.q = BigUint::one();
        let mut rng = StdRng::seed_from_u64(106);
        assert!(matches!(
            sign(b"hello", &key, &mut rng),
            Err(MathError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_verify_degenerate_public_key() {
        let key = test_key(19);
        let mut public = key.public_key();
        let signature = Signature { r: BigUint::one(), s: BigUint::one() };
        public.params.p = BigUint::zero();
        assert!(!verify(b"hello", &public, &signature));
        public.params.q = BigUint::zero();
        assert!(!verify(b"hello", &public, &signature));
    }
}

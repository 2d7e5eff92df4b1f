use crate::error::MathError;
use log::trace;
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

/// 冪剰余 base^exponent mod modulus
///
/// The result is always in `[0, modulus)`, so a modulus of one yields zero.
/// Exponentiation is delegated to `BigUint::modpow` (windowed square-and-multiply,
/// Montgomery form for odd moduli).
pub fn mod_pow(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> BigUint {
    // 内部不変条件: modulus > 0
    assert!(!modulus.is_zero(), "mod_pow: modulus is zero");
    if modulus.is_one() {
        return BigUint::zero();
    }
    let base = base % modulus;
    base.modpow(exponent, modulus)
}

/// 拡張ユークリッド互除法 (反復版)
///
/// Returns `(g, x, y)` with `a*x + b*y == g` and `g == gcd(|a|, |b|) >= 0`.
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_x, mut x) = (BigInt::one(), BigInt::zero());
    let (mut old_y, mut y) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let quotient = &old_r / &r;
        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_x = &old_x - &quotient * &x;
        old_x = std::mem::replace(&mut x, next_x);
        let next_y = &old_y - &quotient * &y;
        old_y = std::mem::replace(&mut y, next_y);
    }

    if old_r.is_negative() {
        (-old_r, -old_x, -old_y)
    } else {
        (old_r, old_x, old_y)
    }
}

/// 逆元 a^-1 mod m
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Result<BigUint, MathError> {
    if m.is_zero() {
        return Err(MathError::NoInverse);
    }
    let modulus = BigInt::from(m.clone());
    let reduced = BigInt::from(a % m);
    let (g, x, _) = extended_gcd(&reduced, &modulus);
    trace!("mod_inverse: gcd = {}", g);
    if !g.is_one() {
        return Err(MathError::NoInverse);
    }
    let (_, magnitude) = x.mod_floor(&modulus).into_parts();
    Ok(magnitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn test_mod_pow_small() {
        assert_eq!(mod_pow(&big(4), &big(13), &big(497)), big(445));
        assert_eq!(mod_pow(&big(2), &big(10), &big(1000)), big(24));
        // 指数 0 は 1
        assert_eq!(mod_pow(&big(7), &big(0), &big(13)), big(1));
        // base が modulus 以上でも先に剰余を取る
        assert_eq!(mod_pow(&big(20), &big(2), &big(7)), big(1));
    }

    #[test]
    fn test_mod_pow_modulus_one() {
        assert_eq!(mod_pow(&big(5), &big(0), &big(1)), big(0));
        assert_eq!(mod_pow(&big(5), &big(3), &big(1)), big(0));
    }

    #[test]
    fn test_mod_pow_square_and_multiply() {
        let base = BigUint::parse_bytes(b"123456789abcdef0123456789abcdef", 16).unwrap();
        let exp = BigUint::parse_bytes(b"fedcba9876543210fedcba98765", 16).unwrap();
        // 偶数の法でも同じ結果になること
        for modulus in [
            BigUint::parse_bytes(b"ffffffffffffffffffffffffffffff61", 16).unwrap(),
            BigUint::parse_bytes(b"100000000000000000000000000000000", 16).unwrap(),
        ] {
            let mut expected = BigUint::one();
            let mut acc = &base % &modulus;
            for i in 0..exp.bits() {
                if exp.bit(i) {
                    expected = (&expected * &acc) % &modulus;
                }
                acc = (&acc * &acc) % &modulus;
            }
            assert_eq!(mod_pow(&base, &exp, &modulus), expected);
        }
    }

    #[test]
    #[should_panic]
    fn test_mod_pow_zero_modulus() {
        mod_pow(&big(2), &big(3), &big(0));
    }

    #[test]
    fn test_extended_gcd_24_40() {
        let (g, x, y) = extended_gcd(&BigInt::from(24), &BigInt::from(40));
        assert_eq!(g, BigInt::from(8));
        assert_eq!(BigInt::from(24) * &x + BigInt::from(40) * &y, BigInt::from(8));
    }

    #[test]
    fn test_extended_gcd_zero_operand() {
        let (g, x, y) = extended_gcd(&BigInt::from(0), &BigInt::from(9));
        assert_eq!(g, BigInt::from(9));
        assert_eq!(BigInt::from(9) * &y + BigInt::from(0) * &x, BigInt::from(9));

        let (g, _, _) = extended_gcd(&BigInt::from(-12), &BigInt::from(0));
        assert_eq!(g, BigInt::from(12));
    }

    #[test]
    fn test_extended_gcd_large_operands() {
        // 数百ビットでもスタックを消費しない
        let a = (BigInt::one() << 1021) - BigInt::from(1);
        let b = (BigInt::one() << 607) - BigInt::from(1);
        let (g, x, y) = extended_gcd(&a, &b);
        assert_eq!(&a * &x + &b * &y, g);
        assert_eq!(g, BigInt::one());
    }

    #[test]
    fn test_modinv_success() {
        // 3 * 4 mod 11 = 1 なので、逆元は 4
        assert_eq!(mod_inverse(&big(3), &big(11)), Ok(big(4)));
        assert_eq!(mod_inverse(&big(14), &big(11)), Ok(big(4)));
    }

    #[test]
    fn test_modinv_none() {
        // gcd(4, 12) = 4 != 1
        assert_eq!(mod_inverse(&big(4), &big(12)), Err(MathError::NoInverse));
        assert_eq!(mod_inverse(&big(0), &big(7)), Err(MathError::NoInverse));
        assert_eq!(mod_inverse(&big(3), &big(0)), Err(MathError::NoInverse));
    }

    #[test]
    fn test_modinv_modulus_one() {
        assert_eq!(mod_inverse(&big(5), &big(1)), Ok(big(0)));
    }

    proptest! {
        #[test]
        fn prop_mod_pow_matches_repeated_multiplication(
            base in 0u64..1_000_000,
            exp in 0u32..200,
            modulus in 1u64..100_000,
        ) {
            let expected = (0..exp).fold(1u128 % modulus as u128, |acc, _| {
                (acc * (base as u128 % modulus as u128)) % modulus as u128
            });
            let result = mod_pow(&big(base), &BigUint::from(exp), &big(modulus));
            prop_assert!(result < big(modulus));
            prop_assert_eq!(result, BigUint::from(expected));
        }

        #[test]
        fn prop_extended_gcd_identity(a in any::<i64>(), b in any::<i64>()) {
            prop_assume!(a != 0 || b != 0);
            let (a, b) = (BigInt::from(a), BigInt::from(b));
            let (g, x, y) = extended_gcd(&a, &b);
            prop_assert!(!g.is_negative());
            prop_assert_eq!(&g, &a.gcd(&b));
            prop_assert_eq!(&a * &x + &b * &y, g);
        }

        #[test]
        fn prop_mod_inverse(a in 0u64..u64::MAX, m in 2u64..u64::MAX) {
            let (a, m) = (big(a), big(m));
            match mod_inverse(&a, &m) {
                Ok(inv) => {
                    prop_assert!(inv < m);
                    prop_assert!(((&a * &inv) % &m).is_one());
                }
                Err(e) => {
                    prop_assert_eq!(e, MathError::NoInverse);
                    prop_assert!(!a.gcd(&m).is_one());
                }
            }
        }
    }
}

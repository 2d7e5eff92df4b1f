use crate::error::FormatError;
use crate::keys::{PrivateKey, PublicKey};
use crate::params::DomainParams;
use crate::signature::Signature;
use num_bigint::BigUint;
use num_traits::Zero;

/// Converts a BigUint to a minimal lowercase hexadecimal string (`"0"` for zero).
pub fn biguint_to_hex(n: &BigUint) -> String {
    if n.is_zero() {
        return "0".to_string();
    }
    let hex = hex::encode(n.to_bytes_be());
    // 先頭の 0 ニブルは出力しない
    match hex.strip_prefix('0') {
        Some(rest) => rest.to_string(),
        None => hex,
    }
}

/// Converts a hexadecimal string to a BigUint.
///
/// Accepts an optional `0x` prefix and odd digit counts; an empty string is zero.
pub fn hex_to_biguint(hex: &str) -> Result<BigUint, FormatError> {
    let digits = hex
        .strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))
        .unwrap_or(hex);
    if digits.is_empty() {
        return Ok(BigUint::zero());
    }
    let padded;
    let even = if digits.len() % 2 == 1 {
        padded = format!("0{}", digits);
        padded.as_str()
    } else {
        digits
    };
    let decoded = hex::decode(even).map_err(|_| FormatError::InvalidHex(hex.to_string()))?;
    Ok(BigUint::from_bytes_be(&decoded))
}

/// Renders a private key as `name=hex` lines: `p`, `q`, `a`, `x`, `y`.
pub fn serialize_private(key: &PrivateKey) -> String {
    format!(
        "p={}\nq={}\na={}\nx={}\ny={}\n",
        biguint_to_hex(&key.params.p),
        biguint_to_hex(&key.params.q),
        biguint_to_hex(&key.params.a),
        biguint_to_hex(&key.x),
        biguint_to_hex(&key.y),
    )
}

/// Renders a public key as `name=hex` lines: `p`, `q`, `a`, `y`.
pub fn serialize_public(key: &PublicKey) -> String {
    format!(
        "p={}\nq={}\na={}\ny={}\n",
        biguint_to_hex(&key.params.p),
        biguint_to_hex(&key.params.q),
        biguint_to_hex(&key.params.a),
        biguint_to_hex(&key.y),
    )
}

// 鍵テキストから読み取ったフィールド
#[derive(Default)]
struct KeyFields {
    p: Option<BigUint>,
    q: Option<BigUint>,
    a: Option<BigUint>,
    x: Option<BigUint>,
    y: Option<BigUint>,
}

impl KeyFields {
    fn parse(text: &str, allowed: &[&str]) -> Result<Self, FormatError> {
        let mut fields = KeyFields::default();
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let (name, value) = line
                .split_once('=')
                .ok_or_else(|| FormatError::InvalidLine(line.to_string()))?;
            let name = name.trim();
            if !allowed.contains(&name) {
                return Err(FormatError::UnknownField(name.to_string()));
            }
            let value = Some(hex_to_biguint(value.trim())?);
            match name {
                "p" => fields.p = value,
                "q" => fields.q = value,
                "a" => fields.a = value,
                "x" => fields.x = value,
                "y" => fields.y = value,
                _ => return Err(FormatError::UnknownField(name.to_string())),
            }
        }
        Ok(fields)
    }

    fn params(&mut self) -> Result<DomainParams, FormatError> {
        Ok(DomainParams {
            p: take_field(&mut self.p, "p")?,
            q: take_field(&mut self.q, "q")?,
            a: take_field(&mut self.a, "a")?,
        })
    }
}

fn take_field(slot: &mut Option<BigUint>, name: &'static str) -> Result<BigUint, FormatError> {
    slot.take().ok_or(FormatError::MissingField(name))
}

/// Parses the text produced by [`serialize_private`].
pub fn parse_private(text: &str) -> Result<PrivateKey, FormatError> {
    let mut fields = KeyFields::parse(text, &["p", "q", "a", "x", "y"])?;
    let params = fields.params()?;
    let x = take_field(&mut fields.x, "x")?;
    let y = take_field(&mut fields.y, "y")?;
    Ok(PrivateKey { params, x, y })
}

/// Parses the text produced by [`serialize_public`].
pub fn parse_public(text: &str) -> Result<PublicKey, FormatError> {
    let mut fields = KeyFields::parse(text, &["p", "q", "a", "y"])?;
    let params = fields.params()?;
    let y = take_field(&mut fields.y, "y")?;
    Ok(PublicKey { params, y })
}

/// Renders a signature as `hex(r):hex(s)` followed by a newline.
pub fn serialize_signature(signature: &Signature) -> String {
    format!(
        "{}:{}\n",
        biguint_to_hex(&signature.r),
        biguint_to_hex(&signature.s)
    )
}

/// Parses `hex(r):hex(s)`; surrounding whitespace is ignored.
pub fn parse_signature(text: &str) -> Result<Signature, FormatError> {
    let (r, s) = text
        .trim()
        .split_once(':')
        .ok_or(FormatError::InvalidFormat)?;
    Ok(Signature {
        r: hex_to_biguint(r.trim())?,
        s: hex_to_biguint(s.trim())?,
    })
}

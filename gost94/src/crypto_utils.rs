// ハッシュ関数 (SHA-256 / SHA3-256)
use log::trace;
use sha2::Sha256;
use sha3::{Digest, Sha3_256};
use std::fmt;
use std::str::FromStr;

/// 256-bit message digest used by the signature scheme.
///
/// SHA-256 is the default and matches existing signatures; SHA3-256 is an
/// opt-in alternative. Signer and verifier must agree on the algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha3_256,
}

impl HashAlgorithm {
    /// メッセージのハッシュ値 (32 バイト) を計算
    pub fn digest(self, data: &[u8]) -> [u8; 32] {
        let mut digest = [0u8; 32];
        match self {
            HashAlgorithm::Sha256 => digest.copy_from_slice(&Sha256::digest(data)),
            HashAlgorithm::Sha3_256 => digest.copy_from_slice(&Sha3_256::digest(data)),
        }
        trace!("digest ({}): {}", self, hex::encode(digest));
        digest
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Sha256 => f.write_str("sha256"),
            HashAlgorithm::Sha3_256 => f.write_str("sha3-256"),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            "sha3-256" | "sha3_256" => Ok(HashAlgorithm::Sha3_256),
            other => Err(format!("unsupported hash algorithm: {}", other)),
        }
    }
}

/// SHA-256 of `data`.
#[inline]
pub fn hash256(data: &[u8]) -> [u8; 32] {
    HashAlgorithm::Sha256.digest(data)
}

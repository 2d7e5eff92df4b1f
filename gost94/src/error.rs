use thiserror::Error;

/// 数論演算・生成処理のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("modular inverse does not exist")]
    NoInverse,
    #[error("invalid sampling bounds: min > max")]
    InvalidBounds,
    #[error("prime bit length too small: {0} (need at least 2)")]
    BitsTooSmall(usize),
    #[error("Miller-Rabin rounds must be at least 1")]
    InvalidRounds,
    #[error("invalid parameter sizes: p_bits = {p_bits}, q_bits = {q_bits}")]
    InvalidParamBits { p_bits: usize, q_bits: usize },
    #[error("invalid domain parameters: {0}")]
    InvalidParams(&'static str),
    #[error("private key is inconsistent with its public value")]
    InconsistentKey,
    #[error("{stage} gave up after {attempts} attempts")]
    GenerationExhausted { stage: &'static str, attempts: u64 },
}

/// 鍵・署名テキストの解析エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("invalid hex value: {0:?}")]
    InvalidHex(String),
    #[error("invalid key line (expected name=value): {0:?}")]
    InvalidLine(String),
    #[error("invalid signature format (expected r:s)")]
    InvalidFormat,
}

// エラーハンドリング
pub mod error;
// 定数
pub mod constants;
// 生成処理の設定
pub mod config;
// 冪剰余・拡張ユークリッド・逆元
pub mod arith;
// 一様乱数サンプリング
pub mod sampling;
// 素数判定と素数生成
pub mod prime;
// ドメインパラメータ
pub mod params;
// 鍵ペア
pub mod keys;
// ハッシュ関数
pub mod crypto_utils;
// 署名生成・検証
pub mod signature;
// シリアライゼーションヘルパー
pub mod serialization;

pub use config::GenerationConfig;
pub use crypto_utils::HashAlgorithm;
pub use error::{FormatError, MathError};
pub use keys::{generate_private_key, generate_private_key_with, PrivateKey, PublicKey};
pub use params::{generate_params, DomainParams};
pub use serialization::{biguint_to_hex, hex_to_biguint};
pub use signature::{sign, sign_with, verify, verify_with, Signature};

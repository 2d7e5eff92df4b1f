// 法 p のデフォルトビット長
pub const DEFAULT_P_BITS: usize = 512;
// 部分群の位数 q のデフォルトビット長
pub const DEFAULT_Q_BITS: usize = 160;
// Miller-Rabin テストのデフォルト反復回数
pub const DEFAULT_MR_ROUNDS: u32 = 32;
// 乱数源から一度に取り出すワードのビット幅
pub const WORD_BITS: usize = 64;
// 試し割りに使う小さな素数
pub const SMALL_PRIMES: [u32; 11] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31];

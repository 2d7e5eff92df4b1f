use crate::constants::{DEFAULT_MR_ROUNDS, DEFAULT_P_BITS, DEFAULT_Q_BITS};
use crate::error::MathError;
use log::debug;

/// Sizes and limits used by prime, parameter and key generation.
///
/// `max_attempts = None` keeps every retry loop unbounded; `Some(n)` makes each
/// loop give up with [`MathError::GenerationExhausted`] after `n` candidates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationConfig {
    pub p_bits: usize,
    pub q_bits: usize,
    pub rounds: u32,
    pub max_attempts: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            p_bits: DEFAULT_P_BITS,
            q_bits: DEFAULT_Q_BITS,
            rounds: DEFAULT_MR_ROUNDS,
            max_attempts: None,
        }
    }
}

impl GenerationConfig {
    pub fn with_bits(mut self, p_bits: usize, q_bits: usize) -> Self {
        self.p_bits = p_bits;
        self.q_bits = q_bits;
        self
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: Option<u64>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// `1 < q_bits < p_bits` でなければならない
    pub fn check_bits(&self) -> Result<(), MathError> {
        if self.q_bits < 2 || self.q_bits >= self.p_bits {
            return Err(MathError::InvalidParamBits {
                p_bits: self.p_bits,
                q_bits: self.q_bits,
            });
        }
        Ok(())
    }

    /// 0 ラウンドでは合成数を除外できない
    pub fn check_rounds(&self) -> Result<(), MathError> {
        if self.rounds == 0 {
            return Err(MathError::InvalidRounds);
        }
        Ok(())
    }

    /// Runs every check needed before parameter generation.
    pub fn check(&self) -> Result<(), MathError> {
        self.check_bits()?;
        self.check_rounds()
    }

    pub(crate) fn attempts(&self, stage: &'static str) -> Attempts {
        Attempts {
            stage,
            count: 0,
            limit: self.max_attempts,
        }
    }
}

/// Counts iterations of one retry loop against the configured cap.
#[derive(Debug)]
pub(crate) struct Attempts {
    stage: &'static str,
    count: u64,
    limit: Option<u64>,
}

impl Attempts {
    /// 次の試行を開始する。上限に達していればエラー
    pub(crate) fn next(&mut self) -> Result<(), MathError> {
        if let Some(limit) = self.limit {
            if self.count >= limit {
                debug!("{}: attempt limit {} reached", self.stage, limit);
                return Err(MathError::GenerationExhausted {
                    stage: self.stage,
                    attempts: self.count,
                });
            }
        }
        self.count += 1;
        Ok(())
    }

    pub(crate) fn count(&self) -> u64 {
        self.count
    }
}

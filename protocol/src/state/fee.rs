//! Proportional fee schedule.
//!
//! Value-moving payloads pay a fraction of the amount, clamped to
//! `[min_fee, max_fee]`. Unbond and Sortition move no value and are free.

use serde::{Deserialize, Serialize};

use super::FeeSchedule;
use crate::config::{DEFAULT_FEE_FRACTION_PPM, DEFAULT_MAX_FEE, DEFAULT_MIN_FEE};
use crate::transaction::{Amount, PayloadType};

/// Fee parameters. `fee_fraction_ppm` is parts per million of the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeParams {
    pub fee_fraction_ppm: u64,
    pub min_fee: Amount,
    pub max_fee: Amount,
}

impl Default for FeeParams {
    fn default() -> Self {
        Self {
            fee_fraction_ppm: DEFAULT_FEE_FRACTION_PPM,
            min_fee: Amount::new(DEFAULT_MIN_FEE),
            max_fee: Amount::new(DEFAULT_MAX_FEE),
        }
    }
}

impl FeeParams {
    fn proportional(&self, amount: Amount) -> Amount {
        // u128 so amount * ppm cannot overflow.
        let raw = u128::from(amount.value()) * u128::from(self.fee_fraction_ppm) / 1_000_000;
        let raw = u64::try_from(raw).unwrap_or(u64::MAX);
        // Not `u64::clamp`: it panics when min_fee > max_fee.
        Amount::new(raw.min(self.max_fee.value()).max(self.min_fee.value()))
    }
}

impl FeeSchedule for FeeParams {
    fn calculate_fee(&self, amount: Amount, payload_type: PayloadType) -> Amount {
        match payload_type {
            PayloadType::Transfer
            | PayloadType::Bond
            | PayloadType::Withdraw
            | PayloadType::BatchTransfer => self.proportional(amount),
            PayloadType::Unbond | PayloadType::Sortition => Amount::ZERO,
        }
    }
}

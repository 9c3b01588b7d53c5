//! Default resolution for unset request fields.
//!
//! Zero means "unset" for both fee and lock time. An explicit zero fee is
//! therefore indistinguishable from no fee and always gets the default.

use std::sync::Arc;

use nova_tx::state::{FeeSchedule, HeightSource};
use nova_tx::transaction::{Amount, PayloadType};

pub struct DefaultResolver {
    fees: Arc<dyn FeeSchedule>,
    heights: Arc<dyn HeightSource>,
}

impl DefaultResolver {
    pub fn new(fees: Arc<dyn FeeSchedule>, heights: Arc<dyn HeightSource>) -> Self {
        Self { fees, heights }
    }

    /// `fee`, or the schedule's fee for `amount` when `fee` is zero.
    ///
    /// The default is always priced as a transfer, whatever payload the
    /// caller is building.
    pub fn fee(&self, fee: Amount, amount: Amount) -> Amount {
        if fee.is_zero() {
            self.fees.calculate_fee(amount, PayloadType::Transfer)
        } else {
            fee
        }
    }

    /// `lock_time`, or the last committed height when `lock_time` is zero.
    ///
    /// An empty ledger resolves to 1, since zero means "unset" on the wire
    /// and would be re-resolved by anyone rebuilding the transaction.
    pub fn lock_time(&self, lock_time: u32) -> u32 {
        if lock_time == 0 {
            self.heights.last_block_height().max(1)
        } else {
            lock_time
        }
    }
}

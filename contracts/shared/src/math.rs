//! Fixed-point helpers for reward accounting.
//!
//! All values are non-negative `i128` scaled integers. Every division floors,
//! every multiplication is checked; `None` means the computation overflowed
//! (or was handed a negative operand / zero divisor) and the caller must
//! reject the whole operation.

use crate::{ACC_REWARD_PRECISION, MAX_BASIS_POINTS};

/// `floor(a * b / denominator)` for non-negative operands.
pub fn mul_div_floor(a: i128, b: i128, denominator: i128) -> Option<i128> {
    if a < 0 || b < 0 || denominator <= 0 {
        return None;
    }
    a.checked_mul(b)?.checked_div(denominator)
}

/// `floor(amount * bps / 10000)`.
pub fn bps_of(amount: i128, bps: u32) -> Option<i128> {
    mul_div_floor(amount, i128::from(bps), MAX_BASIS_POINTS)
}

/// Splits `amount` into `(fee, remainder)` with `fee + remainder == amount`.
pub fn split_fee(amount: i128, fee_bps: u32) -> Option<(i128, i128)> {
    let fee = bps_of(amount, fee_bps)?;
    Some((fee, amount.checked_sub(fee)?))
}

/// Reward a pool earns over `blocks` blocks.
///
/// `blocks * bonus_multiplier * reward_per_block * alloc_point / total_alloc_point`
pub fn pool_reward(
    blocks: u32,
    bonus_multiplier: u32,
    reward_per_block: i128,
    alloc_point: u32,
    total_alloc_point: u32,
) -> Option<i128> {
    let multiplier = i128::from(blocks).checked_mul(i128::from(bonus_multiplier))?;
    mul_div_floor(
        multiplier.checked_mul(reward_per_block)?,
        i128::from(alloc_point),
        i128::from(total_alloc_point),
    )
}

/// Accumulator increase for distributing `reward` over `total_staked` units.
pub fn reward_per_share(reward: i128, total_staked: i128) -> Option<i128> {
    mul_div_floor(reward, ACC_REWARD_PRECISION, total_staked)
}

/// Reward accrued by `amount` staked units at accumulator `acc`; also the
/// reward-debt checkpoint for that stake.
pub fn accrued(amount: i128, acc_reward_per_share: i128) -> Option<i128> {
    mul_div_floor(amount, acc_reward_per_share, ACC_REWARD_PRECISION)
}

/// Reward accrued since the `reward_debt` checkpoint.
pub fn pending(amount: i128, acc_reward_per_share: i128, reward_debt: i128) -> Option<i128> {
    accrued(amount, acc_reward_per_share)?.checked_sub(reward_debt)
}

/// Commission for one upline level: level share first, then the referee bonus.
pub fn level_commission(total: i128, level_rate_bps: u32, bonus_rate_bps: u32) -> Option<i128> {
    bps_of(bps_of(total, level_rate_bps)?, bonus_rate_bps)
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bps_floors() {
        assert_eq!(bps_of(999, 400), Some(39));
        assert_eq!(bps_of(0, 1000), Some(0));
        assert_eq!(bps_of(-1, 1000), None);
    }

    #[test]
    fn test_pool_reward_weighting() {
        // 10 blocks * 1x * 100/block, pool holds 1 of 4 alloc points
        assert_eq!(pool_reward(10, 1, 100, 1000, 4000), Some(250));
        assert_eq!(pool_reward(10, 2, 100, 1000, 4000), Some(500));
        assert_eq!(pool_reward(10, 1, 100, 1000, 0), None);
        assert_eq!(pool_reward(u32::MAX, u32::MAX, i128::MAX, 1, 1), None);
    }

    #[test]
    fn test_pending_after_checkpoint_is_zero() {
        let acc = reward_per_share(333, 7).unwrap();
        let debt = accrued(7, acc).unwrap();
        assert_eq!(pending(7, acc, debt), Some(0));
        assert!(debt <= 333);
    }

    #[test]
    fn test_level_commission_split() {
        let cut = 1_000_000;
        assert_eq!(level_commission(cut, 6000, 10000), Some(600_000));
        assert_eq!(level_commission(cut, 3000, 10000), Some(300_000));
        assert_eq!(level_commission(cut, 1000, 10000), Some(100_000));
        assert_eq!(level_commission(cut, 6000, 5000), Some(300_000));
    }

    proptest! {
        #[test]
        fn split_fee_conserves_value(amount in 0i128..=1_000_000_000_000_000_000i128, fee_bps in 0u32..=10000u32) {
            let (fee, rest) = split_fee(amount, fee_bps).unwrap();
            prop_assert_eq!(fee + rest, amount);
            prop_assert!(fee >= 0 && rest >= 0);
        }

        #[test]
        fn distributed_never_exceeds_reward(reward in 0i128..=1_000_000_000_000_000i128, stakes in proptest::collection::vec(1i128..=1_000_000_000_000i128, 1..8)) {
            let total: i128 = stakes.iter().sum();
            let acc = reward_per_share(reward, total).unwrap();
            let paid: i128 = stakes.iter().map(|s| accrued(*s, acc).unwrap()).sum();
            prop_assert!(paid <= reward);
        }
    }
}

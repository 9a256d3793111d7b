#![no_std]
#[cfg(test)]
extern crate std;

use soroban_sdk::{contracttype, Address};

pub mod math;
pub mod referral;

pub use referral::{ReferralLedgerClient, ReferralLedgerInterface};

// Shared data types used by the Yieldline farm and referral ledger contracts.
// Anything that crosses a contract boundary lives here so both sides decode
// the same layout.

// ============================================================================
// Referral Types
// ============================================================================

/// Snapshot of one account in the referral ledger.
///
/// Fixed size: the direct referees are stored under their own keys and
/// served page by page.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReferralAccount {
    /// Upline of this account. Set at most once.
    pub referrer: Option<Address>,
    /// Cumulative commission credited to this account.
    pub reward: i128,
    /// Number of accounts that named this account as their referrer.
    pub referred_count: u32,
    /// Ledger timestamp of the last stake deposit made by this account.
    pub last_active: u64,
}

impl ReferralAccount {
    pub fn new() -> Self {
        Self {
            referrer: None,
            reward: 0,
            referred_count: 0,
            last_active: 0,
        }
    }
}

impl Default for ReferralAccount {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Utility Functions for Validation
// ============================================================================

/// Validate that a rate is within valid range (0-100%)
pub fn validate_basis_points(basis_points: u32) -> bool {
    basis_points <= MAX_BASIS_POINTS_U32
}

/// `true` once more than `window` seconds have passed since `last_active`.
pub fn is_inactive(last_active: u64, window: u64, now: u64) -> bool {
    now > last_active.saturating_add(window)
}

// ============================================================================
// Constants
// ============================================================================

/// Basis points representing 100% (10000 basis points = 100%)
pub const MAX_BASIS_POINTS: i128 = 10000;
pub const MAX_BASIS_POINTS_U32: u32 = 10000;

/// Seconds in a day
pub const SECONDS_PER_DAY: u64 = 86400;

/// Scale of `acc_reward_per_share`.
pub const ACC_REWARD_PRECISION: i128 = 1_000_000_000_000;

/// Ceiling for pool deposit fees (10%).
pub const MAX_DEPOSIT_FEE_BPS: u32 = 1000;

/// Ceiling for early-withdrawal fees (10%).
pub const MAX_EARLY_WITHDRAW_FEE_BPS: u32 = 1000;

/// Longest harvest lockup a pool may configure.
pub const MAX_HARVEST_INTERVAL: u64 = 14 * SECONDS_PER_DAY;

/// Longest early-withdrawal window a pool may configure.
pub const MAX_EARLY_WITHDRAW_WINDOW: u64 = 7 * SECONDS_PER_DAY;

/// Number of upline levels that can earn a commission.
pub const MAX_REFERRAL_DEPTH: u32 = 3;

/// Share of every emission minted on top to the fee account (1/10).
pub const FEE_SURCHARGE_DIVISOR: i128 = 10;

/// Default window after which a referrer without deposits counts as inactive.
pub const DEFAULT_INACTIVITY_WINDOW: u64 = 30 * SECONDS_PER_DAY;

/// Instance storage TTL management (ledgers, ~5s each).
pub const DAY_IN_LEDGERS: u32 = 17280;
pub const INSTANCE_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;
pub const PERSISTENT_BUMP_AMOUNT: u32 = 90 * DAY_IN_LEDGERS;
pub const PERSISTENT_LIFETIME_THRESHOLD: u32 = PERSISTENT_BUMP_AMOUNT - DAY_IN_LEDGERS;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_inactivity_boundary() {
        assert!(!is_inactive(100, 50, 150));
        assert!(is_inactive(100, 50, 151));
        assert!(!is_inactive(u64::MAX - 1, 50, u64::MAX));
    }

    #[test]
    fn test_basis_point_bounds() {
        assert!(validate_basis_points(0));
        assert!(validate_basis_points(10000));
        assert!(!validate_basis_points(10001));
    }
}

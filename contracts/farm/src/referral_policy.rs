use soroban_sdk::{Address, Env};
use yieldline_shared::{
    is_inactive, math, validate_basis_points, ReferralLedgerClient, MAX_BASIS_POINTS_U32,
    MAX_REFERRAL_DEPTH,
};

use crate::{events, transfer, FarmConfig, FarmError, ReferralTable};

pub fn ledger<'a>(env: &Env, config: &FarmConfig) -> ReferralLedgerClient<'a> {
    ReferralLedgerClient::new(env, &config.referral_ledger)
}

/// Rejects tables whose level rates exceed 100% in total, that configure more
/// levels than the farm walks, or whose bonus steps are not strictly
/// ascending / above 100%.
pub fn validate_table(table: &ReferralTable) -> Result<(), FarmError> {
    if table.level_rates.len() > MAX_REFERRAL_DEPTH {
        return Err(FarmError::InvalidReferralTable);
    }

    let mut level_sum: u32 = 0;
    for rate in table.level_rates.iter() {
        level_sum = level_sum
            .checked_add(rate)
            .ok_or(FarmError::InvalidReferralTable)?;
    }
    if level_sum > MAX_BASIS_POINTS_U32 {
        return Err(FarmError::InvalidReferralTable);
    }

    if table.bonus_thresholds.len() != table.bonus_rates.len() {
        return Err(FarmError::InvalidReferralTable);
    }

    let mut previous: Option<u32> = None;
    for threshold in table.bonus_thresholds.iter() {
        if let Some(previous) = previous {
            if threshold <= previous {
                return Err(FarmError::InvalidReferralTable);
            }
        }
        previous = Some(threshold);
    }

    if table.bonus_rates.iter().any(|rate| !validate_basis_points(rate)) {
        return Err(FarmError::InvalidReferralTable);
    }

    Ok(())
}

/// Bonus step for a referrer with `referred_count` direct referees: the rate
/// of the last threshold not above the count, zero below the first step.
pub fn bonus_rate(table: &ReferralTable, referred_count: u32) -> u32 {
    let mut rate = 0;
    for (threshold, step_rate) in table.bonus_thresholds.iter().zip(table.bonus_rates.iter()) {
        if referred_count < threshold {
            break;
        }
        rate = step_rate;
    }
    rate
}

pub fn is_referrer_active(env: &Env, config: &FarmConfig, account: &Address) -> bool {
    let last_active = ledger(env, config).get_account(account).last_active;
    !is_inactive(last_active, config.inactivity_window, env.ledger().timestamp())
}

/// Pays commission on `total_value` up the referrer chain of `referee`.
///
/// Walks at most `MAX_REFERRAL_DEPTH` links and stops at the first missing
/// link or unconfigured level. In only-active mode an inactive referrer earns
/// nothing for its level but the walk continues above it. Returns the amount
/// actually paid; the caller routes `total_value - paid` elsewhere.
pub fn pay_referral(
    env: &Env,
    config: &FarmConfig,
    table: &ReferralTable,
    referee: &Address,
    total_value: i128,
) -> Result<i128, FarmError> {
    let ledger = ledger(env, config);
    let operator = env.current_contract_address();
    let now = env.ledger().timestamp();

    let mut paid: i128 = 0;
    let mut cursor = ledger.get_account(referee).referrer;

    for level in 0..MAX_REFERRAL_DEPTH {
        let referrer = match cursor {
            Some(referrer) => referrer,
            None => break,
        };
        let level_rate = match table.level_rates.get(level) {
            Some(rate) => rate,
            None => break,
        };

        let account = ledger.get_account(&referrer);
        let skip = config.only_active_referrers
            && is_inactive(account.last_active, config.inactivity_window, now);

        if !skip {
            let commission = math::level_commission(
                total_value,
                level_rate,
                bonus_rate(table, account.referred_count),
            )
            .ok_or(FarmError::MathOverflow)?;

            let sent = transfer::safe_reward_transfer(env, config, &referrer, commission)?;
            if sent > 0 {
                let cumulative = account
                    .reward
                    .checked_add(sent)
                    .ok_or(FarmError::MathOverflow)?;
                ledger.set_reward(&operator, &referrer, &cumulative);
                paid = paid.checked_add(sent).ok_or(FarmError::MathOverflow)?;
                events::referral_paid(env, referee.clone(), referrer.clone(), level + 1, sent);
            }
        }

        cursor = account.referrer;
    }

    Ok(paid)
}

//! Harvest-or-lockup settlement of a user position.
//!
//! Settlement is split in two so that every ledger write of an operation
//! lands before any of its token calls: `settle` mutates the position and the
//! global locked-up total and returns what is owed, `pay_harvest` moves the
//! tokens afterwards.

use soroban_sdk::{Address, Env};
use yieldline_shared::math;

use crate::{events, referral_policy, storage, transfer, FarmConfig, FarmError, PoolInfo, UserPosition};

/// Reward released by an open harvest gate.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Harvest {
    /// Net reward owed to the user.
    pub rewards: i128,
    /// Harvest fee owed to the fee account.
    pub fee: i128,
}

/// Settle `position`'s pending reward against `pool`'s current accumulator.
///
/// With the gate open, pending plus previously locked-up reward is released
/// (returned as a `Harvest`) and the gate moves one interval forward. With
/// the gate closed, pending reward is added to the locked-up balance.
pub fn settle(
    env: &Env,
    pool_id: u32,
    pool: &PoolInfo,
    user: &Address,
    position: &mut UserPosition,
) -> Result<Option<Harvest>, FarmError> {
    let now = env.ledger().timestamp();

    if position.next_harvest_until == 0 {
        position.next_harvest_until = now.saturating_add(pool.harvest_interval);
    }

    let pending = math::pending(
        position.amount,
        pool.acc_reward_per_share,
        position.reward_debt,
    )
    .ok_or(FarmError::MathOverflow)?;

    if now >= position.next_harvest_until {
        if pending > 0 || position.reward_locked_up > 0 {
            let total = pending
                .checked_add(position.reward_locked_up)
                .ok_or(FarmError::MathOverflow)?;

            let total_locked_up = storage::total_locked_up(env)
                .checked_sub(position.reward_locked_up)
                .ok_or(FarmError::MathOverflow)?;
            storage::set_total_locked_up(env, total_locked_up);

            position.reward_locked_up = 0;
            position.next_harvest_until = now.saturating_add(pool.harvest_interval);

            let (fee, rewards) =
                math::split_fee(total, pool.harvest_fee_bps).ok_or(FarmError::MathOverflow)?;
            return Ok(Some(Harvest { rewards, fee }));
        }
    } else if pending > 0 {
        position.reward_locked_up = position
            .reward_locked_up
            .checked_add(pending)
            .ok_or(FarmError::MathOverflow)?;

        let total_locked_up = storage::total_locked_up(env)
            .checked_add(pending)
            .ok_or(FarmError::MathOverflow)?;
        storage::set_total_locked_up(env, total_locked_up);

        events::reward_locked_up(env, user.clone(), pool_id, pending);
    }

    Ok(None)
}

/// Move the tokens of a released harvest.
///
/// The user receives the net reward. A referral cut of the net reward is
/// minted on top; it goes up the user's referrer chain when referrals are on
/// and the user has a referrer, and whatever the chain does not absorb joins
/// the harvest fee at the fee account.
pub fn pay_harvest(
    env: &Env,
    config: &FarmConfig,
    pool_id: u32,
    user: &Address,
    harvest: &Harvest,
) -> Result<(), FarmError> {
    let paid_to_user = transfer::safe_reward_transfer(env, config, user, harvest.rewards)?;

    let referral_amount =
        math::bps_of(harvest.rewards, config.referral_cut_bps).ok_or(FarmError::MathOverflow)?;

    let mut to_fee_account = harvest.fee;
    if referral_amount > 0 {
        transfer::mint_reward(env, config, &env.current_contract_address(), referral_amount);

        let referral_paid = if config.referral_enabled
            && referral_policy::ledger(env, config).has_referrer(user)
        {
            let table = storage::get_referral_table(env);
            referral_policy::pay_referral(env, config, &table, user, referral_amount)?
        } else {
            0
        };

        to_fee_account = referral_amount
            .checked_sub(referral_paid)
            .and_then(|undistributed| undistributed.checked_add(to_fee_account))
            .ok_or(FarmError::MathOverflow)?;
    }

    transfer::safe_reward_transfer(env, config, &config.fee_address, to_fee_account)?;

    events::harvest(env, user.clone(), pool_id, paid_to_user, harvest.fee);

    Ok(())
}

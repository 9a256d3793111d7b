//! Pool accumulator accrual.
//!
//! `project` is the single source of truth for what a pool's accumulator is
//! at a given block; `update_pool` persists it and mints the emission, while
//! `pending_reward` only reads it. Both therefore agree to the unit.

use soroban_sdk::Env;
use yieldline_shared::{math, FEE_SURCHARGE_DIVISOR};

use crate::{storage, transfer, FarmConfig, FarmError, PoolInfo};

/// Pool state as of `current_block`, plus the emission it earned since its
/// last accrual.
pub fn project(
    config: &FarmConfig,
    pool: &PoolInfo,
    total_alloc_point: u32,
    current_block: u32,
) -> Result<(PoolInfo, i128), FarmError> {
    let mut pool = pool.clone();
    if current_block <= pool.last_reward_block {
        return Ok((pool, 0));
    }

    if pool.total_staked == 0 || pool.alloc_point == 0 {
        pool.last_reward_block = current_block;
        return Ok((pool, 0));
    }

    let reward = math::pool_reward(
        current_block - pool.last_reward_block,
        config.bonus_multiplier,
        config.reward_per_block,
        pool.alloc_point,
        total_alloc_point,
    )
    .ok_or(FarmError::MathOverflow)?;

    let delta = math::reward_per_share(reward, pool.total_staked).ok_or(FarmError::MathOverflow)?;
    pool.acc_reward_per_share = pool
        .acc_reward_per_share
        .checked_add(delta)
        .ok_or(FarmError::MathOverflow)?;
    pool.last_reward_block = current_block;

    Ok((pool, reward))
}

/// Bring `pool_id` current and mint what it earned: the emission to the farm
/// and a tenth on top to the fee account.
pub fn update_pool(env: &Env, config: &FarmConfig, pool_id: u32) -> Result<PoolInfo, FarmError> {
    let pool = storage::get_pool(env, pool_id)?;
    let (updated, reward) = project(
        config,
        &pool,
        storage::total_alloc_point(env),
        env.ledger().sequence(),
    )?;

    if updated != pool {
        storage::set_pool(env, pool_id, &updated);
    }

    if reward > 0 {
        transfer::mint_reward(env, config, &env.current_contract_address(), reward);
        transfer::mint_reward(env, config, &config.fee_address, reward / FEE_SURCHARGE_DIVISOR);
    }

    Ok(updated)
}

/// Accrue every pool. Cost grows with the number of pools.
pub fn mass_update_pools(env: &Env, config: &FarmConfig) -> Result<(), FarmError> {
    for pool_id in 0..storage::pool_count(env) {
        update_pool(env, config, pool_id)?;
    }
    Ok(())
}

/// Emission multiplier over the block range `[from, to)`.
pub fn multiplier(config: &FarmConfig, from: u32, to: u32) -> i128 {
    if to <= from {
        return 0;
    }
    i128::from(to - from) * i128::from(config.bonus_multiplier)
}

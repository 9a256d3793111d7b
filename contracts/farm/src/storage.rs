use soroban_sdk::{contracttype, vec, Address, Env};
use yieldline_shared::{
    INSTANCE_BUMP_AMOUNT, INSTANCE_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT,
    PERSISTENT_LIFETIME_THRESHOLD,
};

use crate::{FarmConfig, FarmError, PoolInfo, ReferralTable, UserPosition};

// Storage Keys
#[contracttype]
pub enum DataKey {
    Config,
    Pool(u32),
    PoolCount,
    PoolByToken(Address),
    Position(u32, Address),
    TotalAllocPoint,
    TotalLockedUp,
    ReferralTable,
    Entered,
}

pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

// Config
pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> Result<FarmConfig, FarmError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(FarmError::NotInitialized)
}

pub fn set_config(env: &Env, config: &FarmConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

// Pools
pub fn pool_count(env: &Env) -> u32 {
    env.storage().instance().get(&DataKey::PoolCount).unwrap_or(0)
}

pub fn get_pool(env: &Env, pool_id: u32) -> Result<PoolInfo, FarmError> {
    env.storage()
        .persistent()
        .get(&DataKey::Pool(pool_id))
        .ok_or(FarmError::PoolNotFound)
}

pub fn set_pool(env: &Env, pool_id: u32, pool: &PoolInfo) {
    let key = DataKey::Pool(pool_id);
    env.storage().persistent().set(&key, pool);
    bump_persistent(env, &key);
}

/// Appends a new pool and indexes it by stake token. Returns its id.
pub fn push_pool(env: &Env, pool: &PoolInfo) -> u32 {
    let pool_id = pool_count(env);
    set_pool(env, pool_id, pool);

    let token_key = DataKey::PoolByToken(pool.stake_token.clone());
    env.storage().persistent().set(&token_key, &pool_id);
    bump_persistent(env, &token_key);

    env.storage()
        .instance()
        .set(&DataKey::PoolCount, &(pool_id + 1));
    pool_id
}

pub fn pool_id_for_token(env: &Env, stake_token: &Address) -> Option<u32> {
    env.storage()
        .persistent()
        .get(&DataKey::PoolByToken(stake_token.clone()))
}

// Positions
pub fn get_position(env: &Env, pool_id: u32, user: &Address) -> UserPosition {
    env.storage()
        .persistent()
        .get(&DataKey::Position(pool_id, user.clone()))
        .unwrap_or_default()
}

pub fn set_position(env: &Env, pool_id: u32, user: &Address, position: &UserPosition) {
    let key = DataKey::Position(pool_id, user.clone());
    env.storage().persistent().set(&key, position);
    bump_persistent(env, &key);
}

// Global totals
pub fn total_alloc_point(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::TotalAllocPoint)
        .unwrap_or(0)
}

pub fn set_total_alloc_point(env: &Env, total: u32) {
    env.storage().instance().set(&DataKey::TotalAllocPoint, &total);
}

pub fn total_locked_up(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalLockedUp)
        .unwrap_or(0)
}

pub fn set_total_locked_up(env: &Env, total: i128) {
    env.storage().instance().set(&DataKey::TotalLockedUp, &total);
}

// Referral table
pub fn get_referral_table(env: &Env) -> ReferralTable {
    env.storage()
        .instance()
        .get(&DataKey::ReferralTable)
        .unwrap_or_else(|| default_referral_table(env))
}

pub fn set_referral_table(env: &Env, table: &ReferralTable) {
    env.storage().instance().set(&DataKey::ReferralTable, table);
}

/// 60/30/10 split over three levels, full bonus from the first referee.
pub fn default_referral_table(env: &Env) -> ReferralTable {
    ReferralTable {
        level_rates: vec![env, 6000u32, 3000u32, 1000u32],
        bonus_thresholds: vec![env, 1u32],
        bonus_rates: vec![env, 10000u32],
    }
}

/// Runs `f` with the in-progress flag held. A nested call into any guarded
/// entry point fails with `Reentrancy`.
pub fn non_reentrant<T>(
    env: &Env,
    f: impl FnOnce() -> Result<T, FarmError>,
) -> Result<T, FarmError> {
    if env.storage().instance().has(&DataKey::Entered) {
        return Err(FarmError::Reentrancy);
    }
    env.storage().instance().set(&DataKey::Entered, &true);
    let result = f()?;
    env.storage().instance().remove(&DataKey::Entered);
    Ok(result)
}

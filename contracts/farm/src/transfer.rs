use soroban_sdk::{token, Address, Env};

use crate::{storage, FarmConfig, FarmError};

/// Mint freshly emitted reward tokens. The farm is the reward token admin.
pub fn mint_reward(env: &Env, config: &FarmConfig, to: &Address, amount: i128) {
    if amount > 0 {
        token::StellarAssetClient::new(env, &config.reward_token).mint(to, &amount);
    }
}

/// Reward balance the farm may pay out: its reward-token balance minus any
/// reward tokens it holds as stake for a pool.
pub fn spendable_reward(env: &Env, config: &FarmConfig) -> Result<i128, FarmError> {
    let balance = token::Client::new(env, &config.reward_token)
        .balance(&env.current_contract_address());

    let staked = match storage::pool_id_for_token(env, &config.reward_token) {
        Some(pool_id) => storage::get_pool(env, pool_id)?.total_staked,
        None => 0,
    };

    Ok(balance.saturating_sub(staked).max(0))
}

/// Pay `amount` reward tokens, capped at the spendable balance. Returns what
/// was actually sent.
pub fn safe_reward_transfer(
    env: &Env,
    config: &FarmConfig,
    to: &Address,
    amount: i128,
) -> Result<i128, FarmError> {
    if amount <= 0 {
        return Ok(0);
    }

    let sent = amount.min(spendable_reward(env, config)?);
    if sent > 0 {
        token::Client::new(env, &config.reward_token).transfer(
            &env.current_contract_address(),
            to,
            &sent,
        );
    }
    Ok(sent)
}

/// Pull stake tokens from `from` into farm custody.
pub fn pull_stake(env: &Env, stake_token: &Address, from: &Address, amount: i128) {
    if amount > 0 {
        token::Client::new(env, stake_token).transfer(from, &env.current_contract_address(), &amount);
    }
}

/// Send stake tokens out of farm custody.
pub fn push_stake(env: &Env, stake_token: &Address, to: &Address, amount: i128) {
    if amount > 0 {
        token::Client::new(env, stake_token).transfer(&env.current_contract_address(), to, &amount);
    }
}

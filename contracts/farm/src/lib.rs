#![no_std]
#[cfg(test)]
extern crate std;

use soroban_sdk::{contract, contracterror, contractimpl, contracttype, log, Address, Env, Vec};
use yieldline_shared::{
    math, validate_basis_points, DEFAULT_INACTIVITY_WINDOW, MAX_DEPOSIT_FEE_BPS,
    MAX_EARLY_WITHDRAW_FEE_BPS, MAX_EARLY_WITHDRAW_WINDOW, MAX_HARVEST_INTERVAL,
    MAX_REFERRAL_DEPTH,
};

mod accrual;
mod events;
mod referral_policy;
mod settlement;
mod storage;
mod transfer;

/// Referral cut applied to harvested rewards until the admin changes it (10%).
pub const DEFAULT_REFERRAL_CUT_BPS: u32 = 1000;

// Data Types
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FarmConfig {
    pub admin: Address,
    pub reward_token: Address,
    pub referral_ledger: Address,
    pub dev_address: Address,
    pub fee_address: Address,
    pub reward_per_block: i128,
    pub bonus_multiplier: u32,
    pub start_block: u32,
    pub referral_enabled: bool,
    pub referral_cut_bps: u32, // Basis points of net harvested reward
    pub only_active_referrers: bool,
    pub inactivity_window: u64, // Seconds without a deposit before a referrer is inactive
}

/// Fee and timing parameters of a pool, as set by `add_pool` / `set_pool`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolParams {
    pub deposit_fee_bps: u32,
    pub harvest_interval: u64,
    pub early_withdraw_window: u64,
    pub early_withdraw_fee_bps: u32,
    pub harvest_fee_bps: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolInfo {
    pub stake_token: Address,
    pub alloc_point: u32,
    pub last_reward_block: u32,
    pub acc_reward_per_share: i128, // Scaled by ACC_REWARD_PRECISION
    pub total_staked: i128,
    pub deposit_fee_bps: u32,
    pub harvest_interval: u64,
    pub early_withdraw_window: u64,
    pub early_withdraw_fee_bps: u32,
    pub harvest_fee_bps: u32,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UserPosition {
    pub amount: i128,
    pub reward_debt: i128,
    pub reward_locked_up: i128,
    pub next_harvest_until: u64,
    pub last_deposit_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReferralTable {
    pub level_rates: Vec<u32>,      // Basis points per upline level, level 1 first
    pub bonus_thresholds: Vec<u32>, // Ascending direct-referee counts
    pub bonus_rates: Vec<u32>,      // Basis points applied from the matching threshold on
}

// Error Types
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum FarmError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    PoolNotFound = 4,
    PoolExists = 5,
    InvalidAmount = 6,
    InsufficientStake = 7,
    FeeTooHigh = 8,
    IntervalTooLong = 9,
    InvalidReferralTable = 10,
    InvalidConfiguration = 11,
    MathOverflow = 12,
    Reentrancy = 13,
}

#[contract]
pub struct FarmContract;

#[contractimpl]
impl FarmContract {
    /// Initialize the farm.
    ///
    /// The farm must be the admin of `reward_token` (it mints emissions) and a
    /// registered operator of `referral_ledger`.
    pub fn initialize(
        env: Env,
        admin: Address,
        reward_token: Address,
        referral_ledger: Address,
        dev_address: Address,
        fee_address: Address,
        reward_per_block: i128,
        start_block: u32,
    ) -> Result<(), FarmError> {
        if storage::has_config(&env) {
            return Err(FarmError::AlreadyInitialized);
        }

        admin.require_auth();

        if reward_per_block < 0 {
            return Err(FarmError::InvalidAmount);
        }

        let config = FarmConfig {
            admin: admin.clone(),
            reward_token,
            referral_ledger,
            dev_address,
            fee_address,
            reward_per_block,
            bonus_multiplier: 1,
            start_block,
            referral_enabled: true,
            referral_cut_bps: DEFAULT_REFERRAL_CUT_BPS,
            only_active_referrers: false,
            inactivity_window: DEFAULT_INACTIVITY_WINDOW,
        };

        storage::set_config(&env, &config);
        storage::set_total_alloc_point(&env, 0);
        storage::set_total_locked_up(&env, 0);
        storage::set_referral_table(&env, &storage::default_referral_table(&env));
        storage::bump_instance(&env);

        log!(&env, "Farm initialized by admin: {}, emitting {} per block", admin, reward_per_block);

        Ok(())
    }

    // ---------------------------------------------------------------------
    // Staking
    // ---------------------------------------------------------------------

    /// Stake `amount` of the pool's token, settling pending reward first.
    ///
    /// A zero `amount` only settles. `referrer` is recorded when referrals are
    /// enabled and the user has none yet; a refused link never fails the
    /// deposit.
    pub fn deposit(
        env: Env,
        user: Address,
        pool_id: u32,
        amount: i128,
        referrer: Option<Address>,
    ) -> Result<(), FarmError> {
        user.require_auth();

        if amount < 0 {
            return Err(FarmError::InvalidAmount);
        }

        let config = storage::get_config(&env)?;
        storage::bump_instance(&env);

        storage::non_reentrant(&env, || {
            Self::deposit_internal(&env, &config, &user, pool_id, amount, referrer)
        })
    }

    /// Unstake `amount`, settling pending reward first. Inside the pool's
    /// early-withdraw window (measured from the latest deposit) the
    /// early-withdraw fee is kept back.
    pub fn withdraw(env: Env, user: Address, pool_id: u32, amount: i128) -> Result<(), FarmError> {
        user.require_auth();

        if amount < 0 {
            return Err(FarmError::InvalidAmount);
        }

        let config = storage::get_config(&env)?;
        storage::bump_instance(&env);

        storage::non_reentrant(&env, || {
            Self::withdraw_internal(&env, &config, &user, pool_id, amount)
        })
    }

    /// Settle pending reward without changing the stake.
    pub fn harvest(env: Env, user: Address, pool_id: u32) -> Result<(), FarmError> {
        user.require_auth();

        let config = storage::get_config(&env)?;
        storage::bump_instance(&env);

        storage::non_reentrant(&env, || {
            Self::harvest_internal(&env, &config, &user, pool_id)
        })
    }

    /// Return the whole stake immediately, forfeiting pending and locked-up
    /// reward. No accrual, no payout.
    pub fn emergency_withdraw(env: Env, user: Address, pool_id: u32) -> Result<i128, FarmError> {
        user.require_auth();

        storage::get_config(&env)?;
        storage::bump_instance(&env);

        storage::non_reentrant(&env, || Self::emergency_withdraw_internal(&env, &user, pool_id))
    }

    /// Accrue a single pool.
    pub fn update_pool(env: Env, pool_id: u32) -> Result<PoolInfo, FarmError> {
        let config = storage::get_config(&env)?;
        storage::bump_instance(&env);
        accrual::update_pool(&env, &config, pool_id)
    }

    /// Accrue every pool. Cost is linear in the number of pools.
    pub fn mass_update_pools(env: Env) -> Result<(), FarmError> {
        let config = storage::get_config(&env)?;
        storage::bump_instance(&env);
        accrual::mass_update_pools(&env, &config)
    }

    // ---------------------------------------------------------------------
    // Pool administration
    // ---------------------------------------------------------------------

    /// Register a new pool. Each stake token may back one pool only.
    pub fn add_pool(
        env: Env,
        admin: Address,
        stake_token: Address,
        alloc_point: u32,
        params: PoolParams,
        with_update: bool,
    ) -> Result<u32, FarmError> {
        let config = Self::require_admin(&env, &admin)?;
        Self::validate_pool_params(&params)?;

        if storage::pool_id_for_token(&env, &stake_token).is_some() {
            return Err(FarmError::PoolExists);
        }

        if with_update {
            accrual::mass_update_pools(&env, &config)?;
        }

        let total_alloc_point = storage::total_alloc_point(&env)
            .checked_add(alloc_point)
            .ok_or(FarmError::MathOverflow)?;

        let pool = PoolInfo {
            stake_token: stake_token.clone(),
            alloc_point,
            last_reward_block: env.ledger().sequence().max(config.start_block),
            acc_reward_per_share: 0,
            total_staked: 0,
            deposit_fee_bps: params.deposit_fee_bps,
            harvest_interval: params.harvest_interval,
            early_withdraw_window: params.early_withdraw_window,
            early_withdraw_fee_bps: params.early_withdraw_fee_bps,
            harvest_fee_bps: params.harvest_fee_bps,
        };

        let pool_id = storage::push_pool(&env, &pool);
        storage::set_total_alloc_point(&env, total_alloc_point);

        events::pool_added(&env, pool_id, stake_token.clone(), alloc_point, params);

        log!(&env, "Pool {} added for token {} with {} alloc points", pool_id, stake_token, alloc_point);

        Ok(pool_id)
    }

    /// Re-weight a pool and replace its fee and timing parameters.
    pub fn set_pool(
        env: Env,
        admin: Address,
        pool_id: u32,
        alloc_point: u32,
        params: PoolParams,
        with_update: bool,
    ) -> Result<(), FarmError> {
        let config = Self::require_admin(&env, &admin)?;
        Self::validate_pool_params(&params)?;
        storage::get_pool(&env, pool_id)?;

        if with_update {
            accrual::mass_update_pools(&env, &config)?;
        }

        let mut pool = storage::get_pool(&env, pool_id)?;
        let total_alloc_point = storage::total_alloc_point(&env)
            .checked_sub(pool.alloc_point)
            .and_then(|total| total.checked_add(alloc_point))
            .ok_or(FarmError::MathOverflow)?;

        pool.alloc_point = alloc_point;
        pool.deposit_fee_bps = params.deposit_fee_bps;
        pool.harvest_interval = params.harvest_interval;
        pool.early_withdraw_window = params.early_withdraw_window;
        pool.early_withdraw_fee_bps = params.early_withdraw_fee_bps;
        pool.harvest_fee_bps = params.harvest_fee_bps;

        storage::set_pool(&env, pool_id, &pool);
        storage::set_total_alloc_point(&env, total_alloc_point);

        events::pool_updated(&env, pool_id, pool.stake_token.clone(), alloc_point, params);

        log!(&env, "Pool {} updated to {} alloc points", pool_id, alloc_point);

        Ok(())
    }

    /// Change the emission per block. Every pool is accrued at the old rate first.
    pub fn update_emission_rate(
        env: Env,
        admin: Address,
        reward_per_block: i128,
    ) -> Result<(), FarmError> {
        let mut config = Self::require_admin(&env, &admin)?;

        if reward_per_block < 0 {
            return Err(FarmError::InvalidAmount);
        }

        accrual::mass_update_pools(&env, &config)?;

        let previous = config.reward_per_block;
        config.reward_per_block = reward_per_block;
        storage::set_config(&env, &config);

        events::emission_rate_updated(&env, admin, previous, reward_per_block);

        log!(&env, "Emission rate updated from {} to {}", previous, reward_per_block);

        Ok(())
    }

    /// Change the bonus multiplier applied to elapsed blocks. Every pool is
    /// accrued at the old multiplier first. Emission is paused through the
    /// emission rate, so a zero multiplier is rejected.
    pub fn update_multiplier(env: Env, admin: Address, multiplier: u32) -> Result<(), FarmError> {
        let mut config = Self::require_admin(&env, &admin)?;

        if multiplier == 0 {
            return Err(FarmError::InvalidConfiguration);
        }

        accrual::mass_update_pools(&env, &config)?;

        config.bonus_multiplier = multiplier;
        storage::set_config(&env, &config);

        log!(&env, "Bonus multiplier set to: {}", multiplier);

        Ok(())
    }

    // ---------------------------------------------------------------------
    // Self-administered addresses
    // ---------------------------------------------------------------------

    /// Hand the dev role to `new_dev`. Only the current dev may call this.
    pub fn set_dev_address(env: Env, dev: Address, new_dev: Address) -> Result<(), FarmError> {
        dev.require_auth();

        let mut config = storage::get_config(&env)?;
        if config.dev_address != dev {
            return Err(FarmError::Unauthorized);
        }

        config.dev_address = new_dev.clone();
        storage::set_config(&env, &config);

        events::dev_address_updated(&env, dev, new_dev);

        Ok(())
    }

    /// Hand the fee account to `new_fee_address`. Only the current fee
    /// account may call this.
    pub fn set_fee_address(
        env: Env,
        fee_address: Address,
        new_fee_address: Address,
    ) -> Result<(), FarmError> {
        fee_address.require_auth();

        let mut config = storage::get_config(&env)?;
        if config.fee_address != fee_address {
            return Err(FarmError::Unauthorized);
        }

        config.fee_address = new_fee_address.clone();
        storage::set_config(&env, &config);

        events::fee_address_updated(&env, fee_address, new_fee_address);

        Ok(())
    }

    pub fn transfer_admin(env: Env, admin: Address, new_admin: Address) -> Result<(), FarmError> {
        let mut config = Self::require_admin(&env, &admin)?;

        config.admin = new_admin.clone();
        storage::set_config(&env, &config);

        log!(&env, "Farm admin transferred to: {}", new_admin);

        Ok(())
    }

    // ---------------------------------------------------------------------
    // Referral administration
    // ---------------------------------------------------------------------

    pub fn set_referral_enabled(env: Env, admin: Address, enabled: bool) -> Result<(), FarmError> {
        let mut config = Self::require_admin(&env, &admin)?;

        config.referral_enabled = enabled;
        storage::set_config(&env, &config);

        events::referral_config_updated(
            &env,
            config.referral_enabled,
            config.referral_cut_bps,
            config.only_active_referrers,
        );

        Ok(())
    }

    /// Replace the per-level rates and the referee-count bonus steps.
    pub fn set_referral_table(
        env: Env,
        admin: Address,
        table: ReferralTable,
    ) -> Result<(), FarmError> {
        Self::require_admin(&env, &admin)?;
        referral_policy::validate_table(&table)?;

        storage::set_referral_table(&env, &table);

        log!(&env, "Referral table updated with {} levels", table.level_rates.len());

        Ok(())
    }

    pub fn set_referral_cut(env: Env, admin: Address, cut_bps: u32) -> Result<(), FarmError> {
        let mut config = Self::require_admin(&env, &admin)?;

        if !validate_basis_points(cut_bps) {
            return Err(FarmError::FeeTooHigh);
        }

        config.referral_cut_bps = cut_bps;
        storage::set_config(&env, &config);

        events::referral_config_updated(
            &env,
            config.referral_enabled,
            config.referral_cut_bps,
            config.only_active_referrers,
        );

        Ok(())
    }

    /// With `only_active` set, referrers that have not deposited within the
    /// inactivity window earn nothing for their level.
    pub fn set_only_active_referrers(
        env: Env,
        admin: Address,
        only_active: bool,
    ) -> Result<(), FarmError> {
        let mut config = Self::require_admin(&env, &admin)?;

        config.only_active_referrers = only_active;
        storage::set_config(&env, &config);

        events::referral_config_updated(
            &env,
            config.referral_enabled,
            config.referral_cut_bps,
            config.only_active_referrers,
        );

        Ok(())
    }

    pub fn set_inactivity_window(env: Env, admin: Address, seconds: u64) -> Result<(), FarmError> {
        let mut config = Self::require_admin(&env, &admin)?;

        config.inactivity_window = seconds;
        storage::set_config(&env, &config);

        log!(&env, "Referrer inactivity window set to {} seconds", seconds);

        Ok(())
    }

    // ---------------------------------------------------------------------
    // Views
    // ---------------------------------------------------------------------

    /// Reward `user` would receive if `pool_id` were accrued and settled now,
    /// including reward already locked up.
    pub fn pending_reward(env: Env, pool_id: u32, user: Address) -> Result<i128, FarmError> {
        let config = storage::get_config(&env)?;
        let pool = storage::get_pool(&env, pool_id)?;
        let (projected, _) = accrual::project(
            &config,
            &pool,
            storage::total_alloc_point(&env),
            env.ledger().sequence(),
        )?;

        let position = storage::get_position(&env, pool_id, &user);
        math::pending(
            position.amount,
            projected.acc_reward_per_share,
            position.reward_debt,
        )
        .and_then(|pending| pending.checked_add(position.reward_locked_up))
        .ok_or(FarmError::MathOverflow)
    }

    /// Whether the harvest gate of `user` in `pool_id` is open.
    pub fn can_harvest(env: Env, pool_id: u32, user: Address) -> Result<bool, FarmError> {
        storage::get_pool(&env, pool_id)?;
        let position = storage::get_position(&env, pool_id, &user);
        Ok(env.ledger().timestamp() >= position.next_harvest_until)
    }

    pub fn is_referrer_active(env: Env, account: Address) -> Result<bool, FarmError> {
        let config = storage::get_config(&env)?;
        Ok(referral_policy::is_referrer_active(&env, &config, &account))
    }

    pub fn get_multiplier(env: Env, from: u32, to: u32) -> Result<i128, FarmError> {
        let config = storage::get_config(&env)?;
        Ok(accrual::multiplier(&config, from, to))
    }

    pub fn get_config(env: Env) -> Result<FarmConfig, FarmError> {
        storage::get_config(&env)
    }

    pub fn get_pool(env: Env, pool_id: u32) -> Result<PoolInfo, FarmError> {
        storage::get_pool(&env, pool_id)
    }

    pub fn get_pool_id(env: Env, stake_token: Address) -> Option<u32> {
        storage::pool_id_for_token(&env, &stake_token)
    }

    pub fn pool_length(env: Env) -> u32 {
        storage::pool_count(&env)
    }

    pub fn get_position(env: Env, pool_id: u32, user: Address) -> UserPosition {
        storage::get_position(&env, pool_id, &user)
    }

    pub fn total_alloc_point(env: Env) -> u32 {
        storage::total_alloc_point(&env)
    }

    pub fn total_locked_up(env: Env) -> i128 {
        storage::total_locked_up(&env)
    }

    pub fn get_referral_table(env: Env) -> ReferralTable {
        storage::get_referral_table(&env)
    }

    // Internal helper functions
    fn require_admin(env: &Env, admin: &Address) -> Result<FarmConfig, FarmError> {
        admin.require_auth();

        let config = storage::get_config(env)?;
        if config.admin != *admin {
            return Err(FarmError::Unauthorized);
        }
        storage::bump_instance(env);
        Ok(config)
    }

    fn validate_pool_params(params: &PoolParams) -> Result<(), FarmError> {
        if params.deposit_fee_bps > MAX_DEPOSIT_FEE_BPS
            || params.early_withdraw_fee_bps > MAX_EARLY_WITHDRAW_FEE_BPS
            || !validate_basis_points(params.harvest_fee_bps)
        {
            return Err(FarmError::FeeTooHigh);
        }

        if params.harvest_interval > MAX_HARVEST_INTERVAL
            || params.early_withdraw_window > MAX_EARLY_WITHDRAW_WINDOW
        {
            return Err(FarmError::IntervalTooLong);
        }

        Ok(())
    }

    fn deposit_internal(
        env: &Env,
        config: &FarmConfig,
        user: &Address,
        pool_id: u32,
        amount: i128,
        referrer: Option<Address>,
    ) -> Result<(), FarmError> {
        let mut pool = accrual::update_pool(env, config, pool_id)?;
        let mut position = storage::get_position(env, pool_id, user);
        let harvest = settlement::settle(env, pool_id, &pool, user, &mut position)?;

        let ledger = referral_policy::ledger(env, config);
        let operator = env.current_contract_address();

        if let Some(referrer) = referrer {
            if config.referral_enabled && !ledger.has_referrer(user) {
                // The ledger refuses self links and cycles with `false`; the
                // deposit goes ahead either way.
                ledger.add_referrer(&operator, user, &referrer, &MAX_REFERRAL_DEPTH);
            }
        }

        let mut deposit_fee = 0;
        if amount > 0 {
            let (fee, credited) =
                math::split_fee(amount, pool.deposit_fee_bps).ok_or(FarmError::MathOverflow)?;
            deposit_fee = fee;

            position.amount = position
                .amount
                .checked_add(credited)
                .ok_or(FarmError::MathOverflow)?;
            position.last_deposit_at = env.ledger().timestamp();
            pool.total_staked = pool
                .total_staked
                .checked_add(credited)
                .ok_or(FarmError::MathOverflow)?;
        }

        position.reward_debt = math::accrued(position.amount, pool.acc_reward_per_share)
            .ok_or(FarmError::MathOverflow)?;

        storage::set_position(env, pool_id, user, &position);
        storage::set_pool(env, pool_id, &pool);

        if amount > 0 {
            transfer::pull_stake(env, &pool.stake_token, user, amount);
            transfer::push_stake(env, &pool.stake_token, &config.fee_address, deposit_fee);
            ledger.set_last_active(&operator, user);
        }

        if let Some(harvest) = harvest {
            settlement::pay_harvest(env, config, pool_id, user, &harvest)?;
        }

        events::deposit(env, user.clone(), pool_id, amount);

        log!(env, "User {} deposited {} into pool {} (fee {})", user, amount, pool_id, deposit_fee);

        Ok(())
    }

    fn withdraw_internal(
        env: &Env,
        config: &FarmConfig,
        user: &Address,
        pool_id: u32,
        amount: i128,
    ) -> Result<(), FarmError> {
        storage::get_pool(env, pool_id)?;
        if storage::get_position(env, pool_id, user).amount < amount {
            return Err(FarmError::InsufficientStake);
        }

        let mut pool = accrual::update_pool(env, config, pool_id)?;
        let mut position = storage::get_position(env, pool_id, user);
        let harvest = settlement::settle(env, pool_id, &pool, user, &mut position)?;

        let mut fee = 0;
        let mut returned = 0;
        if amount > 0 {
            position.amount = position
                .amount
                .checked_sub(amount)
                .ok_or(FarmError::MathOverflow)?;
            pool.total_staked = pool
                .total_staked
                .checked_sub(amount)
                .ok_or(FarmError::MathOverflow)?;

            let window_ends = position
                .last_deposit_at
                .saturating_add(pool.early_withdraw_window);
            if env.ledger().timestamp() < window_ends {
                (fee, returned) = math::split_fee(amount, pool.early_withdraw_fee_bps)
                    .ok_or(FarmError::MathOverflow)?;
            } else {
                returned = amount;
            }
        }

        position.reward_debt = math::accrued(position.amount, pool.acc_reward_per_share)
            .ok_or(FarmError::MathOverflow)?;

        storage::set_position(env, pool_id, user, &position);
        storage::set_pool(env, pool_id, &pool);

        transfer::push_stake(env, &pool.stake_token, user, returned);
        transfer::push_stake(env, &pool.stake_token, &config.fee_address, fee);

        if let Some(harvest) = harvest {
            settlement::pay_harvest(env, config, pool_id, user, &harvest)?;
        }

        events::withdraw(env, user.clone(), pool_id, amount, fee);

        log!(env, "User {} withdrew {} from pool {} (fee {})", user, amount, pool_id, fee);

        Ok(())
    }

    fn harvest_internal(
        env: &Env,
        config: &FarmConfig,
        user: &Address,
        pool_id: u32,
    ) -> Result<(), FarmError> {
        let pool = accrual::update_pool(env, config, pool_id)?;
        let mut position = storage::get_position(env, pool_id, user);
        let harvest = settlement::settle(env, pool_id, &pool, user, &mut position)?;

        position.reward_debt = math::accrued(position.amount, pool.acc_reward_per_share)
            .ok_or(FarmError::MathOverflow)?;
        storage::set_position(env, pool_id, user, &position);

        if let Some(harvest) = harvest {
            settlement::pay_harvest(env, config, pool_id, user, &harvest)?;
        }

        Ok(())
    }

    fn emergency_withdraw_internal(
        env: &Env,
        user: &Address,
        pool_id: u32,
    ) -> Result<i128, FarmError> {
        let mut pool = storage::get_pool(env, pool_id)?;
        let position = storage::get_position(env, pool_id, user);
        let amount = position.amount;
        let forfeited = position.reward_locked_up;

        let total_locked_up = storage::total_locked_up(env)
            .checked_sub(forfeited)
            .ok_or(FarmError::MathOverflow)?;
        pool.total_staked = pool
            .total_staked
            .checked_sub(amount)
            .ok_or(FarmError::MathOverflow)?;

        let cleared = UserPosition {
            last_deposit_at: position.last_deposit_at,
            ..UserPosition::default()
        };

        storage::set_total_locked_up(env, total_locked_up);
        storage::set_position(env, pool_id, user, &cleared);
        storage::set_pool(env, pool_id, &pool);

        transfer::push_stake(env, &pool.stake_token, user, amount);

        events::emergency_withdraw(env, user.clone(), pool_id, amount, forfeited);

        log!(env, "User {} emergency-withdrew {} from pool {}, forfeiting {}", user, amount, pool_id, forfeited);

        Ok(amount)
    }
}

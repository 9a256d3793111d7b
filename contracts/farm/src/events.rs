use soroban_sdk::{contracttype, symbol_short, Address, Env};

use crate::PoolParams;

// Events
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositEvent {
    pub user: Address,
    pub pool_id: u32,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawEvent {
    pub user: Address,
    pub pool_id: u32,
    pub amount: i128,
    pub fee: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyWithdrawEvent {
    pub user: Address,
    pub pool_id: u32,
    pub amount: i128,
    pub forfeited: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardLockedUpEvent {
    pub user: Address,
    pub pool_id: u32,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HarvestEvent {
    pub user: Address,
    pub pool_id: u32,
    pub rewards: i128,
    pub fee: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmissionRateUpdatedEvent {
    pub caller: Address,
    pub previous: i128,
    pub new_rate: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfiguredEvent {
    pub pool_id: u32,
    pub stake_token: Address,
    pub alloc_point: u32,
    pub params: PoolParams,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReferralPaidEvent {
    pub referee: Address,
    pub referrer: Address,
    pub level: u32,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AddressUpdatedEvent {
    pub previous: Address,
    pub new_address: Address,
}

pub fn deposit(env: &Env, user: Address, pool_id: u32, amount: i128) {
    env.events().publish(
        (symbol_short!("deposit"),),
        DepositEvent {
            user,
            pool_id,
            amount,
        },
    );
}

pub fn withdraw(env: &Env, user: Address, pool_id: u32, amount: i128, fee: i128) {
    env.events().publish(
        (symbol_short!("withdraw"),),
        WithdrawEvent {
            user,
            pool_id,
            amount,
            fee,
        },
    );
}

pub fn emergency_withdraw(env: &Env, user: Address, pool_id: u32, amount: i128, forfeited: i128) {
    env.events().publish(
        (symbol_short!("emergency"),),
        EmergencyWithdrawEvent {
            user,
            pool_id,
            amount,
            forfeited,
        },
    );
}

pub fn reward_locked_up(env: &Env, user: Address, pool_id: u32, amount: i128) {
    env.events().publish(
        (symbol_short!("locked"),),
        RewardLockedUpEvent {
            user,
            pool_id,
            amount,
        },
    );
}

pub fn harvest(env: &Env, user: Address, pool_id: u32, rewards: i128, fee: i128) {
    env.events().publish(
        (symbol_short!("harvest"),),
        HarvestEvent {
            user,
            pool_id,
            rewards,
            fee,
        },
    );
}

pub fn emission_rate_updated(env: &Env, caller: Address, previous: i128, new_rate: i128) {
    env.events().publish(
        (symbol_short!("emission"),),
        EmissionRateUpdatedEvent {
            caller,
            previous,
            new_rate,
        },
    );
}

pub fn pool_added(env: &Env, pool_id: u32, stake_token: Address, alloc_point: u32, params: PoolParams) {
    env.events().publish(
        (symbol_short!("pool_add"),),
        PoolConfiguredEvent {
            pool_id,
            stake_token,
            alloc_point,
            params,
        },
    );
}

pub fn pool_updated(env: &Env, pool_id: u32, stake_token: Address, alloc_point: u32, params: PoolParams) {
    env.events().publish(
        (symbol_short!("pool_set"),),
        PoolConfiguredEvent {
            pool_id,
            stake_token,
            alloc_point,
            params,
        },
    );
}

pub fn referral_paid(env: &Env, referee: Address, referrer: Address, level: u32, amount: i128) {
    env.events().publish(
        (symbol_short!("ref_paid"),),
        ReferralPaidEvent {
            referee,
            referrer,
            level,
            amount,
        },
    );
}

pub fn dev_address_updated(env: &Env, previous: Address, new_address: Address) {
    env.events().publish(
        (symbol_short!("dev_addr"),),
        AddressUpdatedEvent {
            previous,
            new_address,
        },
    );
}

pub fn fee_address_updated(env: &Env, previous: Address, new_address: Address) {
    env.events().publish(
        (symbol_short!("fee_addr"),),
        AddressUpdatedEvent {
            previous,
            new_address,
        },
    );
}

pub fn referral_config_updated(env: &Env, enabled: bool, cut_bps: u32, only_active: bool) {
    env.events()
        .publish((symbol_short!("ref_cfg"),), (enabled, cut_bps, only_active));
}

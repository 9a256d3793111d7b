#![no_std]
#[cfg(test)]
extern crate std;

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, log, symbol_short, Address, Env,
    IntoVal, Symbol, Val, Vec,
};
use yieldline_shared::{
    ReferralAccount, INSTANCE_BUMP_AMOUNT, INSTANCE_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT,
    PERSISTENT_LIFETIME_THRESHOLD,
};

/// Hard cap on how far up the chain a cycle check may walk, whatever
/// `max_levels` the operator asks for.
pub const MAX_CYCLE_CHECK_DEPTH: u32 = 16;

/// Largest page `get_referees` returns.
pub const MAX_REFEREE_PAGE: u32 = 100;

// Data Types
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReferralConfig {
    pub admin: Address,
}

// Storage Keys
#[contracttype]
pub enum DataKey {
    Config,
    Operator(Address),
    Account(Address),
    Referee(Address, u32), // (referrer, link index)
}

// Error Types
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ReferralError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    NotOperator = 4,
    InvalidAmount = 5,
}

// Events
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReferralRegisteredEvent {
    pub referee: Address,
    pub referrer: Address,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReferralFailedEvent {
    pub referee: Address,
    pub referrer: Address,
    pub reason: Symbol,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardUpdatedEvent {
    pub account: Address,
    pub reward: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LastActiveUpdatedEvent {
    pub account: Address,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OperatorUpdatedEvent {
    pub operator: Address,
    pub enabled: bool,
}

#[contract]
pub struct ReferralContract;

#[contractimpl]
impl ReferralContract {
    /// Initialize the referral ledger. Operators are registered afterwards.
    pub fn initialize(env: Env, admin: Address) -> Result<(), ReferralError> {
        if env.storage().instance().has(&DataKey::Config) {
            return Err(ReferralError::AlreadyInitialized);
        }

        admin.require_auth();

        let config = ReferralConfig {
            admin: admin.clone(),
        };
        env.storage().instance().set(&DataKey::Config, &config);
        Self::bump_instance(&env);

        log!(&env, "Referral ledger initialized by admin: {}", admin);

        Ok(())
    }

    /// Grant or revoke write access for a contract (normally the farm).
    pub fn set_operator(
        env: Env,
        admin: Address,
        operator: Address,
        enabled: bool,
    ) -> Result<(), ReferralError> {
        Self::require_admin(&env, &admin)?;

        if enabled {
            env.storage()
                .instance()
                .set(&DataKey::Operator(operator.clone()), &true);
        } else {
            env.storage()
                .instance()
                .remove(&DataKey::Operator(operator.clone()));
        }

        env.events().publish(
            (symbol_short!("operator"),),
            OperatorUpdatedEvent {
                operator: operator.clone(),
                enabled,
            },
        );

        log!(&env, "Operator {} enabled: {}", operator, enabled);

        Ok(())
    }

    pub fn transfer_admin(
        env: Env,
        admin: Address,
        new_admin: Address,
    ) -> Result<(), ReferralError> {
        Self::require_admin(&env, &admin)?;

        let mut config = Self::get_config(env.clone())?;
        config.admin = new_admin.clone();
        env.storage().instance().set(&DataKey::Config, &config);

        log!(&env, "Referral ledger admin transferred to: {}", new_admin);

        Ok(())
    }

    /// Link `referee` to `referrer`.
    ///
    /// Refusals are not errors: the call returns `false` and publishes a
    /// `ref_fail` event so the operator's surrounding operation can proceed.
    /// A link is refused for self-referral, for an already linked referee,
    /// and when `referee` appears within `max_levels` of `referrer`'s upline.
    pub fn add_referrer(
        env: Env,
        operator: Address,
        referee: Address,
        referrer: Address,
        max_levels: u32,
    ) -> Result<bool, ReferralError> {
        Self::require_operator(&env, &operator)?;

        if referee == referrer {
            Self::publish_failed(&env, &referee, &referrer, symbol_short!("self"));
            return Ok(false);
        }

        let mut referee_account = Self::load_account(&env, &referee);
        if referee_account.referrer.is_some() {
            Self::publish_failed(&env, &referee, &referrer, symbol_short!("linked"));
            return Ok(false);
        }

        if Self::upline_contains(&env, &referrer, &referee, max_levels) {
            Self::publish_failed(&env, &referee, &referrer, symbol_short!("cycle"));
            return Ok(false);
        }

        let mut referrer_account = Self::load_account(&env, &referrer);
        let index = referrer_account.referred_count;
        referee_account.referrer = Some(referrer.clone());
        referrer_account.referred_count = index.saturating_add(1);

        Self::store_account(&env, &referee, &referee_account);
        Self::store_account(&env, &referrer, &referrer_account);
        Self::store_persistent(&env, &DataKey::Referee(referrer.clone(), index), &referee);

        env.events().publish(
            (symbol_short!("ref_reg"),),
            ReferralRegisteredEvent {
                referee: referee.clone(),
                referrer: referrer.clone(),
                timestamp: env.ledger().timestamp(),
            },
        );

        log!(&env, "Referral registered: {} referred by {}", referee, referrer);

        Ok(true)
    }

    /// Stamp `account` as active at the current ledger timestamp.
    pub fn set_last_active(
        env: Env,
        operator: Address,
        account: Address,
    ) -> Result<(), ReferralError> {
        Self::require_operator(&env, &operator)?;

        let now = env.ledger().timestamp();
        let mut referral_account = Self::load_account(&env, &account);
        referral_account.last_active = now;
        Self::store_account(&env, &account, &referral_account);

        env.events().publish(
            (symbol_short!("active"),),
            LastActiveUpdatedEvent {
                account,
                timestamp: now,
            },
        );

        Ok(())
    }

    /// Overwrite the cumulative commission recorded for `account`.
    pub fn set_reward(
        env: Env,
        operator: Address,
        account: Address,
        amount: i128,
    ) -> Result<(), ReferralError> {
        Self::require_operator(&env, &operator)?;

        if amount < 0 {
            return Err(ReferralError::InvalidAmount);
        }

        let mut referral_account = Self::load_account(&env, &account);
        referral_account.reward = amount;
        Self::store_account(&env, &account, &referral_account);

        env.events().publish(
            (symbol_short!("reward"),),
            RewardUpdatedEvent {
                account: account.clone(),
                reward: amount,
            },
        );

        log!(&env, "Referral reward of {} set to {}", account, amount);

        Ok(())
    }

    // Getter functions
    pub fn has_referrer(env: Env, account: Address) -> bool {
        Self::load_account(&env, &account).referrer.is_some()
    }

    pub fn get_referrer(env: Env, account: Address) -> Option<Address> {
        Self::load_account(&env, &account).referrer
    }

    /// Direct referees of `account` in link order, starting at link `start`.
    /// At most `limit` entries, capped at `MAX_REFEREE_PAGE`.
    pub fn get_referees(env: Env, account: Address, start: u32, limit: u32) -> Vec<Address> {
        let count = Self::load_account(&env, &account).referred_count;
        let end = start
            .saturating_add(limit.min(MAX_REFEREE_PAGE))
            .min(count);

        let mut page = Vec::new(&env);
        for index in start..end {
            if let Some(referee) = env
                .storage()
                .persistent()
                .get::<DataKey, Address>(&DataKey::Referee(account.clone(), index))
            {
                page.push_back(referee);
            }
        }
        page
    }

    /// Snapshot of `account`; accounts never touched read as all-zero.
    pub fn get_account(env: Env, account: Address) -> ReferralAccount {
        Self::load_account(&env, &account)
    }

    pub fn is_operator(env: Env, operator: Address) -> bool {
        env.storage()
            .instance()
            .has(&DataKey::Operator(operator))
    }

    pub fn get_config(env: Env) -> Result<ReferralConfig, ReferralError> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(ReferralError::NotInitialized)
    }

    // Internal helper functions
    fn require_admin(env: &Env, admin: &Address) -> Result<(), ReferralError> {
        admin.require_auth();

        let config = Self::get_config(env.clone())?;
        if config.admin != *admin {
            return Err(ReferralError::Unauthorized);
        }
        Self::bump_instance(env);
        Ok(())
    }

    fn require_operator(env: &Env, operator: &Address) -> Result<(), ReferralError> {
        if !env.storage().instance().has(&DataKey::Config) {
            return Err(ReferralError::NotInitialized);
        }

        operator.require_auth();

        if !env
            .storage()
            .instance()
            .has(&DataKey::Operator(operator.clone()))
        {
            return Err(ReferralError::NotOperator);
        }
        Self::bump_instance(env);
        Ok(())
    }

    /// Walks at most `max_levels` links up from `start` looking for `target`.
    fn upline_contains(env: &Env, start: &Address, target: &Address, max_levels: u32) -> bool {
        let mut cursor = Some(start.clone());
        for _ in 0..max_levels.min(MAX_CYCLE_CHECK_DEPTH) {
            match cursor {
                Some(current) => {
                    if current == *target {
                        return true;
                    }
                    cursor = Self::load_account(env, &current).referrer;
                }
                None => break,
            }
        }
        false
    }

    fn load_account(env: &Env, account: &Address) -> ReferralAccount {
        env.storage()
            .persistent()
            .get(&DataKey::Account(account.clone()))
            .unwrap_or_default()
    }

    fn store_account(env: &Env, account: &Address, referral_account: &ReferralAccount) {
        Self::store_persistent(env, &DataKey::Account(account.clone()), referral_account);
    }

    fn store_persistent<V: IntoVal<Env, Val>>(env: &Env, key: &DataKey, value: &V) {
        env.storage().persistent().set(key, value);
        env.storage().persistent().extend_ttl(
            key,
            PERSISTENT_LIFETIME_THRESHOLD,
            PERSISTENT_BUMP_AMOUNT,
        );
    }

    fn publish_failed(env: &Env, referee: &Address, referrer: &Address, reason: Symbol) {
        env.events().publish(
            (symbol_short!("ref_fail"),),
            ReferralFailedEvent {
                referee: referee.clone(),
                referrer: referrer.clone(),
                reason,
            },
        );

        log!(env, "Referral of {} by {} refused", referee, referrer);
    }

    fn bump_instance(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
    }
}

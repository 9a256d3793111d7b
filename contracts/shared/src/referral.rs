use soroban_sdk::{contractclient, Address, Env};

use crate::ReferralAccount;

/// Cross-contract surface of the referral ledger as seen by the farm.
///
/// Writers (`add_referrer`, `set_last_active`, `set_reward`) take the calling
/// operator explicitly; the ledger checks it against its operator set and
/// requires its authorization.
#[contractclient(name = "ReferralLedgerClient")]
pub trait ReferralLedgerInterface {
    fn has_referrer(env: Env, account: Address) -> bool;

    /// Links `referee` to `referrer`. Returns `false` (without failing) when
    /// the link is refused: self-referral, already linked, or a cycle within
    /// `max_levels`.
    fn add_referrer(
        env: Env,
        operator: Address,
        referee: Address,
        referrer: Address,
        max_levels: u32,
    ) -> bool;

    fn get_account(env: Env, account: Address) -> ReferralAccount;

    fn set_last_active(env: Env, operator: Address, account: Address);

    /// Overwrites the cumulative reward of `account`.
    fn set_reward(env: Env, operator: Address, account: Address, amount: i128);
}

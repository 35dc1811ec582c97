//! Interface of the unique-asset contracts that hold loan collateral.
//!
//! Any contract exposing these functions can back an offer. The lending
//! contract only pulls a token in with `transfer_from` and pays it out with
//! `transfer`; ownership checks and approvals are the asset contract's job.

use soroban_sdk::{contractclient, Address, Env};

#[contractclient(name = "CollateralClient")]
pub trait CollateralInterface {
    /// Current owner of `token_id`.
    fn owner_of(env: Env, token_id: u64) -> Address;

    /// Moves `token_id` out of `from`, which must authorize the call.
    fn transfer(env: Env, from: Address, to: Address, token_id: u64);

    /// Moves `token_id` out of `from` on behalf of `spender`. Fails unless
    /// `from` approved `spender` for this token or for all of its tokens.
    fn transfer_from(env: Env, spender: Address, from: Address, to: Address, token_id: u64);
}

//! Offer table and id counter.
//!
//! Offers live in persistent storage and are never removed; every read and
//! write extends their TTL so that resolved offers stay available as record.

use soroban_sdk::{symbol_short, Env, Symbol};

use crate::LoanOffer;

pub(crate) const DAY_IN_LEDGERS: u32 = 17_280;

pub(crate) const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub(crate) const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

pub(crate) const OFFER_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub(crate) const OFFER_LIFETIME_THRESHOLD: u32 = OFFER_BUMP_AMOUNT - DAY_IN_LEDGERS;

const NEXT_ID: Symbol = symbol_short!("next_id");
const OFFER: Symbol = symbol_short!("offer");

pub(crate) fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Id the next created offer will receive. Ids start at 1.
pub(crate) fn next_offer_id(env: &Env) -> u64 {
    env.storage().instance().get(&NEXT_ID).unwrap_or(1)
}

/// Reserves the next id and advances the counter.
pub(crate) fn take_offer_id(env: &Env) -> u64 {
    let id = next_offer_id(env);
    env.storage().instance().set(&NEXT_ID, &(id + 1));
    bump_instance(env);
    id
}

pub(crate) fn read_offer(env: &Env, id: u64) -> Option<LoanOffer> {
    let key = (OFFER, id);
    let offer: Option<LoanOffer> = env.storage().persistent().get(&key);
    if offer.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(&key, OFFER_LIFETIME_THRESHOLD, OFFER_BUMP_AMOUNT);
    }
    offer
}

pub(crate) fn write_offer(env: &Env, offer: &LoanOffer) {
    let key = (OFFER, offer.id);
    env.storage().persistent().set(&key, offer);
    env.storage()
        .persistent()
        .extend_ttl(&key, OFFER_LIFETIME_THRESHOLD, OFFER_BUMP_AMOUNT);
}

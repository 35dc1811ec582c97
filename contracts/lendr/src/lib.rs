//! Lendr: peer-to-peer NFT-collateralized lending.
//!
//! A loaner escrows a fungible-token loan for one designated loanee. The
//! loanee accepts by handing a unique token over as collateral and receives
//! the loan. Once the lend period has run out the loaner may claim the
//! collateral. An offer nobody accepted can be cancelled for a refund.
//!
//! Custody only ever moves inside a single invocation, so a failed token or
//! collateral transfer rolls back the whole transition.

#![no_std]

mod collateral;
mod storage;


pub use collateral::{CollateralClient, CollateralInterface};

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, token, Address, Env,
    Symbol,
};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Errors returned by the lending contract.
///
/// Codes start at 200. The Stellar Asset Contract reports its failures as
/// contract errors 1-13 and those reach the client unchanged through this
/// contract, so our own codes must never collide with a collaborator's.
#[contracterror]
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    /// No offer was ever created under the requested id.
    OfferNotFound = 200,
    /// Loan amount must be positive.
    InvalidAmount = 201,
    /// Lend duration must be nonzero.
    InvalidDuration = 202,
    /// Only the loanee can accept the offer.
    NotLoanee = 203,
    /// Only the creator can cancel the offer or claim its collateral.
    NotCreator = 204,
    /// You can only accept or cancel an open offer.
    OfferNotOpen = 205,
    /// You can only claim collateral on an accepted offer.
    OfferNotAccepted = 206,
    /// The offer was already cancelled or its collateral already claimed.
    OfferAlreadyResolved = 207,
    /// Cannot claim collateral before the lend period is over.
    LendPeriodNotOver = 208,
}

/// Lifecycle stage of a loan offer. Cancelled and Claimed are terminal.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OfferState {
    Open = 0,
    Accepted = 1,
    Cancelled = 2,
    Claimed = 3,
}

/// Terms submitted by a loaner when opening an offer.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CreateLendOfferRequest {
    /// The only account allowed to accept the offer.
    pub loanee: Address,
    /// Contract of the unique asset posted as collateral.
    pub collateral_address: Address,
    pub collateral_id: u64,
    /// Token contract the loan is denominated in.
    pub token_address: Address,
    pub num_tokens: i128,
    /// Seconds, counted from acceptance, before the collateral can be claimed.
    pub lend_duration: u64,
}

/// A loan offer and its escrow record.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoanOffer {
    pub id: u64,
    pub creator: Address,
    pub loanee: Address,
    pub collateral_address: Address,
    pub collateral_id: u64,
    pub token_address: Address,
    pub num_tokens: i128,
    pub lend_duration: u64,
    pub state: OfferState,
    pub accepted_at: Option<u64>,
}

impl LoanOffer {
    pub fn new(id: u64, creator: Address, request: CreateLendOfferRequest) -> Self {
        Self {
            id,
            creator,
            loanee: request.loanee,
            collateral_address: request.collateral_address,
            collateral_id: request.collateral_id,
            token_address: request.token_address,
            num_tokens: request.num_tokens,
            lend_duration: request.lend_duration,
            state: OfferState::Open,
            accepted_at: None,
        }
    }

    /// Timestamp from which the creator may claim the collateral.
    ///
    /// `None` until the offer is accepted, and also when the deadline does
    /// not fit in a `u64`, in which case the offer never becomes claimable.
    pub fn expires_at(&self) -> Option<u64> {
        self.accepted_at?.checked_add(self.lend_duration)
    }
}

/// Event symbols
const OFFER_CREATED: Symbol = symbol_short!("ofr_new");
const OFFER_ACCEPTED: Symbol = symbol_short!("ofr_acpt");
const OFFER_CANCELLED: Symbol = symbol_short!("ofr_cncl");
const COLLATERAL_CLAIMED: Symbol = symbol_short!("ofr_clmd");

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

#[contract]
pub struct Lendr;

#[contractimpl]
impl Lendr {
    /// Open a loan offer and escrow the loan amount.
    ///
    /// Pulls `request.num_tokens` of `request.token_address` from `creator`
    /// into this contract, so `creator` must have approved the contract for
    /// at least that amount beforehand.
    ///
    /// # Arguments
    /// * `creator` - The loaner (must authorize)
    /// * `request` - Loanee, collateral and loan terms
    ///
    /// # Returns
    /// The sequential id of the new offer
    pub fn create_offer(
        env: Env,
        creator: Address,
        request: CreateLendOfferRequest,
    ) -> Result<u64, ContractError> {
        creator.require_auth();

        if request.num_tokens <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        if request.lend_duration == 0 {
            return Err(ContractError::InvalidDuration);
        }

        let offer_id = storage::take_offer_id(&env);
        let offer = LoanOffer::new(offer_id, creator.clone(), request);
        storage::write_offer(&env, &offer);

        let token_client = token::Client::new(&env, &offer.token_address);
        let this = env.current_contract_address();
        token_client.transfer_from(&this, &creator, &this, &offer.num_tokens);

        env.events().publish(
            (OFFER_CREATED, offer_id),
            (creator, offer.loanee, offer.num_tokens),
        );

        Ok(offer_id)
    }

    /// Accept an open offer as its designated loanee.
    ///
    /// The collateral is pulled from `loanee` before the loan is paid out, so
    /// the contract never releases funds it has not secured. `loanee` must
    /// have approved this contract on the collateral contract.
    pub fn accept_offer(env: Env, loanee: Address, offer_id: u64) -> Result<(), ContractError> {
        loanee.require_auth();

        let mut offer = Self::load(&env, offer_id)?;

        if offer.state != OfferState::Open {
            return Err(ContractError::OfferNotOpen);
        }
        if offer.loanee != loanee {
            return Err(ContractError::NotLoanee);
        }

        let now = env.ledger().timestamp();
        offer.state = OfferState::Accepted;
        offer.accepted_at = Some(now);
        storage::write_offer(&env, &offer);

        let this = env.current_contract_address();

        let collateral_client = CollateralClient::new(&env, &offer.collateral_address);
        collateral_client.transfer_from(&this, &loanee, &this, &offer.collateral_id);

        let token_client = token::Client::new(&env, &offer.token_address);
        token_client.transfer(&this, &loanee, &offer.num_tokens);

        env.events()
            .publish((OFFER_ACCEPTED, offer_id), (loanee, now));

        Ok(())
    }

    /// Cancel an offer that was never accepted and refund the escrowed loan.
    pub fn cancel_offer(env: Env, creator: Address, offer_id: u64) -> Result<(), ContractError> {
        creator.require_auth();

        let mut offer = Self::load(&env, offer_id)?;

        if offer.state != OfferState::Open {
            return Err(ContractError::OfferNotOpen);
        }
        if offer.creator != creator {
            return Err(ContractError::NotCreator);
        }

        offer.state = OfferState::Cancelled;
        storage::write_offer(&env, &offer);

        let token_client = token::Client::new(&env, &offer.token_address);
        token_client.transfer(&env.current_contract_address(), &creator, &offer.num_tokens);

        env.events()
            .publish((OFFER_CANCELLED, offer_id), (creator,));

        Ok(())
    }

    /// Take the collateral of an accepted offer once its lend period is over.
    ///
    /// There is no repayment path: after acceptance the collateral goes to the
    /// creator at `accepted_at + lend_duration` at the earliest.
    pub fn claim_collateral(
        env: Env,
        creator: Address,
        offer_id: u64,
    ) -> Result<(), ContractError> {
        creator.require_auth();

        let mut offer = Self::load(&env, offer_id)?;

        match offer.state {
            OfferState::Accepted => {}
            OfferState::Open => return Err(ContractError::OfferNotAccepted),
            OfferState::Cancelled | OfferState::Claimed => {
                return Err(ContractError::OfferAlreadyResolved)
            }
        }
        if offer.creator != creator {
            return Err(ContractError::NotCreator);
        }

        let now = env.ledger().timestamp();
        match offer.expires_at() {
            Some(expiry) if now >= expiry => {}
            _ => return Err(ContractError::LendPeriodNotOver),
        }

        offer.state = OfferState::Claimed;
        storage::write_offer(&env, &offer);

        let collateral_client = CollateralClient::new(&env, &offer.collateral_address);
        collateral_client.transfer(
            &env.current_contract_address(),
            &creator,
            &offer.collateral_id,
        );

        env.events().publish(
            (COLLATERAL_CLAIMED, offer_id),
            (creator, offer.collateral_id),
        );

        Ok(())
    }

    /// Get offer details.
    pub fn lend_offers(env: Env, offer_id: u64) -> Result<LoanOffer, ContractError> {
        Self::load(&env, offer_id)
    }

    /// Number of offers created so far, which is also the highest id in use.
    pub fn offer_count(env: Env) -> u64 {
        storage::next_offer_id(&env) - 1
    }
}

impl Lendr {
    fn load(env: &Env, offer_id: u64) -> Result<LoanOffer, ContractError> {
        storage::read_offer(env, offer_id).ok_or(ContractError::OfferNotFound)
    }
}

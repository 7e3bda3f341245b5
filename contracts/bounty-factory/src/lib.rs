#![no_std]
//! # Bounty Factory
//!
//! Creates one funded [`BountyEscrow`] per bug bounty and drives it through
//! submission, adjudication and payout.
//!
//! ## Lifecycle
//!
//! 1. `create_bounty` moves the reward from the creator into the factory and
//!    opens an escrow under a fresh `u64` id. Both happen in one transaction:
//!    an escrow without its funding can never be observed.
//! 2. Hunters `submit_bug` a content pointer while the deadline has not
//!    passed.
//! 3. The owner approves exactly one submission (paying out the whole reward)
//!    or rejects submissions with feedback.
//! 4. An escrow that reaches its deadline without an approval can be refunded
//!    to its owner once every submission has been adjudicated.
//!
//! ## Fund safety
//!
//! All rewards sit in the factory's token balance; each escrow only accounts
//! for its own `locked_reward`, and `TotalLocked` tracks the sum over escrows
//! that are still open. Entry points that move funds hold the reentrancy
//! guard and persist every state change before calling the token contract.
//! The custody invariant (balance >= `TotalLocked`) is asserted after each
//! transfer.

mod escrow;
mod events;
mod invariants;
mod reentrancy_guard;
mod storage;

#[cfg(test)]
mod failing_token;
#[cfg(test)]
mod test_refund;

pub use escrow::{BountyEscrow, EscrowStatus, Submission, SubmissionRef, SubmissionStatus};
pub use events::{
    BountyCreated, BountyRefunded, FactoryInitialized, SubmissionApproved, SubmissionCreated,
    SubmissionRejected, EVENT_VERSION,
};

use events::{
    emit_bounty_created, emit_bounty_refunded, emit_factory_initialized, emit_submission_approved,
    emit_submission_created, emit_submission_rejected,
};
use soroban_sdk::{contract, contracterror, contractimpl, token, Address, Env, String, Vec};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    ZeroReward = 4,
    /// Deadline is not strictly in the future.
    InvalidDeadline = 5,
    BountyNotFound = 6,
    IndexOutOfRange = 7,
    NotPending = 8,
    AlreadySettled = 9,
    AlreadyRefunded = 10,
    PastDeadline = 11,
    DeadlineNotPassed = 12,
    /// Refund blocked until the owner adjudicates every submission.
    PendingSubmissions = 13,
    EmptyContentPointer = 14,
    /// The token contract rejected a transfer; the call was rolled back.
    TransferFailure = 15,
}

#[contract]
pub struct BountyFactoryContract;

#[contractimpl]
impl BountyFactoryContract {
    /// Configure the reward token. Call once.
    pub fn init(env: Env, token: Address) -> Result<(), Error> {
        if storage::has_token(&env) {
            return Err(Error::AlreadyInitialized);
        }
        storage::set_token(&env, &token);
        storage::bump_instance(&env);

        emit_factory_initialized(
            &env,
            FactoryInitialized {
                version: EVENT_VERSION,
                token,
                timestamp: env.ledger().timestamp(),
            },
        );
        Ok(())
    }

    /// Open a new bounty funded with `reward` tokens from `creator`.
    ///
    /// Returns the bounty id. The creator becomes the escrow owner and the
    /// only party allowed to approve, reject or refund.
    pub fn create_bounty(
        env: Env,
        creator: Address,
        title: String,
        description: String,
        deadline: u64,
        severity: String,
        reward: i128,
    ) -> Result<u64, Error> {
        reentrancy_guard::acquire(&env);
        creator.require_auth();

        let token = storage::token(&env)?;
        if reward <= 0 {
            return Err(Error::ZeroReward);
        }
        let now = env.ledger().timestamp();
        if deadline <= now {
            return Err(Error::InvalidDeadline);
        }

        // Effects
        let bounty_id = storage::next_bounty_id(&env);
        let escrow = BountyEscrow::new(
            creator.clone(),
            title,
            description,
            deadline,
            severity,
            reward,
            now,
        );
        invariants::assert_escrow(&escrow);
        storage::save_escrow(&env, bounty_id, &escrow);
        storage::push_owner_bounty(&env, &creator, bounty_id);
        storage::set_total_locked(&env, storage::total_locked(&env) + reward);
        storage::bump_instance(&env);

        // Interaction
        transfer(&env, &token, &creator, &env.current_contract_address(), reward)?;
        invariants::assert_custody(&env);

        emit_bounty_created(
            &env,
            BountyCreated {
                version: EVENT_VERSION,
                bounty_id,
                creator,
                reward,
                deadline,
                timestamp: now,
            },
        );

        reentrancy_guard::release(&env);
        Ok(bounty_id)
    }

    /// Every bounty id in creation order.
    pub fn get_bounties(env: Env) -> Vec<u64> {
        storage::bounty_ids(&env)
    }

    pub fn get_bounty_count(env: Env) -> u64 {
        storage::bounty_count(&env)
    }

    pub fn get_bounty(env: Env, bounty_id: u64) -> Result<BountyEscrow, Error> {
        storage::load_escrow(&env, bounty_id)
    }

    pub fn get_bounties_by_owner(env: Env, owner: Address) -> Vec<u64> {
        storage::owner_bounties(&env, &owner)
    }

    /// Submit a proof-of-work pointer against an open bounty. Returns the
    /// submission's index within the bounty.
    pub fn submit_bug(
        env: Env,
        bounty_id: u64,
        hunter: Address,
        content_pointer: String,
    ) -> Result<u32, Error> {
        hunter.require_auth();

        let mut escrow = storage::load_escrow(&env, bounty_id)?;
        let now = env.ledger().timestamp();
        let (index, submission) = escrow.submit(hunter.clone(), content_pointer, now)?;

        invariants::assert_escrow(&escrow);
        storage::save_submission(&env, bounty_id, index, &submission);
        storage::save_escrow(&env, bounty_id, &escrow);
        storage::push_hunter_submission(&env, &hunter, SubmissionRef { bounty_id, index });
        storage::bump_instance(&env);

        emit_submission_created(
            &env,
            SubmissionCreated {
                version: EVENT_VERSION,
                bounty_id,
                index,
                hunter,
                content_pointer: submission.content_pointer,
                timestamp: now,
            },
        );
        Ok(index)
    }

    /// Approve submission `index` and pay the full reward to its hunter.
    ///
    /// Settles the escrow: no further approval, rejection, submission or
    /// refund is possible afterwards.
    pub fn approve_submission(
        env: Env,
        bounty_id: u64,
        caller: Address,
        index: u32,
    ) -> Result<(), Error> {
        reentrancy_guard::acquire(&env);
        caller.require_auth();

        let token = storage::token(&env)?;
        let mut escrow = storage::load_escrow(&env, bounty_id)?;
        escrow.ensure_owner(&caller)?;
        escrow.ensure_open()?;
        escrow.ensure_index(index)?;
        let mut submission = storage::load_submission(&env, bounty_id, index)?;

        // Effects
        let amount = escrow.settle(index, &mut submission)?;
        invariants::assert_escrow(&escrow);
        storage::save_submission(&env, bounty_id, index, &submission);
        storage::save_escrow(&env, bounty_id, &escrow);
        storage::set_total_locked(&env, storage::total_locked(&env) - amount);
        storage::bump_instance(&env);

        // Interaction
        transfer(
            &env,
            &token,
            &env.current_contract_address(),
            &submission.hunter,
            amount,
        )?;
        invariants::assert_custody(&env);

        emit_submission_approved(
            &env,
            SubmissionApproved {
                version: EVENT_VERSION,
                bounty_id,
                index,
                hunter: submission.hunter,
                amount,
                timestamp: env.ledger().timestamp(),
            },
        );

        reentrancy_guard::release(&env);
        Ok(())
    }

    /// Reject submission `index`, storing the owner's feedback verbatim.
    /// Moves no funds.
    pub fn reject_submission(
        env: Env,
        bounty_id: u64,
        caller: Address,
        index: u32,
        feedback: String,
    ) -> Result<(), Error> {
        caller.require_auth();

        let mut escrow = storage::load_escrow(&env, bounty_id)?;
        escrow.ensure_owner(&caller)?;
        escrow.ensure_open()?;
        escrow.ensure_index(index)?;
        let mut submission = storage::load_submission(&env, bounty_id, index)?;

        escrow.reject(index, &mut submission, feedback.clone())?;
        invariants::assert_escrow(&escrow);
        storage::save_submission(&env, bounty_id, index, &submission);
        storage::save_escrow(&env, bounty_id, &escrow);
        storage::bump_instance(&env);

        emit_submission_rejected(
            &env,
            SubmissionRejected {
                version: EVENT_VERSION,
                bounty_id,
                index,
                feedback,
                timestamp: env.ledger().timestamp(),
            },
        );
        Ok(())
    }

    /// Return the reward of an expired, unsettled bounty to its owner.
    ///
    /// Only after the deadline, and only once no submission is pending.
    pub fn refund(env: Env, bounty_id: u64, caller: Address) -> Result<(), Error> {
        reentrancy_guard::acquire(&env);
        caller.require_auth();

        let token = storage::token(&env)?;
        let mut escrow = storage::load_escrow(&env, bounty_id)?;
        escrow.ensure_owner(&caller)?;

        // Effects
        let amount = escrow.expire(env.ledger().timestamp())?;
        invariants::assert_escrow(&escrow);
        storage::save_escrow(&env, bounty_id, &escrow);
        storage::set_total_locked(&env, storage::total_locked(&env) - amount);
        storage::bump_instance(&env);

        // Interaction
        transfer(&env, &token, &env.current_contract_address(), &caller, amount)?;
        invariants::assert_custody(&env);

        emit_bounty_refunded(
            &env,
            BountyRefunded {
                version: EVENT_VERSION,
                bounty_id,
                owner: caller,
                amount,
                timestamp: env.ledger().timestamp(),
            },
        );

        reentrancy_guard::release(&env);
        Ok(())
    }

    /// All submissions of a bounty in index order.
    pub fn get_submissions(env: Env, bounty_id: u64) -> Result<Vec<Submission>, Error> {
        let escrow = storage::load_escrow(&env, bounty_id)?;
        Ok(storage::submissions(&env, bounty_id, escrow.submission_count))
    }

    pub fn get_submission(env: Env, bounty_id: u64, index: u32) -> Result<Submission, Error> {
        let escrow = storage::load_escrow(&env, bounty_id)?;
        escrow.ensure_index(index)?;
        storage::load_submission(&env, bounty_id, index)
    }

    /// Every submission `hunter` made, across all bounties.
    pub fn get_submissions_by_hunter(env: Env, hunter: Address) -> Vec<SubmissionRef> {
        storage::hunter_submissions(&env, &hunter)
    }

    /// Token balance held by the factory on behalf of all escrows.
    pub fn get_balance(env: Env) -> Result<i128, Error> {
        let token = storage::token(&env)?;
        Ok(token::Client::new(&env, &token).balance(&env.current_contract_address()))
    }

    /// Sum of rewards held by escrows that are still open.
    pub fn get_total_locked(env: Env) -> i128 {
        storage::total_locked(&env)
    }

    /// Check a bounty's escrow and submissions for consistency. `false` for
    /// unknown ids.
    pub fn verify_bounty_state(env: Env, bounty_id: u64) -> bool {
        match storage::load_escrow(&env, bounty_id) {
            Ok(escrow) => {
                let submissions = storage::submissions(&env, bounty_id, escrow.submission_count);
                invariants::verify_escrow_invariants(&escrow, &submissions)
            }
            Err(_) => false,
        }
    }

    pub fn verify_custody(env: Env) -> bool {
        invariants::custody_holds(&env)
    }
}

fn transfer(
    env: &Env,
    token: &Address,
    from: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), Error> {
    match token::Client::new(env, token).try_transfer(from, to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(Error::TransferFailure),
    }
}

//! # Bounty Escrow
//!
//! One [`BountyEscrow`] per bounty. It custodies a fixed reward until the
//! owner adjudicates the submitted proofs-of-work.
//!
//! ```text
//!            submit (Pending) ──┐
//!                               ▼
//!   Open ──settle(index)──▶ Settled      one submission Approved, reward paid
//!     │
//!     └────expire (past deadline, nothing pending)──▶ Refunded
//! ```
//!
//! Each submission moves `Pending → Approved` or `Pending → Rejected` and
//! never back. Only the first approval can succeed: `settle` flips the escrow
//! to `Settled` before the caller moves any funds, so anything observing the
//! escrow during the payout already sees a terminal state.
//!
//! The transitions here are pure. The contract layer loads state, runs a
//! transition, persists the result and only then talks to the token.

use soroban_sdk::{contracttype, Address, String};

use crate::Error;

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EscrowStatus {
    /// Funds locked, submissions accepted until the deadline.
    Open,
    /// A submission was approved and paid. Terminal.
    Settled,
    /// The deadline passed without an approval and the owner took the
    /// reward back. Terminal.
    Refunded,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BountyEscrow {
    pub title: String,
    pub description: String,
    pub deadline: u64,
    pub severity: String,
    pub owner: Address,
    /// Reward deposited at creation. Held by the factory while `Open`.
    pub locked_reward: i128,
    pub status: EscrowStatus,
    pub submission_count: u32,
    pub pending_count: u32,
    pub approved_index: Option<u32>,
    pub created_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Submission {
    pub hunter: Address,
    /// Opaque pointer to off-chain proof-of-concept material (e.g. an IPFS CID).
    pub content_pointer: String,
    pub status: SubmissionStatus,
    pub feedback: Option<String>,
    pub submitted_at: u64,
}

/// Locates a submission across bounties.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubmissionRef {
    pub bounty_id: u64,
    pub index: u32,
}

impl BountyEscrow {
    pub fn new(
        owner: Address,
        title: String,
        description: String,
        deadline: u64,
        severity: String,
        locked_reward: i128,
        created_at: u64,
    ) -> Self {
        Self {
            title,
            description,
            deadline,
            severity,
            owner,
            locked_reward,
            status: EscrowStatus::Open,
            submission_count: 0,
            pending_count: 0,
            approved_index: None,
            created_at,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.status == EscrowStatus::Settled
    }

    /// Sticky terminal-state guard, checked before anything else on every
    /// mutating path.
    pub fn ensure_open(&self) -> Result<(), Error> {
        match self.status {
            EscrowStatus::Open => Ok(()),
            EscrowStatus::Settled => Err(Error::AlreadySettled),
            EscrowStatus::Refunded => Err(Error::AlreadyRefunded),
        }
    }

    pub fn ensure_owner(&self, caller: &Address) -> Result<(), Error> {
        if *caller != self.owner {
            return Err(Error::Unauthorized);
        }
        Ok(())
    }

    pub fn ensure_index(&self, index: u32) -> Result<(), Error> {
        if index >= self.submission_count {
            return Err(Error::IndexOutOfRange);
        }
        Ok(())
    }

    /// Appends a pending submission and returns it with its index.
    pub fn submit(
        &mut self,
        hunter: Address,
        content_pointer: String,
        now: u64,
    ) -> Result<(u32, Submission), Error> {
        self.ensure_open()?;
        if now > self.deadline {
            return Err(Error::PastDeadline);
        }
        if content_pointer.len() == 0 {
            return Err(Error::EmptyContentPointer);
        }

        let index = self.submission_count;
        self.submission_count += 1;
        self.pending_count += 1;

        Ok((
            index,
            Submission {
                hunter,
                content_pointer,
                status: SubmissionStatus::Pending,
                feedback: None,
                submitted_at: now,
            },
        ))
    }

    /// Approves `submission` (stored at `index`) and settles the escrow.
    /// Returns the amount now owed to the hunter.
    pub fn settle(&mut self, index: u32, submission: &mut Submission) -> Result<i128, Error> {
        self.ensure_open()?;
        self.ensure_index(index)?;
        ensure_pending(submission)?;

        submission.status = SubmissionStatus::Approved;
        self.status = EscrowStatus::Settled;
        self.approved_index = Some(index);
        self.pending_count -= 1;
        Ok(self.locked_reward)
    }

    /// Rejects `submission` (stored at `index`) with the owner's feedback.
    /// The escrow stays open.
    pub fn reject(
        &mut self,
        index: u32,
        submission: &mut Submission,
        feedback: String,
    ) -> Result<(), Error> {
        self.ensure_open()?;
        self.ensure_index(index)?;
        ensure_pending(submission)?;

        submission.status = SubmissionStatus::Rejected;
        submission.feedback = Some(feedback);
        self.pending_count -= 1;
        Ok(())
    }

    /// Closes an expired escrow that never paid out. Every submission must
    /// have been adjudicated first. Returns the amount owed back to the owner.
    pub fn expire(&mut self, now: u64) -> Result<i128, Error> {
        self.ensure_open()?;
        if now <= self.deadline {
            return Err(Error::DeadlineNotPassed);
        }
        if self.pending_count > 0 {
            return Err(Error::PendingSubmissions);
        }

        self.status = EscrowStatus::Refunded;
        Ok(self.locked_reward)
    }
}

fn ensure_pending(submission: &Submission) -> Result<(), Error> {
    if submission.status != SubmissionStatus::Pending {
        return Err(Error::NotPending);
    }
    Ok(())
}

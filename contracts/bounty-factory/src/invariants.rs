//! Escrow and custody invariants.
//!
//! `assert_*` run on every mutating path and panic, which aborts and rolls
//! back the transaction. `verify_*` are the same checks as booleans for the
//! public view functions.
//!
//! Per escrow:
//! - `locked_reward > 0`
//! - `pending_count <= submission_count`
//! - `Settled` if and only if `approved_index` is set, and the index is in range
//! - `Refunded` implies nothing is pending
//!
//! Per escrow, against its stored submissions:
//! - exactly `pending_count` submissions are `Pending`
//! - at most one submission is `Approved`, and only the one at `approved_index`
//!
//! Custody: the factory's token balance covers the sum of rewards held by
//! escrows that are still `Open`.

use soroban_sdk::{token, Env, Vec};

use crate::escrow::{BountyEscrow, EscrowStatus, Submission, SubmissionStatus};
use crate::storage;

fn escrow_is_sane(escrow: &BountyEscrow) -> bool {
    if escrow.locked_reward <= 0 {
        return false;
    }
    if escrow.pending_count > escrow.submission_count {
        return false;
    }
    match (escrow.status, escrow.approved_index) {
        (EscrowStatus::Settled, Some(index)) => index < escrow.submission_count,
        (EscrowStatus::Settled, None) => false,
        (_, Some(_)) => false,
        (EscrowStatus::Refunded, None) => escrow.pending_count == 0,
        (EscrowStatus::Open, None) => true,
    }
}

pub(crate) fn assert_escrow(escrow: &BountyEscrow) {
    if !escrow_is_sane(escrow) {
        panic!("Invariant violated: inconsistent escrow state");
    }
}

pub(crate) fn verify_escrow_invariants(escrow: &BountyEscrow, submissions: &Vec<Submission>) -> bool {
    if !escrow_is_sane(escrow) {
        return false;
    }
    if submissions.len() != escrow.submission_count {
        return false;
    }

    let mut pending = 0u32;
    for (index, submission) in submissions.iter().enumerate() {
        match submission.status {
            SubmissionStatus::Pending => pending += 1,
            SubmissionStatus::Approved => {
                if escrow.approved_index != Some(index as u32) {
                    return false;
                }
            }
            SubmissionStatus::Rejected => {
                if submission.feedback.is_none() {
                    return false;
                }
            }
        }
    }
    if pending != escrow.pending_count {
        return false;
    }

    match escrow.approved_index {
        Some(index) => submissions
            .get(index)
            .map(|s| s.status == SubmissionStatus::Approved)
            .unwrap_or(false),
        None => true,
    }
}

pub(crate) fn custody_holds(env: &Env) -> bool {
    let total_locked = storage::total_locked(env);
    if total_locked < 0 {
        return false;
    }
    let Ok(token) = storage::token(env) else {
        return total_locked == 0;
    };
    let balance = token::Client::new(env, &token).balance(&env.current_contract_address());
    balance >= total_locked
}

pub(crate) fn assert_custody(env: &Env) {
    if !custody_holds(env) {
        panic!("Invariant violated: token balance below total locked rewards");
    }
}

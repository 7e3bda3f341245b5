//! Storage layout and TTL management for the bounty factory.
//!
//! Configuration and the reentrancy flag live in instance storage. Every
//! escrow, submission and index slot lives in its own persistent entry, so no
//! entry grows with the number of bounties or submissions. Bounty ids are
//! dense (`0..BountyCount`) and need no list of their own; the per-owner and
//! per-hunter indexes are a counter plus one entry per slot.

use soroban_sdk::{contracttype, Address, Env, IntoVal, Val, Vec};

use crate::escrow::{BountyEscrow, Submission, SubmissionRef};
use crate::Error;

const DAY_IN_LEDGERS: u32 = 17280;
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;
const ENTRY_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const ENTRY_LIFETIME_THRESHOLD: u32 = ENTRY_BUMP_AMOUNT - DAY_IN_LEDGERS;

#[contracttype]
pub enum DataKey {
    Token,
    /// Next bounty id to hand out.
    BountyCount,
    /// Sum of `locked_reward` over escrows still `Open`.
    TotalLocked,
    ReentrancyGuard,
    Escrow(u64),
    Submission(u64, u32),
    OwnerBountyCount(Address),
    /// (owner, slot) -> bounty id
    OwnerBounty(Address, u32),
    HunterSubmissionCount(Address),
    /// (hunter, slot) -> SubmissionRef
    HunterSubmission(Address, u32),
}

pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn bump(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, ENTRY_LIFETIME_THRESHOLD, ENTRY_BUMP_AMOUNT);
}

pub fn has_token(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Token)
}

pub fn set_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::Token, token);
}

pub fn token(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .ok_or(Error::NotInitialized)
}

pub fn bounty_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::BountyCount)
        .unwrap_or(0)
}

/// Reserves the next bounty id.
pub fn next_bounty_id(env: &Env) -> u64 {
    let id = bounty_count(env);
    env.storage().instance().set(&DataKey::BountyCount, &(id + 1));
    id
}

pub fn total_locked(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalLocked)
        .unwrap_or(0)
}

pub fn set_total_locked(env: &Env, amount: i128) {
    env.storage().instance().set(&DataKey::TotalLocked, &amount);
}

pub fn load_escrow(env: &Env, bounty_id: u64) -> Result<BountyEscrow, Error> {
    let key = DataKey::Escrow(bounty_id);
    let escrow = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::BountyNotFound)?;
    bump(env, &key);
    Ok(escrow)
}

pub fn save_escrow(env: &Env, bounty_id: u64, escrow: &BountyEscrow) {
    let key = DataKey::Escrow(bounty_id);
    env.storage().persistent().set(&key, escrow);
    bump(env, &key);
}

pub fn load_submission(env: &Env, bounty_id: u64, index: u32) -> Result<Submission, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Submission(bounty_id, index))
        .ok_or(Error::IndexOutOfRange)
}

pub fn save_submission(env: &Env, bounty_id: u64, index: u32, submission: &Submission) {
    let key = DataKey::Submission(bounty_id, index);
    env.storage().persistent().set(&key, submission);
    bump(env, &key);
}

/// Snapshot of a bounty's submissions in index order.
pub fn submissions(env: &Env, bounty_id: u64, count: u32) -> Vec<Submission> {
    let mut all = Vec::new(env);
    for index in 0..count {
        if let Ok(submission) = load_submission(env, bounty_id, index) {
            all.push_back(submission);
        }
    }
    all
}

/// Every bounty id in creation order.
pub fn bounty_ids(env: &Env) -> Vec<u64> {
    let mut ids = Vec::new(env);
    for id in 0..bounty_count(env) {
        ids.push_back(id);
    }
    ids
}

fn slot_count(env: &Env, key: &DataKey) -> u32 {
    env.storage().persistent().get(key).unwrap_or(0)
}

/// Appends `value` at the next slot of the index counted under `count_key`.
fn push_slot<V>(
    env: &Env,
    count_key: DataKey,
    slot_key: impl FnOnce(u32) -> DataKey,
    value: &V,
) where
    V: IntoVal<Env, Val>,
{
    let count = slot_count(env, &count_key);
    let slot_key = slot_key(count);
    env.storage().persistent().set(&slot_key, value);
    env.storage().persistent().set(&count_key, &(count + 1));
    bump(env, &slot_key);
    bump(env, &count_key);
}

pub fn owner_bounties(env: &Env, owner: &Address) -> Vec<u64> {
    let count = slot_count(env, &DataKey::OwnerBountyCount(owner.clone()));
    let mut ids = Vec::new(env);
    for slot in 0..count {
        if let Some(id) = env
            .storage()
            .persistent()
            .get(&DataKey::OwnerBounty(owner.clone(), slot))
        {
            ids.push_back(id);
        }
    }
    ids
}

pub fn push_owner_bounty(env: &Env, owner: &Address, bounty_id: u64) {
    push_slot(
        env,
        DataKey::OwnerBountyCount(owner.clone()),
        |slot| DataKey::OwnerBounty(owner.clone(), slot),
        &bounty_id,
    );
}

pub fn hunter_submissions(env: &Env, hunter: &Address) -> Vec<SubmissionRef> {
    let count = slot_count(env, &DataKey::HunterSubmissionCount(hunter.clone()));
    let mut refs = Vec::new(env);
    for slot in 0..count {
        if let Some(entry) = env
            .storage()
            .persistent()
            .get(&DataKey::HunterSubmission(hunter.clone(), slot))
        {
            refs.push_back(entry);
        }
    }
    refs
}

pub fn push_hunter_submission(env: &Env, hunter: &Address, entry: SubmissionRef) {
    push_slot(
        env,
        DataKey::HunterSubmissionCount(hunter.clone()),
        |slot| DataKey::HunterSubmission(hunter.clone(), slot),
        &entry,
    );
}

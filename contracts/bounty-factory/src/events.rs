//! Factory events.
//!
//! Every payload carries `version` so indexers can tell schema revisions
//! apart. The first topic names the event; the second is the bounty id where
//! one exists, so a single bounty's history can be filtered by topic alone.

use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

pub const EVENT_VERSION: u32 = 1;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FactoryInitialized {
    pub version: u32,
    pub token: Address,
    pub timestamp: u64,
}

pub fn emit_factory_initialized(env: &Env, event: FactoryInitialized) {
    let topics = (symbol_short!("init"),);
    env.events().publish(topics, event);
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BountyCreated {
    pub version: u32,
    pub bounty_id: u64,
    pub creator: Address,
    pub reward: i128,
    pub deadline: u64,
    pub timestamp: u64,
}

pub fn emit_bounty_created(env: &Env, event: BountyCreated) {
    let topics = (symbol_short!("b_create"), event.bounty_id);
    env.events().publish(topics, event);
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubmissionCreated {
    pub version: u32,
    pub bounty_id: u64,
    pub index: u32,
    pub hunter: Address,
    pub content_pointer: String,
    pub timestamp: u64,
}

pub fn emit_submission_created(env: &Env, event: SubmissionCreated) {
    let topics = (symbol_short!("sub_new"), event.bounty_id);
    env.events().publish(topics, event);
}

/// Emitted once per bounty, after the reward reached the hunter.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubmissionApproved {
    pub version: u32,
    pub bounty_id: u64,
    pub index: u32,
    pub hunter: Address,
    pub amount: i128,
    pub timestamp: u64,
}

pub fn emit_submission_approved(env: &Env, event: SubmissionApproved) {
    let topics = (symbol_short!("sub_appr"), event.bounty_id);
    env.events().publish(topics, event);
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubmissionRejected {
    pub version: u32,
    pub bounty_id: u64,
    pub index: u32,
    pub feedback: String,
    pub timestamp: u64,
}

pub fn emit_submission_rejected(env: &Env, event: SubmissionRejected) {
    let topics = (symbol_short!("sub_rej"), event.bounty_id);
    env.events().publish(topics, event);
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BountyRefunded {
    pub version: u32,
    pub bounty_id: u64,
    pub owner: Address,
    pub amount: i128,
    pub timestamp: u64,
}

pub fn emit_bounty_refunded(env: &Env, event: BountyRefunded) {
    let topics = (symbol_short!("b_refund"), event.bounty_id);
    env.events().publish(topics, event);
}

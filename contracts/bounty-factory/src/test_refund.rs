//! Refund of expired bounties that never paid out.

#![cfg(test)]

use super::*;
use soroban_sdk::testutils::{Address as _, Events, Ledger};
use soroban_sdk::{token, Address, Env, String, TryFromVal};

const REWARD: i128 = 25_000;
const DEADLINE: u64 = 10_000;

struct RefundSetup<'a> {
    env: Env,
    contract_id: Address,
    owner: Address,
    hunter: Address,
    token: token::Client<'a>,
    factory: BountyFactoryContractClient<'a>,
    bounty_id: u64,
}

impl<'a> RefundSetup<'a> {
    fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();
        env.ledger().set_timestamp(1_000);

        let admin = Address::generate(&env);
        let owner = Address::generate(&env);
        let hunter = Address::generate(&env);

        let sac = env.register_stellar_asset_contract_v2(admin);
        let token = token::Client::new(&env, &sac.address());
        token::StellarAssetClient::new(&env, &sac.address()).mint(&owner, &REWARD);

        let contract_id = env.register_contract(None, BountyFactoryContract);
        let factory = BountyFactoryContractClient::new(&env, &contract_id);
        factory.init(&sac.address());

        let bounty_id = factory.create_bounty(
            &owner,
            &String::from_str(&env, "Oracle manipulation"),
            &String::from_str(&env, "Price feed can be skewed within one block"),
            &DEADLINE,
            &String::from_str(&env, "critical"),
            &REWARD,
        );

        Self {
            env,
            contract_id,
            owner,
            hunter,
            token,
            factory,
            bounty_id,
        }
    }

    fn submit(&self) -> u32 {
        self.factory.submit_bug(
            &self.bounty_id,
            &self.hunter,
            &String::from_str(&self.env, "QmPoC"),
        )
    }
}

#[test]
fn test_refund_after_deadline() {
    let s = RefundSetup::new();
    assert_eq!(s.token.balance(&s.owner), 0);

    s.env.ledger().set_timestamp(DEADLINE + 1);
    s.factory.refund(&s.bounty_id, &s.owner);

    assert_eq!(s.token.balance(&s.owner), REWARD);
    assert_eq!(s.token.balance(&s.contract_id), 0);
    assert_eq!(s.factory.get_total_locked(), 0);

    let escrow = s.factory.get_bounty(&s.bounty_id);
    assert_eq!(escrow.status, EscrowStatus::Refunded);
    assert_eq!(escrow.locked_reward, REWARD);
    assert!(s.factory.verify_bounty_state(&s.bounty_id));
    assert!(s.factory.verify_custody());
}

#[test]
fn test_refund_emits_event() {
    let s = RefundSetup::new();
    s.env.ledger().set_timestamp(DEADLINE + 1);
    s.factory.refund(&s.bounty_id, &s.owner);

    let (_, _, data) = s
        .env
        .events()
        .all()
        .iter()
        .filter(|(contract, _, _)| *contract == s.contract_id)
        .last()
        .unwrap();
    let event = BountyRefunded::try_from_val(&s.env, &data).unwrap();
    assert_eq!(event.bounty_id, s.bounty_id);
    assert_eq!(event.owner, s.owner);
    assert_eq!(event.amount, REWARD);
}

#[test]
fn test_refund_before_deadline_fails() {
    let s = RefundSetup::new();

    for now in [DEADLINE - 1, DEADLINE] {
        s.env.ledger().set_timestamp(now);
        assert_eq!(
            s.factory.try_refund(&s.bounty_id, &s.owner),
            Err(Ok(Error::DeadlineNotPassed))
        );
    }
    assert_eq!(s.token.balance(&s.contract_id), REWARD);
}

#[test]
fn test_refund_requires_owner() {
    let s = RefundSetup::new();
    s.env.ledger().set_timestamp(DEADLINE + 1);

    assert_eq!(
        s.factory.try_refund(&s.bounty_id, &s.hunter),
        Err(Ok(Error::Unauthorized))
    );
    assert_eq!(s.token.balance(&s.hunter), 0);
}

#[test]
fn test_refund_blocked_by_pending_submission() {
    let s = RefundSetup::new();
    let index = s.submit();

    s.env.ledger().set_timestamp(DEADLINE + 1);
    assert_eq!(
        s.factory.try_refund(&s.bounty_id, &s.owner),
        Err(Ok(Error::PendingSubmissions))
    );

    s.factory.reject_submission(
        &s.bounty_id,
        &s.owner,
        &index,
        &String::from_str(&s.env, "cannot reproduce"),
    );
    s.factory.refund(&s.bounty_id, &s.owner);
    assert_eq!(s.token.balance(&s.owner), REWARD);
}

#[test]
fn test_refund_after_settlement_fails() {
    let s = RefundSetup::new();
    let index = s.submit();
    s.factory.approve_submission(&s.bounty_id, &s.owner, &index);

    s.env.ledger().set_timestamp(DEADLINE + 1);
    assert_eq!(
        s.factory.try_refund(&s.bounty_id, &s.owner),
        Err(Ok(Error::AlreadySettled))
    );
    assert_eq!(s.token.balance(&s.owner), 0);
    assert_eq!(s.token.balance(&s.hunter), REWARD);
}

#[test]
fn test_refunded_bounty_is_closed() {
    let s = RefundSetup::new();
    s.env.ledger().set_timestamp(DEADLINE + 1);
    s.factory.refund(&s.bounty_id, &s.owner);

    assert_eq!(
        s.factory.try_refund(&s.bounty_id, &s.owner),
        Err(Ok(Error::AlreadyRefunded))
    );
    assert_eq!(
        s.factory.try_submit_bug(
            &s.bounty_id,
            &s.hunter,
            &String::from_str(&s.env, "QmLate")
        ),
        Err(Ok(Error::AlreadyRefunded))
    );
    assert_eq!(s.token.balance(&s.owner), REWARD);
}

#[test]
fn test_refund_unknown_bounty_fails() {
    let s = RefundSetup::new();
    s.env.ledger().set_timestamp(DEADLINE + 1);
    assert_eq!(
        s.factory.try_refund(&99, &s.owner),
        Err(Ok(Error::BountyNotFound))
    );
}

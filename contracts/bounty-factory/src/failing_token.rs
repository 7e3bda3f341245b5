//! Minimal token used to exercise the transfer-failure paths. Exposes the
//! `balance`/`transfer` subset of the token interface the factory calls, plus
//! a switch that makes every transfer fail.

#![cfg(test)]

use soroban_sdk::{contract, contracterror, contractimpl, contracttype, Address, Env};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum MockTokenError {
    Frozen = 1,
    InsufficientBalance = 2,
}

#[contracttype]
enum MockKey {
    Balance(Address),
    Frozen,
}

#[contract]
pub struct FreezableToken;

#[contractimpl]
impl FreezableToken {
    pub fn mint(env: Env, to: Address, amount: i128) {
        let balance = Self::balance(env.clone(), to.clone());
        env.storage()
            .instance()
            .set(&MockKey::Balance(to), &(balance + amount));
    }

    pub fn set_frozen(env: Env, frozen: bool) {
        env.storage().instance().set(&MockKey::Frozen, &frozen);
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        env.storage()
            .instance()
            .get(&MockKey::Balance(id))
            .unwrap_or(0)
    }

    pub fn transfer(
        env: Env,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), MockTokenError> {
        from.require_auth();
        if env
            .storage()
            .instance()
            .get(&MockKey::Frozen)
            .unwrap_or(false)
        {
            return Err(MockTokenError::Frozen);
        }

        let from_balance = Self::balance(env.clone(), from.clone());
        if from_balance < amount {
            return Err(MockTokenError::InsufficientBalance);
        }
        let to_balance = Self::balance(env.clone(), to.clone());
        env.storage()
            .instance()
            .set(&MockKey::Balance(from), &(from_balance - amount));
        env.storage()
            .instance()
            .set(&MockKey::Balance(to), &(to_balance + amount));
        Ok(())
    }
}

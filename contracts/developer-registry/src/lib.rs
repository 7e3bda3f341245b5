#![no_std]
//! # Developer Registry
//!
//! Binds wallet addresses to GitHub usernames so bounty hunters can be
//! recognised across the platform.
//!
//! ## Invariants
//!
//! - A username is bound to at most one wallet across the whole registry.
//!   Usernames are opaque to the registry; only ASCII case is ignored when
//!   comparing them.
//! - A wallet holds at most one [`DeveloperRecord`].
//! - `is_verified` only ever flips from `false` to `true` while a record
//!   exists. The admin (the key behind the off-chain OAuth check) is the only
//!   party allowed to flip it, or to disconnect a record entirely.
//!
//! The registry has no runtime coupling to the bounty factory; it is read by
//! off-chain services for display and verification.

mod events;
mod username;


use events::{
    emit_developer_disconnected, emit_developer_registered, emit_developer_verified,
    emit_registry_initialized, DeveloperDisconnected, DeveloperRegistered, DeveloperVerified,
    RegistryInitialized, EVENT_VERSION,
};
use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, Address, Bytes, Env, String,
};

pub use username::MAX_USERNAME_LEN;

const DAY_IN_LEDGERS: u32 = 17280;
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;
const RECORD_BUMP_AMOUNT: u32 = 90 * DAY_IN_LEDGERS;
const RECORD_LIFETIME_THRESHOLD: u32 = RECORD_BUMP_AMOUNT - DAY_IN_LEDGERS;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    /// The username is already bound to a wallet (possibly the caller's own).
    DuplicateUsername = 4,
    /// The wallet already has a record under another username.
    AlreadyRegistered = 5,
    NotFound = 6,
    /// Empty, or longer than `MAX_USERNAME_LEN` bytes.
    InvalidUsername = 7,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeveloperRecord {
    pub wallet_address: Address,
    pub github_username: String,
    pub is_verified: bool,
    pub registered_at: u64,
}

impl DeveloperRecord {
    /// What `get_developer` answers for a wallet that never registered.
    fn unregistered(env: &Env, wallet: Address) -> Self {
        Self {
            wallet_address: wallet,
            github_username: String::from_str(env, ""),
            is_verified: false,
            registered_at: 0,
        }
    }
}

#[contracttype]
pub enum DataKey {
    Admin,
    Developer(Address),
    /// ASCII-lowercased username bytes -> wallet.
    Username(Bytes),
}

#[contract]
pub struct DeveloperRegistryContract;

#[contractimpl]
impl DeveloperRegistryContract {
    /// Initialize the registry with the admin allowed to verify and
    /// disconnect developers. Call once.
    pub fn init(env: Env, admin: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(Error::AlreadyInitialized);
        }
        env.storage().instance().set(&DataKey::Admin, &admin);
        bump_instance(&env);

        emit_registry_initialized(
            &env,
            RegistryInitialized {
                version: EVENT_VERSION,
                admin,
                timestamp: env.ledger().timestamp(),
            },
        );
        Ok(())
    }

    /// Bind `wallet` to `username`. The wallet must authorize the call.
    ///
    /// The username is an opaque non-empty string. Fails with
    /// `DuplicateUsername` when it is taken by anyone, including a repeat
    /// registration by the same wallet, and with `AlreadyRegistered` when the
    /// wallet already holds a different username.
    pub fn register_developer(env: Env, wallet: Address, username: String) -> Result<(), Error> {
        wallet.require_auth();

        let username_key = DataKey::Username(username::username_key(&env, &username)?);
        if env.storage().persistent().has(&username_key) {
            return Err(Error::DuplicateUsername);
        }
        let record_key = DataKey::Developer(wallet.clone());
        if env.storage().persistent().has(&record_key) {
            return Err(Error::AlreadyRegistered);
        }

        let now = env.ledger().timestamp();
        let record = DeveloperRecord {
            wallet_address: wallet.clone(),
            github_username: username.clone(),
            is_verified: false,
            registered_at: now,
        };
        env.storage().persistent().set(&record_key, &record);
        env.storage().persistent().set(&username_key, &wallet);
        bump_record(&env, &record_key);
        bump_record(&env, &username_key);
        bump_instance(&env);

        emit_developer_registered(
            &env,
            DeveloperRegistered {
                version: EVENT_VERSION,
                wallet,
                github_username: username,
                timestamp: now,
            },
        );
        Ok(())
    }

    /// Mark a registered developer as verified (admin only).
    pub fn verify_developer(env: Env, admin: Address, wallet: Address) -> Result<(), Error> {
        require_admin(&env, &admin)?;

        let record_key = DataKey::Developer(wallet.clone());
        let mut record: DeveloperRecord = env
            .storage()
            .persistent()
            .get(&record_key)
            .ok_or(Error::NotFound)?;

        if record.is_verified {
            return Ok(());
        }
        record.is_verified = true;
        env.storage().persistent().set(&record_key, &record);
        bump_record(&env, &record_key);

        emit_developer_verified(
            &env,
            DeveloperVerified {
                version: EVENT_VERSION,
                wallet,
                verified_by: admin,
                timestamp: env.ledger().timestamp(),
            },
        );
        Ok(())
    }

    /// Remove a developer's record and release its username (admin only).
    pub fn disconnect_developer(env: Env, admin: Address, wallet: Address) -> Result<(), Error> {
        require_admin(&env, &admin)?;

        let record_key = DataKey::Developer(wallet.clone());
        let record: DeveloperRecord = env
            .storage()
            .persistent()
            .get(&record_key)
            .ok_or(Error::NotFound)?;

        let username_key =
            DataKey::Username(username::username_key(&env, &record.github_username)?);
        env.storage().persistent().remove(&username_key);
        env.storage().persistent().remove(&record_key);

        emit_developer_disconnected(
            &env,
            DeveloperDisconnected {
                version: EVENT_VERSION,
                wallet,
                github_username: record.github_username,
                timestamp: env.ledger().timestamp(),
            },
        );
        Ok(())
    }

    /// Record for `wallet`, or an empty unverified record if it never
    /// registered.
    pub fn get_developer(env: Env, wallet: Address) -> DeveloperRecord {
        env.storage()
            .persistent()
            .get(&DataKey::Developer(wallet.clone()))
            .unwrap_or_else(|| DeveloperRecord::unregistered(&env, wallet))
    }

    /// Reverse lookup from username to wallet, ignoring ASCII case.
    pub fn get_wallet_by_username(env: Env, username: String) -> Option<Address> {
        let key = username::username_key(&env, &username).ok()?;
        env.storage().persistent().get(&DataKey::Username(key))
    }

    pub fn is_verified(env: Env, wallet: Address) -> bool {
        env.storage()
            .persistent()
            .get::<_, DeveloperRecord>(&DataKey::Developer(wallet))
            .map(|record| record.is_verified)
            .unwrap_or(false)
    }

    pub fn get_admin(env: Env) -> Option<Address> {
        env.storage().instance().get(&DataKey::Admin)
    }
}

fn require_admin(env: &Env, caller: &Address) -> Result<(), Error> {
    caller.require_auth();
    let admin: Address = env
        .storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(Error::NotInitialized)?;
    if *caller != admin {
        return Err(Error::Unauthorized);
    }
    bump_instance(env);
    Ok(())
}

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn bump_record(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, RECORD_LIFETIME_THRESHOLD, RECORD_BUMP_AMOUNT);
}

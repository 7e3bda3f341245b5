use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

pub const EVENT_VERSION: u32 = 1;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegistryInitialized {
    pub version: u32,
    pub admin: Address,
    pub timestamp: u64,
}

pub fn emit_registry_initialized(env: &Env, event: RegistryInitialized) {
    let topics = (symbol_short!("init"),);
    env.events().publish(topics, event);
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeveloperRegistered {
    pub version: u32,
    pub wallet: Address,
    pub github_username: String,
    pub timestamp: u64,
}

pub fn emit_developer_registered(env: &Env, event: DeveloperRegistered) {
    let topics = (symbol_short!("dev_reg"), event.wallet.clone());
    env.events().publish(topics, event);
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeveloperVerified {
    pub version: u32,
    pub wallet: Address,
    pub verified_by: Address,
    pub timestamp: u64,
}

pub fn emit_developer_verified(env: &Env, event: DeveloperVerified) {
    let topics = (symbol_short!("dev_ver"), event.wallet.clone());
    env.events().publish(topics, event);
}

/// Emitted when the admin unbinds a wallet from its GitHub login.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeveloperDisconnected {
    pub version: u32,
    pub wallet: Address,
    pub github_username: String,
    pub timestamp: u64,
}

pub fn emit_developer_disconnected(env: &Env, event: DeveloperDisconnected) {
    let topics = (symbol_short!("dev_disc"), event.wallet.clone());
    env.events().publish(topics, event);
}

//! # Reentrancy Guard
//!
//! A single flag in instance storage, shared by every entry point that moves
//! funds. A token contract that calls back into the factory while a payout is
//! in flight finds the flag set and aborts the whole transaction.
//!
//! ```rust
//! pub fn approve_submission(env: Env, ..) -> Result<(), Error> {
//!     reentrancy_guard::acquire(&env);   // panics if already entered
//!     // checks, state updates, token transfer
//!     reentrancy_guard::release(&env);
//!     Ok(())
//! }
//! ```
//!
//! A panic or an `Err` return rolls back instance storage along with
//! everything else, so the flag cannot be left behind by a failed call.

use crate::storage::DataKey;
use soroban_sdk::Env;

const LOCK: DataKey = DataKey::ReentrancyGuard;

pub fn is_held(env: &Env) -> bool {
    env.storage().instance().has(&LOCK)
}

/// Marks a fund-moving call as in flight.
///
/// A second `acquire` before the matching [`release`] means the factory was
/// re-entered mid-call; it panics with `"Reentrancy detected"` so the host
/// discards the outer call too.
pub fn acquire(env: &Env) {
    if is_held(env) {
        panic!("Reentrancy detected");
    }
    env.storage().instance().set(&LOCK, &true);
}

pub fn release(env: &Env) {
    env.storage().instance().remove(&LOCK);
}

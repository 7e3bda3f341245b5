use soroban_sdk::{Bytes, Env, String};

use crate::Error;

/// Upper bound on a stored username, in bytes.
pub const MAX_USERNAME_LEN: u32 = 255;

/// Key the registry indexes `username` under.
///
/// The username is opaque: any non-empty string up to
/// [`MAX_USERNAME_LEN`] bytes is accepted as-is. ASCII letters are folded to
/// lowercase in the key so `Alice` and `alice` claim the same slot; every
/// other byte is kept verbatim.
pub fn username_key(env: &Env, username: &String) -> Result<Bytes, Error> {
    let len = username.len();
    if len == 0 || len > MAX_USERNAME_LEN {
        return Err(Error::InvalidUsername);
    }

    let mut buf = [0u8; MAX_USERNAME_LEN as usize];
    let raw = &mut buf[..len as usize];
    username.copy_into_slice(raw);
    raw.make_ascii_lowercase();

    Ok(Bytes::from_slice(env, raw))
}

//! Telegram WebApp `initData` signature verification.
//!
//! The payload is a query string signed by Telegram with a key derived from
//! the bot token:
//!
//! ```text
//! secret = HMAC-SHA256(key = "WebAppData", msg = bot_token)
//! hash   = hex(HMAC-SHA256(key = secret, msg = data_check_string))
//! ```
//!
//! where the data-check string is every field except `hash`, sorted by key
//! and joined as `key=value` lines.

use std::collections::BTreeMap;
use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::{AuthContext, AuthError};

type HmacSha256 = Hmac<Sha256>;

const KEY_DERIVATION_SALT: &[u8] = b"WebAppData";
const HASH_FIELD: &str = "hash";
const LOGGED_HASH_PREFIX: usize = 8;

/// 32-byte key derived from the bot token.
pub type SecretKey = [u8; 32];

/// Verifies init data against one bot token.
///
/// Holds only the derived key, which never changes after construction, so a
/// single instance can be shared across request handlers.
#[derive(Clone)]
pub struct InitDataVerifier {
    secret: SecretKey,
}

impl fmt::Debug for InitDataVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitDataVerifier").field("secret", &"<redacted>").finish()
    }
}

impl InitDataVerifier {
    pub fn new(bot_token: &str) -> Self {
        Self { secret: derive_secret(bot_token) }
    }

    pub fn verify(&self, raw: &str) -> Result<AuthContext, AuthError> {
        let mut fields = parse_fields(raw)?;
        let received = fields
            .remove(HASH_FIELD)
            .filter(|h| !h.is_empty())
            .ok_or(AuthError::MissingHash)?;
        let computed = sign(&self.secret, &data_check_string(&fields));
        if !hashes_match(&computed, &received) {
            log::warn!(
                "init data signature mismatch (received {}...)",
                redact(&received)
            );
            return Err(AuthError::InvalidSignature);
        }
        AuthContext::from_verified(&fields)
    }
}

/// Verifies `raw` against `bot_token` in one call.
pub fn verify(raw: &str, bot_token: &str) -> Result<AuthContext, AuthError> {
    InitDataVerifier::new(bot_token).verify(raw)
}

pub fn derive_secret(bot_token: &str) -> SecretKey {
    let mut mac = new_mac(KEY_DERIVATION_SALT);
    mac.update(bot_token.as_bytes());
    let mut secret = [0u8; 32];
    secret.copy_from_slice(&mac.finalize().into_bytes());
    secret
}

/// Lowercase hex HMAC-SHA256 of `message` under `secret`.
pub fn sign(secret: &SecretKey, message: &str) -> String {
    let mut mac = new_mac(secret);
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Newline-joined `key=value` lines in ascending byte order of keys.
///
/// `fields` must already exclude `hash`; values are used as decoded.
pub fn data_check_string(fields: &BTreeMap<String, String>) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Splits and percent-decodes a query string. The first value of a repeated
/// key wins; a segment without `=` is a key with an empty value.
pub fn parse_fields(raw: &str) -> Result<BTreeMap<String, String>, AuthError> {
    if raw.is_empty() {
        return Err(AuthError::MalformedInput);
    }
    let mut fields = BTreeMap::new();
    for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
        fields.entry(key.into_owned()).or_insert_with(|| value.into_owned());
    }
    Ok(fields)
}

fn new_mac(key: &[u8]) -> HmacSha256 {
    match HmacSha256::new_from_slice(key) {
        Ok(mac) => mac,
        Err(_) => unreachable!("hmac accepts keys of any length"),
    }
}

fn hashes_match(computed: &str, received: &str) -> bool {
    computed.len() == received.len() && bool::from(computed.as_bytes().ct_eq(received.as_bytes()))
}

fn redact(hash: &str) -> &str {
    match hash.char_indices().nth(LOGGED_HASH_PREFIX) {
        Some((i, _)) => &hash[..i],
        None => hash,
    }
}

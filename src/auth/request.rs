use std::fmt;

use super::{AuthContext, InitDataVerifier};
use crate::persistent::{Storage, UserRecord};

/// Header carrying the raw init data on every API request.
pub const INIT_DATA_HEADER: &str = "X-Telegram-Init-Data";

const UNAUTHORIZED: &str = "Unauthorized";
const USER_NOT_FOUND: &str = "User not found. Please start the bot first.";
const INTERNAL: &str = "Internal server error";

/// What the HTTP layer sends back when a request is refused.
///
/// Every authentication failure maps to the same 401 so a client cannot tell
/// a bad signature from a malformed user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejection {
    pub status: u16,
    pub message: &'static str,
}

impl Rejection {
    pub fn unauthorized() -> Self {
        Self { status: 401, message: UNAUTHORIZED }
    }
    pub fn user_not_found() -> Self {
        Self { status: 404, message: USER_NOT_FOUND }
    }
    pub fn internal() -> Self {
        Self { status: 500, message: INTERNAL }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status, self.message)
    }
}

/// Finds [`INIT_DATA_HEADER`] among `(name, value)` pairs, ignoring name case.
pub fn init_data_header<'a, I>(headers: I) -> Option<&'a str>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    headers
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(INIT_DATA_HEADER))
        .map(|(_, value)| value)
}

pub fn authenticate(header: Option<&str>, verifier: &InitDataVerifier) -> Result<AuthContext, Rejection> {
    let raw = match header.filter(|h| !h.trim().is_empty()) {
        Some(raw) => raw,
        None => {
            log::info!("request without {} header", INIT_DATA_HEADER);
            return Err(Rejection::unauthorized());
        }
    };
    verifier.verify(raw).map_err(|e| {
        // signature mismatches are already reported by the verifier
        if !e.is_security_event() {
            log::info!("init data rejected: {}", e.kind());
        }
        Rejection::unauthorized()
    })
}

/// Authenticates the request and loads the user registered through the bot.
pub async fn current_user(
    header: Option<&str>,
    verifier: &InitDataVerifier,
    storage: &Storage,
) -> Result<UserRecord, Rejection> {
    let ctx = authenticate(header, verifier)?;
    match storage.find_user(ctx.id()).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => {
            log::info!("authenticated user {} ({}) is not registered", ctx.id(), ctx.display_name());
            Err(Rejection::user_not_found())
        }
        Err(e) => {
            log::error!("failed to load user {}: {}", ctx.id(), e);
            Err(Rejection::internal())
        }
    }
}

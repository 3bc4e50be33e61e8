use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};

use super::AuthError;

/// Identity of a Telegram user whose init data passed signature verification.
///
/// Fields are private so the only way to obtain one is through
/// [`InitDataVerifier::verify`](super::InitDataVerifier::verify).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    id: i64,
    first_name: Option<String>,
    last_name: Option<String>,
    username: Option<String>,
    language_code: Option<String>,
    is_premium: Option<bool>,
    allows_write_to_pm: Option<bool>,
    auth_date: Option<DateTime<Utc>>,
    query_id: Option<String>,
    start_param: Option<String>,
}

impl AuthContext {
    /// Builds the context from an already verified field map.
    pub(super) fn from_verified(fields: &BTreeMap<String, String>) -> Result<Self, AuthError> {
        let user = fields
            .get("user")
            .filter(|u| !u.is_empty())
            .ok_or(AuthError::MissingUser)?;
        let user: Value = serde_json::from_str(user).map_err(|e| {
            log::debug!("init data user is not json: {}", e);
            AuthError::MalformedUser
        })?;
        let user = user.as_object().ok_or(AuthError::MalformedUser)?;
        let id = user.get("id").and_then(integer_id).ok_or(AuthError::MalformedUser)?;

        Ok(Self {
            id,
            first_name: string_field(user, "first_name"),
            last_name: string_field(user, "last_name"),
            username: string_field(user, "username"),
            language_code: string_field(user, "language_code"),
            is_premium: bool_field(user, "is_premium"),
            allows_write_to_pm: bool_field(user, "allows_write_to_pm"),
            auth_date: fields
                .get("auth_date")
                .and_then(|s| s.parse::<i64>().ok())
                .and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
            query_id: fields.get("query_id").cloned(),
            start_param: fields.get("start_param").cloned(),
        })
    }

    pub fn id(&self) -> i64 {
        self.id
    }
    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }
    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
    pub fn language_code(&self) -> Option<&str> {
        self.language_code.as_deref()
    }
    pub fn is_premium(&self) -> Option<bool> {
        self.is_premium
    }
    pub fn allows_write_to_pm(&self) -> Option<bool> {
        self.allows_write_to_pm
    }
    /// Signed `auth_date`, when it is a unix timestamp.
    pub fn auth_date(&self) -> Option<DateTime<Utc>> {
        self.auth_date
    }
    pub fn query_id(&self) -> Option<&str> {
        self.query_id.as_deref()
    }
    pub fn start_param(&self) -> Option<&str> {
        self.start_param.as_deref()
    }

    /// `first_name last_name [@username]`, the same shape the bot uses for
    /// Telegram users.
    pub fn display_name(&self) -> String {
        let name = self.first_name.as_deref().unwrap_or_default();
        let last_name = self.last_name.as_ref().map(|s| format!(" {}", s)).unwrap_or_default();
        let nick = self.username.as_ref().map(|s| format!(" [@{}]", s)).unwrap_or_default();
        format!("{name}{last_name}{nick}").trim().to_owned()
    }
}

/// Telegram ids are integers; a float is accepted only when it has no
/// fractional part and fits in `i64`.
fn integer_id(id: &Value) -> Option<i64> {
    id.as_i64().or_else(|| {
        id.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn string_field(user: &Map<String, Value>, key: &str) -> Option<String> {
    user.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn bool_field(user: &Map<String, Value>, key: &str) -> Option<bool> {
    user.get(key).and_then(Value::as_bool)
}

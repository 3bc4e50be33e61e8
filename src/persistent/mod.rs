use teloxide::types::User;

use crate::auth::AuthContext;

mod sqlite;

pub use sqlite::Storage;

const DEFAULT_LANGUAGE: &str = "en";
const LANGUAGE_CODE_LEN: usize = 10;

/// Row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub language_code: String,
    pub is_active: bool,
    pub wallet_address: Option<String>,
}

/// Profile fields written on registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub language_code: String,
}

impl NewUser {
    pub fn new(
        telegram_id: i64,
        username: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
        language_code: Option<&str>,
    ) -> Self {
        let language_code = language_code
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE)
            .chars()
            .take(LANGUAGE_CODE_LEN)
            .collect();
        Self { telegram_id, username, first_name, last_name, language_code }
    }
    pub fn from_user(user: &User) -> Self {
        Self::new(
            user.id.0 as i64,
            user.username.clone(),
            Some(user.first_name.clone()),
            user.last_name.clone(),
            user.language_code.as_deref(),
        )
    }
}

impl From<&AuthContext> for NewUser {
    fn from(ctx: &AuthContext) -> Self {
        Self::new(
            ctx.id(),
            ctx.username().map(str::to_owned),
            ctx.first_name().map(str::to_owned),
            ctx.last_name().map(str::to_owned),
            ctx.language_code(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_defaults_and_truncates() {
        assert_eq!(NewUser::new(1, None, None, None, None).language_code, "en");
        assert_eq!(NewUser::new(1, None, None, None, Some("")).language_code, "en");
        assert_eq!(NewUser::new(1, None, None, None, Some("pt-br")).language_code, "pt-br");
        assert_eq!(
            NewUser::new(1, None, None, None, Some("x-very-long-tag")).language_code,
            "x-very-lon"
        );
    }

    #[test]
    fn from_telegram_user() {
        let user: User = serde_json::from_str(
            r#"{"id":42,"is_bot":false,"first_name":"Ann","username":"ann","language_code":"ru"}"#,
        )
        .unwrap();
        let new = NewUser::from_user(&user);
        assert_eq!(new.telegram_id, 42);
        assert_eq!(new.first_name.as_deref(), Some("Ann"));
        assert_eq!(new.username.as_deref(), Some("ann"));
        assert_eq!(new.language_code, "ru");
    }
}

use std::{str::FromStr, sync::Arc};
use sqlx::{migrate::Migrator, ConnectOptions, SqlitePool};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use super::{NewUser, UserRecord};


static MIGRATOR: Migrator = sqlx::migrate!();

const USER_COLUMNS: &str =
    "id, telegram_id, username, first_name, last_name, language_code, is_active, wallet_address";


pub struct Storage(SqlitePool);

async fn make_pool(db_url: &str) -> anyhow::Result<SqlitePool> {
    let mut options = SqliteConnectOptions::from_str(db_url)?.create_if_missing(true);
    options.disable_statement_logging();
    // every connection to an in-memory url opens its own empty database
    let pool = if db_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new().connect_with(options).await?
    };
    MIGRATOR.run(&pool).await?;
    Ok(pool)
}

impl Storage {
    pub async fn new(db_url: &str) -> anyhow::Result<Arc<Self>> {
        Ok(Arc::new(Self(make_pool(db_url).await?)))
    }
    pub async fn close(&self) {
        log::info!("closing database connections...");
        self.0.close().await;
        log::info!("database connections closed!");
    }
    pub async fn upsert_user(&self, user: &NewUser) -> anyhow::Result<()> {
        sqlx::query(
            "insert into users (telegram_id, username, first_name, last_name, language_code)
            values (?1, ?2, ?3, ?4, ?5)
            on conflict (telegram_id) do update set
                username = excluded.username,
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                language_code = excluded.language_code,
                updated_at = current_timestamp"
        )
        .bind(user.telegram_id)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.language_code)
        .execute(&self.0).await?;
        Ok(())
    }
    pub async fn find_user(&self, telegram_id: i64) -> anyhow::Result<Option<UserRecord>> {
        let query = format!("select {} from users where telegram_id = ?1", USER_COLUMNS);
        let user = sqlx::query_as::<_, UserRecord>(&query)
            .bind(telegram_id)
            .fetch_optional(&self.0).await?;
        Ok(user)
    }
    pub async fn count_users(&self) -> anyhow::Result<i64> {
        let (count,): (i64,) = sqlx::query_as("select count(*) from users")
            .fetch_one(&self.0).await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann() -> NewUser {
        NewUser::new(42, Some("ann".into()), Some("Ann".into()), None, Some("ru"))
    }

    #[tokio::test]
    async fn upsert_inserts_then_updates() {
        let storage = Storage::new("sqlite::memory:").await.unwrap();
        assert_eq!(storage.find_user(42).await.unwrap(), None);

        storage.upsert_user(&ann()).await.unwrap();
        let first = storage.find_user(42).await.unwrap().unwrap();
        assert_eq!(first.username.as_deref(), Some("ann"));
        assert_eq!(first.language_code, "ru");
        assert!(first.is_active);
        assert_eq!(first.wallet_address, None);

        let mut renamed = ann();
        renamed.username = Some("ann_lee".into());
        renamed.last_name = Some("Lee".into());
        storage.upsert_user(&renamed).await.unwrap();
        let second = storage.find_user(42).await.unwrap().unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.username.as_deref(), Some("ann_lee"));
        assert_eq!(second.last_name.as_deref(), Some("Lee"));
        assert_eq!(storage.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn users_are_keyed_by_telegram_id() {
        let storage = Storage::new("sqlite::memory:").await.unwrap();
        storage.upsert_user(&ann()).await.unwrap();
        storage.upsert_user(&NewUser::new(7, None, Some("Bob".into()), None, None)).await.unwrap();
        assert_eq!(storage.count_users().await.unwrap(), 2);
        let bob = storage.find_user(7).await.unwrap().unwrap();
        assert_eq!(bob.language_code, "en");
        storage.close().await;
    }
}

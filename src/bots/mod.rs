use std::sync::Arc;

use teloxide::{adaptors::Throttle, prelude::*};
use teloxide::payloads::DeleteWebhookSetters;

use crate::impls::LoggableErrorResult;
use crate::persistent::Storage;

pub mod locale;
mod commands;

pub use commands::Command;

type WrappedBot = Throttle<Bot>;
type DBStorage = Arc<Storage>;

fn make_username(user: &teloxide::types::User) -> String {
    let name = user.first_name.as_str();
    let last_name = user.last_name.as_ref().map(|s| format!(" {}", s)).unwrap_or_default();
    let nick = user.username.as_ref().map(|s| format!(" [@{}]", s)).unwrap_or_default();
    format!("{name}{last_name}{nick}")
}

/// Starts long polling for the registration bot. The task ends on ctrl-c.
pub fn start(token: &str, storage: DBStorage) -> tokio::task::JoinHandle<()> {
    let bot = Bot::new(token).throttle(Default::default());
    let mut dispatcher = Dispatcher::builder(bot.clone(), commands::make_handler())
        .dependencies(dptree::deps![storage])
        .enable_ctrlc_handler()
        .build();
    tokio::spawn(async move {
        bot.delete_webhook().drop_pending_updates(true).await.ok_or_log();
        bot.set_my_commands(commands::bot_commands()).await.ok_or_log();
        let bot_username = bot.get_me().await.ok_or_log()
            .map(|me| me.username().to_owned())
            .unwrap_or("unknown".to_owned());
        log::info!("Bot @{} started!", bot_username);
        dispatcher.dispatch().await;
        log::info!("Bot @{} stopped", bot_username);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(json: &str) -> teloxide::types::User {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn username_includes_optional_parts() {
        let full = user(r#"{"id":1,"is_bot":false,"first_name":"Ann","last_name":"Lee","username":"ann"}"#);
        assert_eq!(make_username(&full), "Ann Lee [@ann]");
        let bare = user(r#"{"id":2,"is_bot":false,"first_name":"Bob"}"#);
        assert_eq!(make_username(&bare), "Bob");
    }
}

use teloxide::dispatching::UpdateHandler;
use teloxide::types::{BotCommand, User};
use teloxide::utils::command::BotCommands;

use super::locale::{Language, Template};
use super::*;
use crate::persistent::NewUser;

type HandlerError = Box<dyn std::error::Error + Send + Sync>;
pub type HandlerResult = Result<(), HandlerError>;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "register and open the marketplace")]
    Start,
    #[command(description = "show this help")]
    Help,
}

pub fn bot_commands() -> Vec<BotCommand> {
    Command::bot_commands()
}

pub fn make_handler() -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter_command::<Command>()
        .endpoint(on_command)
}

async fn on_command(bot: WrappedBot, msg: Message, cmd: Command, storage: DBStorage) -> HandlerResult {
    let chat_id = msg.chat.id;
    let user = match msg.from() {
        Some(user) => user,
        None => {
            bot.send_message(chat_id, Language::default().text(Template::NoSender)).await?;
            return Ok(());
        }
    };
    let lang = Language::from_code(user.language_code.as_deref());
    let text = match cmd {
        Command::Start => {
            register(&storage, user).await;
            lang.text(Template::Start)
        }
        Command::Help => lang.text(Template::Help),
    };
    bot.send_message(chat_id, text).await?;
    Ok(())
}

/// A failed upsert still gets the welcome reply.
async fn register(storage: &Storage, user: &User) {
    if storage.upsert_user(&NewUser::from_user(user)).await.ok_or_log().is_some() {
        log::info!("User registered: {} ({})", user.id.0, make_username(user));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("/start", "admarket_bot").ok(), Some(Command::Start));
        assert_eq!(Command::parse("/help", "admarket_bot").ok(), Some(Command::Help));
        assert!(Command::parse("/publish", "admarket_bot").is_err());
    }

    #[test]
    fn registers_both_commands() {
        let names: Vec<_> = bot_commands().into_iter().map(|c| c.command).collect();
        assert_eq!(names.len(), 2);
        assert!(names.iter().any(|c| c.ends_with("start")));
        assert!(names.iter().any(|c| c.ends_with("help")));
    }

    #[tokio::test]
    async fn register_upserts_the_sender() {
        let storage = Storage::new("sqlite::memory:").await.unwrap();
        let user: User = serde_json::from_str(
            r#"{"id":42,"is_bot":false,"first_name":"Ann","language_code":"ru-RU"}"#,
        )
        .unwrap();
        register(&storage, &user).await;
        register(&storage, &user).await;
        let record = storage.find_user(42).await.unwrap().unwrap();
        assert_eq!(record.first_name.as_deref(), Some("Ann"));
        assert_eq!(record.language_code, "ru-RU");
        assert_eq!(storage.count_users().await.unwrap(), 1);
    }
}

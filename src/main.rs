use clap::Parser;
use simplelog::LevelFilter;

use admarket::{bots, config::Settings, persistent::Storage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::parse();
    init_logger(settings.log_level())?;
    log::debug!("settings: {:?}", settings);

    let storage = Storage::new(&settings.db_url).await?;
    log::info!("{} registered users", storage.count_users().await?);
    let bot = bots::start(settings.bot_token.expose(), storage.clone());
    if let Err(e) = bot.await {
        log::error!("bot task failed: {}", e);
    }
    storage.close().await;
    Ok(())
}

fn init_logger(level: LevelFilter) -> anyhow::Result<()> {
    use simplelog::*;
    TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)?;
    Ok(())
}

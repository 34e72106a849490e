/// Main entry point for the ICT bias bot
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use ictbias::{
    bot::BiasBot,
    config::load_config,
    data::TwelveDataClient,
    error::Result,
    notify::TelegramNotifier,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let config = Arc::new(load_config(&config_path)?);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .init();

    info!("Starting ICT bias bot...");
    info!("Symbols: {}", config.symbols.join(", "));

    let market = Arc::new(TwelveDataClient::new(
        config.twelve_data_api_key.clone(),
        config.rate_limit_per_minute,
        config.http_timeout_sec,
    ));
    let notifier = Arc::new(TelegramNotifier::new(
        config.telegram_bot_token.clone(),
        config.telegram_chat_id.clone(),
        config.http_timeout_sec,
    ));
    let bot = Arc::new(BiasBot::new(
        Arc::clone(&config),
        market,
        Arc::clone(&notifier),
    ));

    let shutdown = Arc::new(RwLock::new(false));
    setup_shutdown_handler(Arc::clone(&shutdown));

    let mut update_offset: i64 = 0;

    loop {
        {
            let shutdown = shutdown.read().await;
            if *shutdown {
                info!("Shutdown signal received");
                break;
            }
        }

        bot.run_analysis().await;

        // Wait out the cycle interval while serving chat commands
        let next_cycle =
            tokio::time::Instant::now() + Duration::from_secs(config.analysis_interval_sec);
        while tokio::time::Instant::now() < next_cycle {
            if *shutdown.read().await {
                break;
            }

            match notifier
                .poll_commands(update_offset, config.command_poll_timeout_sec)
                .await
            {
                Ok((next_offset, commands)) => {
                    update_offset = next_offset;
                    for command in commands {
                        info!("Command received: {}", command);
                        if let Err(e) = bot.handle_command(&command).await {
                            error!("Command {} failed: {} ({})", command, e, e.error_code());
                        }
                    }
                }
                Err(e) => {
                    warn!("Command polling failed: {}", e);
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
            }
        }
    }

    info!("ICT bias bot stopped");
    Ok(())
}

/// Setup graceful shutdown handler
fn setup_shutdown_handler(shutdown: Arc<RwLock<bool>>) {
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");

        info!("Ctrl+C received - initiating graceful shutdown");

        let mut flag = shutdown.write().await;
        *flag = true;
    });
}

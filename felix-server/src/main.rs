mod cli;
mod custom_command;
mod felix;
mod format;
mod management;
mod registry;

#[cfg(test)]
mod test_util;

use crate::{custom_command::register_builtin_commands, felix::Felix, registry::CommandRegistry};

use anyhow::Result;
use clap::Parser;
use felix_common::{config::load_config, persistence::JsonCommandStore};
use felix_core::interface::client::FelixClient;
use felix_discord_client::DiscordFelixClient;
use felix_irc_client::IrcFelixClient;
use futures::future::join_all;
use tokio::spawn;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = cli::Arguments::parse();
    let mut config = load_config(&args.config)?;
    if let Some(store) = args.store {
        config.command.store = store;
    }

    let felix = initialize_felix(&config.command).await?;

    let mut client_tasks = vec![];

    // IRC
    if let Some(irc_config) = &config.irc {
        info!("starting IRC client");
        let irc_client = IrcFelixClient::new(irc_config, felix.clone());
        client_tasks.push(spawn(irc_client.execute()));
    }

    // Discord
    match &config.discord {
        Some(discord_config) if discord_config.enabled => {
            info!("starting Discord client");
            let discord_client = DiscordFelixClient::new(discord_config, felix.clone());
            client_tasks.push(spawn(discord_client.execute()));
        }
        Some(_) => warn!("Discord client is disabled"),
        None => (),
    }

    if client_tasks.is_empty() {
        warn!("no client configured; exiting");
        return Ok(());
    }

    for client_join in join_all(client_tasks).await {
        let client_result = client_join?;
        client_result?;
    }

    Ok(())
}

async fn initialize_felix(config: &felix_common::config::command::ConfigCommand) -> Result<Felix> {
    let store = JsonCommandStore::new(&config.store);
    let registry = CommandRegistry::load(store, config.prefix()?, config.ignore.iter().cloned())?;
    info!("using command prefix '{}'", registry.prefix());
    // 保存先に書き込めなければ起動しない
    registry.write().await?;

    let felix = Felix::new(registry);
    register_builtin_commands(&felix).await;
    Ok(felix)
}

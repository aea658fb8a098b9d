//! Command handlers for the non-server subcommands.

use crate::config::Config;
use crate::domain::CategoryRegistry;
use crate::models::ConversationalResponse;
use crate::state::SharedState;

pub fn cmd_categories() {
    let registry = CategoryRegistry::builtin();

    println!("Notice categories ({} total)", registry.len());
    println!("{:-<40}", "");

    for category in registry.iter() {
        println!("{:>5}  {}", category.id, category.label);
    }
}

pub async fn cmd_fetch(config: Config, label: &str) -> anyhow::Result<()> {
    let state = SharedState::new(config)?;
    println!(
        "Board category id: {}",
        state.registry.backend_id_or_sentinel(label)
    );

    match state.listings.listing(label).await {
        ConversationalResponse::ListCard(card) => {
            println!("{}", card.title);
            println!("{:-<60}", "");
            for item in &card.items {
                println!("• {}", item.title);
                println!("  {}", item.description);
                println!("  {}", item.link);
            }
        }
        ConversationalResponse::SimpleText(text) => {
            println!("{}", text.message.trim());
        }
    }

    Ok(())
}

pub fn cmd_config_init() -> anyhow::Result<()> {
    if Config::create_default_if_missing()? {
        println!("Created config.toml with default settings.");
    } else {
        println!("config.toml already exists, leaving it untouched.");
    }
    Ok(())
}

pub fn cmd_config_show(config: &Config) -> anyhow::Result<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

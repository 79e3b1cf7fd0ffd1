use anyhow::{anyhow, Result};
use clap::Subcommand;

use crate::app::App;

#[derive(Subcommand)]
pub enum KeysCommand {
    /// Show which providers have a key
    List,
    /// Store an API key for a provider
    Set { provider: String, key: String },
    /// Remove a stored API key
    Remove { provider: String },
}

impl KeysCommand {
    pub fn execute(self, app: &App) -> Result<()> {
        match self {
            KeysCommand::List => {
                let available = app.resolver().available_providers();
                for name in app.resolver().provider_names() {
                    let status = if available.contains(&name) {
                        "configured"
                    } else {
                        "missing"
                    };
                    println!("{:<12} {}", name, status);
                }
            }
            KeysCommand::Set { provider, key } => {
                ensure_known(app, &provider)?;
                if key.trim().is_empty() {
                    return Err(anyhow!("API key must not be empty"));
                }
                app.keys().set(&provider, &key)?;
                println!("Stored API key for {}", provider);
            }
            KeysCommand::Remove { provider } => {
                ensure_known(app, &provider)?;
                app.keys().remove(&provider)?;
                println!("Removed API key for {}", provider);
            }
        }
        Ok(())
    }
}

fn ensure_known(app: &App, provider: &str) -> Result<()> {
    if app.is_known_provider(provider) {
        Ok(())
    } else {
        Err(anyhow!("Unknown provider: {}", provider))
    }
}

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use super::{AgentsCommand, ChatCommand, HistoryCommand, KeysCommand};
use crate::{app::App, config::Config};

/// NeuralForge - chat with your AI agent personas from the terminal
#[derive(Parser)]
#[command(
    name = "neuralforge",
    version,
    about = "Chat with AI agent personas across Claude, OpenAI and Gemini",
    long_about = r#"NeuralForge keeps a roster of AI agent personas and their chat transcripts.
Replies come from the first configured provider that answers; without any
API key the agent still responds with local template text.

Examples:
  neuralforge agents list                     # Show available agents
  neuralforge keys set claude sk-ant-...      # Store an API key
  neuralforge chat code-mentor "review this"  # Send one message
  neuralforge history code-mentor             # Print the transcript"#
)]
pub struct Cli {
    /// Override the data directory
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send a message to an agent
    Chat(ChatCommand),
    /// Print or clear an agent's transcript
    History(HistoryCommand),
    /// Manage agents
    #[command(subcommand)]
    Agents(AgentsCommand),
    /// Manage provider API keys
    #[command(subcommand)]
    Keys(KeysCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        if self.debug {
            debug!("Debug logging enabled");
        }
        debug!("Starting {}", crate::version::full_version());

        let config = Config::init(self.data_dir).await?;
        debug!("Configuration initialized, data dir {}", config.data_dir.display());

        let app = App::new(config)?;

        match self.command {
            Commands::Chat(cmd) => cmd.execute(&app).await,
            Commands::History(cmd) => cmd.execute(&app),
            Commands::Agents(cmd) => cmd.execute(&app),
            Commands::Keys(cmd) => cmd.execute(&app),
        }
    }
}

use anyhow::Result;
use clap::Subcommand;

use crate::{agent::NewAgent, app::App};

#[derive(Subcommand)]
pub enum AgentsCommand {
    /// List agents
    List,
    /// Create an agent
    Create {
        #[arg(long)]
        name: String,
        /// Persona category, e.g. General or Developer
        #[arg(long = "type")]
        agent_type: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        avatar: Option<String>,
        /// Skill tag; repeat for several
        #[arg(long = "capability", short = 'c', required = true)]
        capabilities: Vec<String>,
    },
    /// Mark an agent as active
    Select { agent_id: String },
}

impl AgentsCommand {
    pub fn execute(self, app: &App) -> Result<()> {
        match self {
            AgentsCommand::List => {
                for agent in app.agents().list() {
                    let marker = if agent.is_active { "*" } else { " " };
                    println!(
                        "{} {} {:<20} {:<24} {:<12} last used: {}",
                        marker, agent.avatar, agent.id, agent.name, agent.agent_type, agent.last_used
                    );
                    println!("      {}", agent.capability_list());
                }
            }
            AgentsCommand::Create {
                name,
                agent_type,
                description,
                avatar,
                capabilities,
            } => {
                let agent = app.agents().create(NewAgent {
                    name,
                    description,
                    agent_type,
                    avatar,
                    capabilities,
                })?;
                println!("Created {} ({})", agent.name, agent.id);
            }
            AgentsCommand::Select { agent_id } => {
                let agent = app.agents().select(&agent_id)?;
                println!("{} {} is now active", agent.avatar, agent.name);
            }
        }
        Ok(())
    }
}

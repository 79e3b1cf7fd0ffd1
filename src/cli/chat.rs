use anyhow::{anyhow, Result};
use clap::Args;
use std::io::{self, IsTerminal, Read};
use tracing::debug;

use crate::{
    app::App,
    llm::{GeneratedResponse, ProviderConfig},
    session::{Message, Sender},
};

const WRAP_WIDTH: usize = 88;

/// Send a message to an agent and print the reply
#[derive(Args)]
pub struct ChatCommand {
    /// Agent id (see `agents list`)
    pub agent_id: String,

    /// The message. If not provided, will read from stdin
    pub message: Vec<String>,
}

impl ChatCommand {
    pub async fn execute(&self, app: &App) -> Result<()> {
        let mut conversation = app.open_conversation(&self.agent_id).await?;
        let message = self.get_message()?;

        if message.trim().is_empty() {
            // Nothing to send: show where the conversation stands
            for message in conversation.messages() {
                print_message(message, &conversation.agent().name);
            }
            return Ok(());
        }

        let response = conversation.send(&message).await?;
        println!("{}", textwrap::fill(&response.text, WRAP_WIDTH));
        println!("{}", reply_footer(&response, &app.config().providers));
        Ok(())
    }

    fn get_message(&self) -> Result<String> {
        if !self.message.is_empty() {
            return Ok(self.message.join(" "));
        }
        if io::stdin().is_terminal() {
            return Ok(String::new());
        }

        debug!("Reading message from stdin");
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow!("Failed to read from stdin: {}", e))?;
        Ok(buffer)
    }
}

/// Print or clear an agent's stored transcript
#[derive(Args)]
pub struct HistoryCommand {
    /// Agent id
    pub agent_id: String,

    /// Delete the transcript instead of printing it
    #[arg(long)]
    pub clear: bool,
}

impl HistoryCommand {
    pub fn execute(&self, app: &App) -> Result<()> {
        let agent = app
            .agents()
            .get(&self.agent_id)
            .ok_or_else(|| anyhow!("Agent not found: {}", self.agent_id))?;

        if self.clear {
            app.sessions().remove(&agent.id);
            println!("Cleared conversation with {}", agent.name);
            return Ok(());
        }

        match app.sessions().load(&agent.id) {
            Some(session) => {
                for message in &session.messages {
                    print_message(message, &agent.name);
                }
            }
            None => println!("No conversation with {} yet", agent.name),
        }
        Ok(())
    }
}

/// Provider tag under a reply, with a hint when no provider answered
fn reply_footer(response: &GeneratedResponse, providers: &[ProviderConfig]) -> String {
    let tag = format!("  [{} / {}]", response.provider, response.model);
    if response.is_remote() || providers.is_empty() {
        return tag;
    }

    let names: Vec<&str> = providers.iter().map(|p| p.name.as_str()).collect();
    format!(
        "{}\n  (offline reply; add a key with `keys set <provider>`, one of: {})",
        tag,
        names.join(", ")
    )
}

fn print_message(message: &Message, agent_name: &str) {
    let who = match message.sender {
        Sender::User => "You",
        Sender::Agent => agent_name,
    };
    println!(
        "[{}] {}:",
        message.timestamp.format("%Y-%m-%d %H:%M"),
        who
    );
    let options = textwrap::Options::new(WRAP_WIDTH)
        .initial_indent("  ")
        .subsequent_indent("  ");
    println!("{}\n", textwrap::fill(&message.text, options));
}

//! Built-in agents seeded when no agent list has been stored yet

use super::{Agent, LastUsed};

/// Avatar used when a form leaves it blank
pub const DEFAULT_AVATAR: &str = "🤖";

/// The agents every fresh installation starts with
pub fn default_agents() -> Vec<Agent> {
    vec![
        builtin(
            "general-assistant",
            "Nova",
            "A friendly generalist that answers questions and helps plan your day.",
            "General",
            "🤖",
            &["Q&A", "Planning", "Summaries"],
        ),
        builtin(
            "code-mentor",
            "Byte",
            "Reviews code, explains errors and suggests cleaner designs.",
            "Developer",
            "💻",
            &["Code Review", "Debugging", "Architecture"],
        ),
        builtin(
            "research-analyst",
            "Sage",
            "Digs through topics and turns them into structured findings.",
            "Research",
            "🔬",
            &["Research", "Analysis", "Reports"],
        ),
    ]
}

fn builtin(
    id: &str,
    name: &str,
    description: &str,
    agent_type: &str,
    avatar: &str,
    capabilities: &[&str],
) -> Agent {
    Agent {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        agent_type: agent_type.to_string(),
        avatar: avatar.to_string(),
        capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
        is_active: false,
        last_used: LastUsed::Never,
    }
}

//! Local template text used when no provider answers

use rand::{seq::SliceRandom, Rng};

use crate::agent::Agent;

/// Provider tag for fallback replies
pub const FALLBACK_PROVIDER: &str = "fallback";

/// Provider tag for greetings
pub const GREETING_PROVIDER: &str = "greeting";

/// Model tag shared by all local text
pub const TEMPLATE_MODEL: &str = "template";

const GREETINGS: &[&str] = &[
    "Hello! I'm {name}, your {type} assistant. I can help with {capabilities}. What would you like to work on today?",
    "Hi there, {name} here. As a {type} agent I specialise in {capabilities}. How can I help?",
    "Welcome! I'm {name}. Ask me anything about {capabilities} and I'll do my best as your {type} companion.",
    "Greetings! {name} at your service. My {type} toolkit covers {capabilities}. Where shall we start?",
];

const FILLERS: &[&str] = &[
    "That's an interesting question, let me think about it from a different angle.",
    "I understand what you're asking. Here is how I would approach it.",
    "Thanks for sharing that. I'd like to help you work through it.",
    "Good point. Let's break this down step by step.",
    "I'm currently working offline, but I can still offer some perspective.",
];

/// Opening line for a new conversation
pub fn greeting<R: Rng + ?Sized>(agent: &Agent, rng: &mut R) -> String {
    let template = GREETINGS.choose(rng).copied().unwrap_or(GREETINGS[0]);
    template
        .replace("{name}", &agent.name)
        .replace("{type}", &agent.agent_type)
        .replace("{capabilities}", &capabilities_phrase(agent))
}

/// Reply used when every provider was skipped or failed
pub fn fallback_reply<R: Rng + ?Sized>(agent: &Agent, rng: &mut R) -> String {
    let filler = FILLERS.choose(rng).copied().unwrap_or(FILLERS[0]);
    let mut reply = format!(
        "{} As {}, your {} agent, I'm here to help.",
        filler, agent.name, agent.agent_type
    );
    let description = agent.description.trim();
    if !description.is_empty() {
        reply.push(' ');
        reply.push_str(description);
    }
    reply
}

fn capabilities_phrase(agent: &Agent) -> String {
    let caps: Vec<&str> = agent
        .capabilities
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();

    match caps.as_slice() {
        [] => "a wide range of topics".to_string(),
        [only] => only.to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::test_support::bot;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_every_greeting_names_the_agent() {
        let agent = bot();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..32 {
            let text = greeting(&agent, &mut rng);
            assert!(text.contains("Bot"));
            assert!(text.contains('X'));
            assert!(!text.contains('{'));
        }
    }

    #[test]
    fn test_fallback_includes_identity() {
        let agent = bot();
        let mut rng = StdRng::seed_from_u64(1);
        let text = fallback_reply(&agent, &mut rng);

        assert!(text.contains("Bot"));
        assert!(text.contains("General"));
        assert!(text.ends_with("A test assistant"));
    }

    #[test]
    fn test_capabilities_phrase() {
        let mut agent = bot();
        agent.capabilities = vec!["Code".into(), "Docs".into(), "Tests".into()];
        assert_eq!(capabilities_phrase(&agent), "Code, Docs and Tests");

        agent.capabilities.clear();
        assert_eq!(capabilities_phrase(&agent), "a wide range of topics");
    }
}

//! Terminal REPL
//!
//! Reads lines with `rustyline`, hands each one to the agent, and prints the
//! response. The only terminal-specific behavior is the progress line before
//! knowledge-base questions and the follow-up prompt when `close <id>` is given
//! without a resolution.

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::agent::{Command, HelpdeskAgent, FAREWELL_MESSAGE};

const PROMPT: &str = "\nYou: ";
const RESOLUTION_PROMPT: &str = "Please provide a valid resolution code to close the ticket: ";
const RESOLUTION_MISSING: &str = "A resolution code is required to close the ticket.";
const CONSULTING: &str = "Consulting the knowledge base (with memory)...";

fn print_banner() {
    println!("{}", "=== AI IT Helpdesk Agent ===".bright_magenta().bold());
    println!("Ask a question about IT policies, or describe an issue to create a ticket.");
    println!("{}", "Commands:".bold());
    println!("  status <ticket_id>                 Show a ticket and its history");
    println!("  close <ticket_id> <resolution>     Resolve and close a ticket");
    println!("  clear                              Forget the conversation so far");
    println!("  exit                               Quit");
}

/// Ticket id to prompt a resolution for, when `input` is `close <id>` for an
/// existing ticket with no resolution given
pub fn pending_close(agent: &HelpdeskAgent, input: &str) -> Option<u64> {
    match Command::parse(input) {
        Ok(Command::Close { id, resolution })
            if resolution.is_empty() && agent.tickets().get(id).is_some() =>
        {
            Some(id)
        }
        _ => None,
    }
}

/// Run the interactive loop until `exit`, Ctrl-C or Ctrl-D
pub async fn run(agent: &mut HelpdeskAgent) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    print_banner();

    loop {
        let line = match rl.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("{}", FAREWELL_MESSAGE.bright_green());
                break;
            }
            Err(e) => return Err(e.into()),
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(input);

        if matches!(Command::parse(input), Ok(Command::Exit)) {
            println!("{}", agent.process(input).await.bright_green());
            break;
        }

        let response = if let Some(id) = pending_close(agent, input) {
            match rl.readline(RESOLUTION_PROMPT) {
                Ok(reply) if !reply.trim().is_empty() => {
                    agent.process(&format!("close {} {}", id, reply.trim())).await
                }
                Ok(_) => RESOLUTION_MISSING.to_string(),
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    RESOLUTION_MISSING.to_string()
                }
                Err(e) => return Err(e.into()),
            }
        } else {
            if matches!(Command::parse(input), Ok(Command::Question(_))) {
                println!("{}", CONSULTING.bright_black());
            }
            agent.process(input).await
        };

        println!("\n{} {}", "Agent:".bright_blue().bold(), response);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::{GatewayError, KnowledgeGateway};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct NoGateway;

    #[async_trait]
    impl KnowledgeGateway for NoGateway {
        async fn answer(&self, _query: &str) -> Result<String, GatewayError> {
            Err(GatewayError::Retrieval("offline".into()))
        }
    }

    #[tokio::test]
    async fn test_pending_close_only_for_existing_ticket_without_resolution() {
        let mut agent = HelpdeskAgent::new(Arc::new(NoGateway));
        agent.process("Laptop battery drains fast").await;

        assert_eq!(pending_close(&agent, "close 1"), Some(1));
        assert_eq!(pending_close(&agent, "close 1 replaced battery"), None);
        assert_eq!(pending_close(&agent, "close 2"), None);
        assert_eq!(pending_close(&agent, "close"), None);
        assert_eq!(pending_close(&agent, "status 1"), None);
    }
}

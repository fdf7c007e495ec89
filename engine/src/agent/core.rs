//! Helpdesk Agent
//!
//! The agent is the single entry point for every presentation adapter. It owns
//! the ticket registry, the conversation memory and the knowledge gateway, and
//! turns one line of input into one response string:
//!
//! 1. Parse the line into a [`Command`]
//! 2. Ticket commands act on the registry
//! 3. Questions go to the knowledge gateway, framed with recent conversation history
//! 4. Anything else becomes a new ticket
//!
//! Every failure is rendered into the response; `process` never fails.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::knowledge::KnowledgeGateway;
use sdk::{TicketRegistry, TicketStatus};

use super::dispatcher::Command;
use super::ConversationMemory;

pub const FAREWELL_MESSAGE: &str = "Thank you for using the IT Helpdesk. Goodbye!";
pub const MEMORY_CLEARED_MESSAGE: &str = "Conversation memory has been cleared.";
pub const RESOLUTION_REQUIRED_MESSAGE: &str =
    "A resolution code is required. Use 'close ticket_id [resolution_text]'.";
pub const NO_TICKETS_MESSAGE: &str = "No tickets created yet.";

const ASSIGNED_REASON: &str = "Assigned to IT workflow.";
const LIFECYCLE_COMPLETE_REASON: &str = "Ticket lifecycle complete.";

/// Helpdesk agent state
pub struct HelpdeskAgent {
    registry: TicketRegistry,
    memory: ConversationMemory,
    gateway: Arc<dyn KnowledgeGateway>,
}

impl HelpdeskAgent {
    /// Create an agent with the default memory capacity
    pub fn new(gateway: Arc<dyn KnowledgeGateway>) -> Self {
        Self::with_memory(gateway, ConversationMemory::new())
    }

    /// Create an agent keeping at most `max_turns` conversation turns
    pub fn with_memory_capacity(gateway: Arc<dyn KnowledgeGateway>, max_turns: usize) -> Self {
        Self::with_memory(gateway, ConversationMemory::with_capacity(max_turns))
    }

    fn with_memory(gateway: Arc<dyn KnowledgeGateway>, memory: ConversationMemory) -> Self {
        Self {
            registry: TicketRegistry::new(),
            memory,
            gateway,
        }
    }

    /// Handle one line of user input
    pub async fn process(&mut self, input: &str) -> String {
        let command = match Command::parse(input) {
            Ok(command) => command,
            Err(usage) => return usage.to_string(),
        };
        debug!(?command, "Dispatching command");

        match command {
            Command::Empty => String::new(),
            Command::Exit => FAREWELL_MESSAGE.to_string(),
            Command::Clear => {
                self.memory.clear();
                MEMORY_CLEARED_MESSAGE.to_string()
            }
            Command::Status { id } => match self.registry.get(id) {
                Some(ticket) => ticket.render(),
                None => not_found(id),
            },
            Command::Close { id, resolution } => self.close_ticket(id, &resolution),
            Command::Question(question) => self.ask(&question).await,
            Command::CreateTicket(description) => self.create_ticket(description),
        }
    }

    fn close_ticket(&mut self, id: u64, resolution: &str) -> String {
        let Some(ticket) = self.registry.get_mut(id) else {
            return not_found(id);
        };

        if resolution.is_empty() {
            return RESOLUTION_REQUIRED_MESSAGE.to_string();
        }

        let resolved = ticket.transition(
            TicketStatus::Resolved,
            format!("Resolution code provided: {}", resolution),
        );
        let closed = ticket.transition(TicketStatus::Closed, LIFECYCLE_COMPLETE_REASON);
        info!(ticket_id = id, "Ticket closed");

        format!("{}\n{}", resolved, closed)
    }

    fn create_ticket(&mut self, description: String) -> String {
        let ticket = self.registry.create(description);
        let id = ticket.id();
        let assigned = ticket.transition(TicketStatus::InProgress, ASSIGNED_REASON);
        info!(ticket_id = id, "Ticket created");

        format!(
            "✅ Ticket #{} created successfully.\nAn IT staff member will be assigned to it shortly.\n{}",
            id, assigned
        )
    }

    async fn ask(&mut self, question: &str) -> String {
        let query = self.augmented_query(question);

        match self.gateway.answer(&query).await {
            Ok(answer) => {
                self.memory.append(format!("User: {}", question));
                self.memory.append(format!("Agent: {}", answer));
                format!(
                    "--- Knowledge Base Answer ---\n{}\n---------------------------",
                    answer
                )
            }
            Err(e) => {
                warn!("Knowledge base query failed: {}", e);
                format!("An error occurred while processing your request: {}", e)
            }
        }
    }

    /// The question, prefixed with conversation history when there is any
    pub fn augmented_query(&self, question: &str) -> String {
        if self.memory.is_empty() {
            return question.to_string();
        }

        format!(
            "Considering the following conversation history:\n---\n{}\n---\n\nNow, please answer this question: {}",
            self.memory.render(),
            question
        )
    }

    pub fn tickets(&self) -> &TicketRegistry {
        &self.registry
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// One summary block per ticket, for ticket panels
    pub fn ticket_summary(&self) -> String {
        if self.registry.is_empty() {
            return NO_TICKETS_MESSAGE.to_string();
        }

        self.registry
            .iter()
            .map(|t| t.summary_line())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

fn not_found(id: u64) -> String {
    format!("Error: Ticket with ID {} not found.", id)
}

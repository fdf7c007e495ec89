//! Integration tests for the helpdesk agent
//!
//! Drives `HelpdeskAgent::process` end to end with a scripted knowledge gateway,
//! covering the ticket lifecycle, memory handling and gateway failures.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use helpdesk_engine::agent::{HelpdeskAgent, FAREWELL_MESSAGE, MEMORY_CLEARED_MESSAGE};
use helpdesk_engine::knowledge::{GatewayError, KnowledgeGateway};
use sdk::TicketStatus;

/// Gateway that replays canned results and records every query it receives
struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<String, GatewayError>>>,
    queries: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    fn new(replies: Vec<Result<String, GatewayError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            queries: Mutex::new(Vec::new()),
        })
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl KnowledgeGateway for ScriptedGateway {
    async fn answer(&self, query: &str) -> Result<String, GatewayError> {
        self.queries.lock().unwrap().push(query.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Generation("no scripted reply".into())))
    }
}

fn agent_with(gateway: Arc<ScriptedGateway>) -> HelpdeskAgent {
    HelpdeskAgent::new(gateway)
}

#[tokio::test]
async fn test_vpn_ticket_lifecycle() {
    let mut agent = agent_with(ScriptedGateway::new(vec![]));

    let created = agent.process("My VPN is not working").await;
    assert!(created.contains("Ticket #1 created successfully"));
    assert_eq!(agent.tickets().get(1).unwrap().status(), TicketStatus::InProgress);

    let status = agent.process("status 1").await;
    assert!(status.contains("Status: In Progress"));
    assert!(status.contains("Description: My VPN is not working"));

    let closed = agent.process("close 1 replaced cable").await;
    assert_eq!(
        closed,
        "Ticket 1 status updated to 'Resolved'.\nTicket 1 status updated to 'Closed'."
    );

    let status = agent.process("status 1").await;
    assert!(status.contains("Status: Closed"));
    assert!(status.contains("Reason: Resolution code provided: replaced cable"));
    assert!(status.contains("Reason: Ticket lifecycle complete."));

    // Creation entry plus three status changes: assignment, resolution, closure
    let ticket = agent.tickets().get(1).unwrap();
    assert_eq!(ticket.log().len(), 4);
    assert_eq!(ticket.log().iter().filter(|e| !e.is_creation()).count(), 3);
    let statuses: Vec<TicketStatus> = ticket.log().iter().map(|e| e.status).collect();
    assert_eq!(
        statuses[statuses.len() - 2..],
        [TicketStatus::Resolved, TicketStatus::Closed]
    );
}

#[tokio::test]
async fn test_close_unknown_ticket() {
    let mut agent = agent_with(ScriptedGateway::new(vec![]));
    agent.process("Outlook keeps crashing").await;

    assert_eq!(
        agent.process("close 99 done").await,
        "Error: Ticket with ID 99 not found."
    );
    assert_eq!(agent.tickets().len(), 1);
    assert_eq!(agent.tickets().get(1).unwrap().status(), TicketStatus::InProgress);
}

#[tokio::test]
async fn test_status_unknown_and_malformed() {
    let mut agent = agent_with(ScriptedGateway::new(vec![]));

    assert_eq!(
        agent.process("status 5").await,
        "Error: Ticket with ID 5 not found."
    );
    assert_eq!(
        agent.process("status five").await,
        "Invalid command. Use 'status <ticket_id>'."
    );
    assert_eq!(
        agent.process("close").await,
        "Invalid command. Use 'close <ticket_id> <resolution_text>'."
    );
    assert!(agent.tickets().is_empty());
}

#[tokio::test]
async fn test_two_questions_build_memory() {
    let gateway = ScriptedGateway::new(vec![Ok("a1".into()), Ok("a2".into())]);
    let mut agent = agent_with(gateway.clone());

    let first = agent.process("How do I reset my password?").await;
    assert_eq!(
        first,
        "--- Knowledge Base Answer ---\na1\n---------------------------"
    );
    agent.process("What about on mobile?").await;

    assert_eq!(
        agent.memory().turns(),
        vec![
            "User: How do I reset my password?",
            "Agent: a1",
            "User: What about on mobile?",
            "Agent: a2",
        ]
    );

    let queries = gateway.queries();
    assert_eq!(queries[0], "How do I reset my password?");
    assert_eq!(
        queries[1],
        "Considering the following conversation history:\n---\nUser: How do I reset my password?\nAgent: a1\n---\n\nNow, please answer this question: What about on mobile?"
    );
}

#[tokio::test]
async fn test_gateway_failure_leaves_memory_untouched() {
    let gateway = ScriptedGateway::new(vec![
        Ok("Use the VPN client.".into()),
        Err(GatewayError::Retrieval("index unavailable".into())),
    ]);
    let mut agent = agent_with(gateway);

    agent.process("how do I connect to the VPN?").await;
    let response = agent.process("what is the wifi password?").await;

    assert_eq!(
        response,
        "An error occurred while processing your request: Retrieval failed: index unavailable"
    );
    assert_eq!(agent.memory().len(), 2);
}

#[tokio::test]
async fn test_memory_window_slides() {
    let replies = (0..6).map(|i| Ok(format!("a{}", i))).collect();
    let mut agent = agent_with(ScriptedGateway::new(replies));

    for i in 0..6 {
        agent.process(&format!("what is q{}?", i)).await;
    }

    let turns = agent.memory().turns();
    assert_eq!(turns.len(), 10);
    assert_eq!(turns[0], "User: what is q1?");
    assert_eq!(turns[9], "Agent: a5");
}

#[tokio::test]
async fn test_clear_and_exit() {
    let mut agent = agent_with(ScriptedGateway::new(vec![Ok("answer".into())]));
    agent.process("how do I print?").await;

    assert_eq!(agent.process("clear").await, MEMORY_CLEARED_MESSAGE);
    assert!(agent.memory().is_empty());
    assert_eq!(agent.process("CLEAR").await, MEMORY_CLEARED_MESSAGE);

    assert_eq!(agent.process("exit").await, FAREWELL_MESSAGE);
    // The agent stays usable after exit
    assert!(agent.process("Need a new mouse").await.contains("Ticket #1"));
}

#[tokio::test]
async fn test_close_accepts_any_prior_status() {
    let mut agent = agent_with(ScriptedGateway::new(vec![]));
    agent.process("Badge reader broken").await;
    agent.process("close 1 first fix").await;

    // Closing an already closed ticket is not rejected
    agent.process("close 1 second fix").await;
    let ticket = agent.tickets().get(1).unwrap();
    assert_eq!(ticket.status(), TicketStatus::Closed);
    assert_eq!(ticket.log().len(), 6);
}

#[tokio::test]
async fn test_ticket_ids_increase() {
    let mut agent = agent_with(ScriptedGateway::new(vec![]));

    assert!(agent.process("Laptop fan noisy").await.contains("Ticket #1"));
    assert!(agent.process("Phone not ringing").await.contains("Ticket #2"));
    assert!(agent.ticket_summary().contains("ID: 2 | Status: In Progress"));
}

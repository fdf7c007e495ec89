//! Command parsing
//!
//! Classifies one line of user input. Checks run in a fixed priority order and
//! keyword matching is case-insensitive; the input text is kept as typed for questions
//! and ticket descriptions.

/// A parsed line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Blank input
    Empty,
    Exit,
    Clear,
    Status { id: u64 },
    /// `resolution` may be empty; the agent rejects that after the id lookup
    Close { id: u64, resolution: String },
    Question(String),
    CreateTicket(String),
}

/// Malformed `status` / `close` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("Invalid command. Use 'status <ticket_id>'.")]
    Status,

    #[error("Invalid command. Use 'close <ticket_id> <resolution_text>'.")]
    Close,
}

impl Command {
    pub fn parse(input: &str) -> Result<Command, UsageError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Command::Empty);
        }

        let lower = input.to_lowercase();

        if lower == "exit" {
            return Ok(Command::Exit);
        }

        if lower == "clear" {
            return Ok(Command::Clear);
        }

        if lower.starts_with("status") {
            let id = parse_id(input).ok_or(UsageError::Status)?;
            return Ok(Command::Status { id });
        }

        if lower.starts_with("close") {
            let id = parse_id(input).ok_or(UsageError::Close)?;
            let resolution = input.split_whitespace().skip(2).collect::<Vec<_>>().join(" ");
            return Ok(Command::Close { id, resolution });
        }

        if is_question(input) {
            return Ok(Command::Question(input.to_string()));
        }

        Ok(Command::CreateTicket(input.to_string()))
    }
}

/// Whether `input` reads as a knowledge-base question
pub fn is_question(input: &str) -> bool {
    let lower = input.to_lowercase();
    lower.contains("how") || lower.contains("what") || lower.contains('?')
}

/// Second whitespace-separated token as a ticket id
fn parse_id(input: &str) -> Option<u64> {
    input.split_whitespace().nth(1)?.parse().ok()
}

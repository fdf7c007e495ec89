//! Ticket record and status state machine
//!
//! A ticket carries an append-only audit log. Every status change appends exactly
//! one entry, so the current status always matches the newest entry. Transitions are
//! not checked against a transition table: any status may move to any status.

use chrono::{DateTime, Local};
use std::fmt;

/// Number of description characters shown in a ticket summary line
const SUMMARY_DESCRIPTION_CHARS: usize = 50;

/// Lifecycle status of a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TicketStatus {
    /// Just created, not yet picked up
    #[default]
    New,

    /// Assigned to the IT workflow
    InProgress,

    /// A resolution has been recorded
    Resolved,

    /// Lifecycle complete
    Closed,
}

impl TicketStatus {
    /// Human-readable label used in rendered tickets and confirmations
    pub fn label(&self) -> &'static str {
        match self {
            TicketStatus::New => "New",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::Resolved => "Resolved",
            TicketStatus::Closed => "Closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Created,
    StatusChanged,
}

/// One entry of a ticket's audit log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// When the entry was recorded
    pub timestamp: DateTime<Local>,

    /// Status the ticket held after this entry
    pub status: TicketStatus,

    /// Why the entry was recorded
    pub reason: String,

    kind: EntryKind,
}

impl LogEntry {
    fn created(description: &str) -> Self {
        Self {
            timestamp: Local::now(),
            status: TicketStatus::New,
            reason: description.to_string(),
            kind: EntryKind::Created,
        }
    }

    fn status_changed(status: TicketStatus, reason: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            status,
            reason: reason.into(),
            kind: EntryKind::StatusChanged,
        }
    }

    /// Whether this is the entry recorded when the ticket was opened
    pub fn is_creation(&self) -> bool {
        self.kind == EntryKind::Created
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ts = self.timestamp.format("%Y-%m-%dT%H:%M:%S%.6f");
        match self.kind {
            EntryKind::Created => write!(
                f,
                "{}: Ticket created. Status: {}. Description: {}",
                ts, self.status, self.reason
            ),
            EntryKind::StatusChanged => write!(
                f,
                "{}: Status changed to {}. Reason: {}",
                ts, self.status, self.reason
            ),
        }
    }
}

/// An IT support ticket
#[derive(Debug, Clone)]
pub struct Ticket {
    id: u64,
    description: String,
    status: TicketStatus,
    created_at: DateTime<Local>,
    log: Vec<LogEntry>,
}

impl Ticket {
    /// Open a new ticket in status `New` with a single creation log entry
    pub fn create(id: u64, description: impl Into<String>) -> Self {
        let description = description.into();
        let entry = LogEntry::created(&description);

        Self {
            id,
            created_at: entry.timestamp,
            description,
            status: TicketStatus::New,
            log: vec![entry],
        }
    }

    /// Move the ticket to `new_status`, recording `reason` in the log
    ///
    /// Returns a confirmation message suitable for display.
    pub fn transition(&mut self, new_status: TicketStatus, reason: impl Into<String>) -> String {
        self.status = new_status;
        self.log.push(LogEntry::status_changed(new_status, reason));
        format!("Ticket {} status updated to '{}'.", self.id, self.status)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> TicketStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    /// Audit log, oldest entry first
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Multi-line dump of the ticket and its full log
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Two-line summary used by the ticket panel of the web adapter
    pub fn summary_line(&self) -> String {
        let desc: String = self
            .description
            .chars()
            .take(SUMMARY_DESCRIPTION_CHARS)
            .collect();
        format!("ID: {} | Status: {}\nDesc: {}...", self.id, self.status, desc)
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Ticket ID: {} ---", self.id)?;
        writeln!(f, "   Status: {}", self.status)?;
        writeln!(f, "   Description: {}", self.description)?;
        writeln!(
            f,
            "   Created: {}",
            self.created_at.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(f, "   --- Log ---")?;
        for entry in &self.log {
            writeln!(f, "     - {}", entry)?;
        }
        write!(f, "   --------------")
    }
}

//! In-memory ticket registry
//!
//! Owns every ticket for the lifetime of the process. Tickets are never removed.

use crate::ticket::Ticket;
use std::collections::BTreeMap;

/// Mapping from ticket id to ticket, plus the next-id counter
#[derive(Debug, Clone)]
pub struct TicketRegistry {
    tickets: BTreeMap<u64, Ticket>,
    next_id: u64,
}

impl TicketRegistry {
    /// Create an empty registry; the first ticket gets id 1
    pub fn new() -> Self {
        Self {
            tickets: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Open a new ticket with the next id and return it
    pub fn create(&mut self, description: impl Into<String>) -> &mut Ticket {
        let id = self.next_id;
        self.next_id += 1;
        self.tickets
            .entry(id)
            .or_insert_with(|| Ticket::create(id, description))
    }

    pub fn get(&self, id: u64) -> Option<&Ticket> {
        self.tickets.get(&id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut Ticket> {
        self.tickets.get_mut(&id)
    }

    /// Tickets in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &Ticket> {
        self.tickets.values()
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Id the next created ticket will receive
    pub fn next_id(&self) -> u64 {
        self.next_id
    }
}

impl Default for TicketRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//! Conversation Memory
//!
//! Holds the most recent conversation turns (`User: ...` / `Agent: ...`) so
//! follow-up questions can be answered in context. Only knowledge-base exchanges
//! are recorded. Once the capacity is reached the oldest turns are evicted first.

use std::collections::VecDeque;

/// Default number of turns kept (five question/answer exchanges)
pub const DEFAULT_MAX_TURNS: usize = 10;

/// Bounded FIFO of conversation turns
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    turns: VecDeque<String>,
    capacity: usize,
}

impl ConversationMemory {
    /// Create an empty memory with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_TURNS)
    }

    /// Create an empty memory holding at most `capacity` turns
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            turns: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a turn, evicting from the front while over capacity
    pub fn append(&mut self, turn: impl Into<String>) {
        self.turns.push_back(turn.into());
        while self.turns.len() > self.capacity {
            self.turns.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Turns in order, most recent last
    pub fn turns(&self) -> Vec<&str> {
        self.iter().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.turns.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Turns joined by newlines, oldest first
    pub fn render(&self) -> String {
        self.turns().join("\n")
    }
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new()
    }
}

use std::collections::{BTreeMap, VecDeque};

use blocksmith_edit::{Pick, ToolMode};
use blocksmith_runtime::Ticket;
use blocksmith_structures::{ImportError, Structure};
use blocksmith_world::Color;

pub enum Event {
    // Tool state
    ToolModeSelected { mode: ToolMode },
    ColorSelected { color: Color },

    // World edits
    PickRequested { pick: Pick },
    ClearRequested,

    // Collaborators
    StructureRequested { prompt: String },
    StructureArrived {
        ticket: Ticket,
        prompt: String,
        result: Result<Structure, ImportError>,
        t_total_ms: u32,
    },
    ChallengeRequested,
    ChallengeArrived { ticket: Ticket, text: String },
}

pub struct EventEnvelope {
    pub id: u64,
    pub tick: u64,
    pub kind: Event,
}

/// Tick-bucketed FIFO. Events emitted during a tick run before the tick ends.
pub struct EventQueue {
    by_tick: BTreeMap<u64, VecDeque<EventEnvelope>>,
    pub now: u64,
    next_id: u64,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self {
            by_tick: BTreeMap::new(),
            now: 0,
            next_id: 1,
        }
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    pub fn emit_now(&mut self, kind: Event) -> u64 {
        let id = self.alloc_id();
        let env = EventEnvelope {
            id,
            tick: self.now,
            kind,
        };
        self.by_tick.entry(self.now).or_default().push_back(env);
        id
    }

    pub fn pop_ready(&mut self) -> Option<EventEnvelope> {
        self.by_tick.get_mut(&self.now).and_then(VecDeque::pop_front)
    }

    pub fn advance_tick(&mut self) {
        if self.by_tick.get(&self.now).is_some_and(VecDeque::is_empty) {
            self.by_tick.remove(&self.now);
        }
        self.now = self.now.wrapping_add(1);
    }
}

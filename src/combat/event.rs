//! Scheduled events and the deterministic priority queue that orders them.
//!
//! Events are ordered by:
//! 1. Time (earlier first)
//! 2. Priority (lower first)
//! 3. Sequence number (FIFO for equal time and priority)

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Chained burn applications resolve after everything else at the same instant.
pub const PRIORITY_CHAINED: i32 = 1;
pub const PRIORITY_DEFAULT: i32 = 0;
/// Explosions resolve before other events at the same instant.
pub const PRIORITY_EXPLODE: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PulseShape {
    /// Base pulse batch. `ratio` is the emitter's own damage ratio, if it has one.
    Batch {
        count: u32,
        ratio: Option<f64>,
        interval: Option<f64>,
    },
    /// Already-scaled one-shot hit. Never reschedules and triggers nothing.
    Echo { ratio: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    SkillCast {
        source: usize,
    },
    IceArrow {
        source: usize,
        count: u32,
        interval: f64,
    },
    BurnApply {
        source: Option<usize>,
        stacks: u32,
        interval: Option<f64>,
    },
    DotTick {
        source: Option<usize>,
        generation: u64,
    },
    Pulse {
        source: usize,
        shape: PulseShape,
    },
    BurnExplode {
        source: usize,
    },
    BuffExpire {
        aura: String,
    },
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SkillCast { .. } => "skill_cast",
            Self::IceArrow { .. } => "ice_arrow",
            Self::BurnApply { .. } => "burn_apply",
            Self::DotTick { .. } => "dot_tick",
            Self::Pulse {
                shape: PulseShape::Echo { .. },
                ..
            } => "pulse_echo",
            Self::Pulse { .. } => "pulse",
            Self::BurnExplode { .. } => "burn_explode",
            Self::BuffExpire { .. } => "buff_expire",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub time: f64,
    pub priority: i32,
    pub kind: EventKind,
}

impl Event {
    pub fn at(time: f64, kind: EventKind) -> Self {
        Self {
            time,
            priority: PRIORITY_DEFAULT,
            kind,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventKey {
    pub time: f64,
    pub priority: i32,
    pub sequence: u64,
}

impl Eq for EventKey {}

impl Ord for EventKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then_with(|| self.priority.cmp(&other.priority))
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

impl PartialOrd for EventKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug)]
struct Scheduled {
    key: EventKey,
    event: Event,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Scheduled {}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-queue of future events.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Reverse<Scheduled>>,
    next_sequence: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, event: Event) {
        debug_assert!(event.time.is_finite(), "event time must be finite: {event:?}");
        let key = EventKey {
            time: event.time,
            priority: event.priority,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.heap.push(Reverse(Scheduled { key, event }));
    }

    pub fn pop_next(&mut self) -> Option<Event> {
        self.heap.pop().map(|Reverse(scheduled)| scheduled.event)
    }

    pub fn peek_time(&self) -> Option<f64> {
        self.heap.peek().map(|Reverse(scheduled)| scheduled.key.time)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

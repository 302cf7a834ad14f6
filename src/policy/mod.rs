use keyed_priority_queue::KeyedPriorityQueue;
use std::collections::VecDeque;

use crate::core::state::{Pid, Process, Slot, Tick};

/// The closed set of scheduling disciplines, fixed at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// First-come, first-served: run to completion in arrival order.
    Fcfs,
    /// Shortest job first: non-preemptive, ordered by total burst.
    Sjf,
    /// Shortest remaining time first: preemptive on arrivals and completions.
    Srtf,
    /// Round-robin over a FIFO, one quantum per dispatch.
    Rr { quantum: Tick },
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fcfs => "FCFS",
            Self::Sjf => "SJF",
            Self::Srtf => "SRTF",
            Self::Rr { .. } => "RR",
        }
    }

    pub fn preemptive(&self) -> bool {
        matches!(self, Self::Srtf)
    }

    pub fn quantum(&self) -> Option<Tick> {
        match self {
            Self::Rr { quantum } => Some(*quantum),
            _ => None,
        }
    }

    /// Ordering key for a process at a decision point. The primary key is
    /// algorithm-specific; the priority-then-PID suffix is shared by all
    /// four disciplines. RR keys on arrival, which only ever matters when a
    /// simultaneous-arrival batch is ordered before FIFO insertion.
    pub fn ready_key(&self, p: &Process) -> ReadyKey {
        let primary = match self {
            Self::Fcfs | Self::Rr { .. } => p.arrival,
            Self::Sjf => p.burst,
            Self::Srtf => p.remaining,
        };
        ReadyKey {
            primary,
            priority: p.priority,
            pid: p.pid,
        }
    }
}

/// Three-level dispatch key: primary ascending, then priority descending,
/// then PID ascending. PIDs are unique, so the order is total.
///
/// KeyedPriorityQueue is a max-heap, so Ord is flipped: the greatest key is
/// the next process to dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReadyKey {
    pub primary: Tick,
    pub priority: i32,
    pub pid: Pid,
}

impl PartialOrd for ReadyKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ReadyKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .primary
            .cmp(&self.primary)
            .then(self.priority.cmp(&other.priority))
            .then(other.pid.cmp(&self.pid))
    }
}

impl ReadyKey {
    /// True if `self` dispatches before `other`.
    pub fn runs_before(&self, other: &Self) -> bool {
        self > other
    }
}

/// Ready processes, shaped per algorithm: RR keeps an explicit FIFO, the
/// other three keep a priority queue over `ReadyKey`. Keys are computed at
/// push time; a queued process never mutates, so keys cannot go stale.
#[derive(Debug)]
pub enum ReadyQueue {
    Fifo { slots: VecDeque<Slot> },
    Priq { slots: KeyedPriorityQueue<Slot, ReadyKey> },
}

impl ReadyQueue {
    pub fn for_algorithm(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Rr { .. } => Self::Fifo {
                slots: VecDeque::new(),
            },
            _ => Self::Priq {
                slots: KeyedPriorityQueue::new(),
            },
        }
    }

    pub fn push(&mut self, slot: Slot, key: ReadyKey) {
        match self {
            Self::Fifo { slots } => slots.push_back(slot),
            Self::Priq { slots } => {
                slots.push(slot, key);
            }
        }
    }

    pub fn pop(&mut self) -> Option<Slot> {
        match self {
            Self::Fifo { slots } => slots.pop_front(),
            Self::Priq { slots } => slots.pop().map(|entry| entry.0),
        }
    }

    pub fn peek(&self) -> Option<Slot> {
        match self {
            Self::Fifo { slots } => slots.front().copied(),
            Self::Priq { slots } => slots.peek().map(|entry| *entry.0),
        }
    }

    pub fn contains(&self, slot: Slot) -> bool {
        match self {
            Self::Fifo { slots } => slots.contains(&slot),
            Self::Priq { slots } => slots.get_priority(&slot).is_some(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Fifo { slots } => slots.len(),
            Self::Priq { slots } => slots.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

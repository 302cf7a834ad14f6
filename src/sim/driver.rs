use std::cmp::Reverse;

use tracing::debug;

use super::workload::ProcessSpec;
use crate::core::driver::Engine;
use crate::core::state::{CpuState, Machine, Pid, Process, Slot, Tick};
use crate::policy::{Algorithm, ReadyQueue};

/// One simulation run: feeds arrivals to the engine in tick order and steps
/// it until every process has completed. Deterministic; identical inputs
/// produce identical schedules.
pub struct Sim {
    pub engine: Engine,
    // Sorted by (arrival, priority desc, pid); slot i in the Machine is
    // specs[i], so a simultaneous-arrival batch enqueues in comparator
    // order — which is what fixes the RR FIFO insertion order.
    specs: Vec<ProcessSpec>,
    cursor: usize,
}

impl Sim {
    pub fn new(mut specs: Vec<ProcessSpec>, num_cpus: usize, algorithm: Algorithm) -> Self {
        specs.sort_by_key(|s| (s.arrival, Reverse(s.priority), s.pid));
        let machine = Machine::new(&specs, num_cpus, ReadyQueue::for_algorithm(algorithm));
        Self {
            engine: Engine::new(machine, algorithm),
            specs,
            cursor: 0,
        }
    }

    /// One tick: enqueue this tick's arrivals, then let the engine run.
    /// Returns the slots of processes that completed.
    pub fn step(&mut self) -> Vec<Slot> {
        self.handle_arrivals();
        self.engine.tick()
    }

    fn handle_arrivals(&mut self) {
        let now = self.engine.now();
        // Contiguous, since specs are sorted by arrival.
        while self.cursor < self.specs.len() && self.specs[self.cursor].arrival == now {
            let slot = self.cursor;
            self.engine.machine.mark_ready(slot);
            let key = self
                .engine
                .algorithm()
                .ready_key(self.engine.machine.proc(slot));
            self.engine.machine.enqueue_ready(slot, key);
            debug!(pid = self.specs[slot].pid, now, "arrived");
            self.cursor += 1;
        }
    }

    pub fn all_completed(&self) -> bool {
        self.engine.machine.all_completed()
    }

    /// Run the whole schedule to completion.
    pub fn run(mut self) -> Schedule {
        while !self.all_completed() {
            self.step();
        }
        let machine = self.engine.machine;
        Schedule {
            makespan: machine.now,
            procs: machine.procs,
            cpus: machine.cpus,
            timeline: machine.timeline,
        }
    }
}

/// The completed process table and CPU bank of one run; read-only input to
/// the statistics aggregator.
#[derive(Debug)]
pub struct Schedule {
    pub procs: Vec<Process>,
    pub cpus: Vec<CpuState>,
    pub timeline: Vec<Vec<Option<Pid>>>,
    /// Finish time of the last process to complete; 0 for an empty workload.
    pub makespan: Tick,
}

impl Schedule {
    pub fn proc(&self, pid: Pid) -> Option<&Process> {
        self.procs.iter().find(|p| p.pid == pid)
    }
}

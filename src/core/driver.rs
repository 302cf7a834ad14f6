use tracing::debug;

use super::observer::Observer;
use super::state::{CpuId, Machine, Slot, Tick};
use crate::policy::Algorithm;

/// Drives one `Machine` through the per-tick event sequence:
/// quantum expiry (RR), preemption check (SRTF), dispatch to free CPUs in
/// ascending id order, then one tick of execution with busy/idle accounting.
/// Arrivals are fed in by the owning `Sim` before each tick.
pub struct Engine {
    pub machine: Machine,
    algorithm: Algorithm,
    observer: Observer,
}

impl Engine {
    pub fn new(machine: Machine, algorithm: Algorithm) -> Self {
        Self {
            machine,
            algorithm,
            observer: Observer::new(),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn now(&self) -> Tick {
        self.machine.now
    }

    /// Advance the simulation by one tick. Returns the slots of processes
    /// that completed during it.
    pub fn tick(&mut self) -> Vec<Slot> {
        if let Some(quantum) = self.algorithm.quantum() {
            self.expire_quanta(quantum);
        }
        if self.algorithm.preemptive() {
            self.run_preemption_checks();
        }
        self.dispatch();
        self.machine.record_timeline();
        let completed = self.execute();
        self.machine.advance_time(1);
        self.observer.observe(&self.machine);
        completed
    }

    /// RR: a running process that has used up its quantum re-enters the back
    /// of the FIFO, behind any process that arrived this tick. CPUs are
    /// scanned in ascending id order; the freed CPUs are refilled by the
    /// dispatch step of the same tick.
    fn expire_quanta(&mut self, quantum: Tick) {
        for cpu in 0..self.machine.cpus.len() {
            let Some(slot) = self.machine.cpus[cpu].current else {
                continue;
            };
            let p = self.machine.proc(slot);
            if p.quantum_used >= quantum && p.remaining > 0 {
                debug!(pid = p.pid, cpu, "quantum expired, requeueing");
                self.machine.clear_cpu(cpu);
                self.machine.mark_ready(slot);
                let key = self.algorithm.ready_key(self.machine.proc(slot));
                self.machine.enqueue_ready(slot, key);
            }
        }
    }

    /// SRTF: while every CPU is occupied and the best ready process orders
    /// strictly before the worst incumbent under the full three-level
    /// comparator, swap them. A remaining-time tie preempts only if the
    /// candidate wins the priority-then-PID suffix. With an idle CPU the
    /// dispatch step places the candidate instead.
    fn run_preemption_checks(&mut self) {
        loop {
            if self.machine.any_cpu_idle() {
                break;
            }
            let Some(candidate) = self.machine.ready.peek() else {
                break;
            };
            let Some(cpu) = self.worst_incumbent_cpu() else {
                break;
            };
            let Some(incumbent) = self.machine.cpus[cpu].current else {
                break;
            };

            let candidate_key = self.algorithm.ready_key(self.machine.proc(candidate));
            let incumbent_key = self.algorithm.ready_key(self.machine.proc(incumbent));
            if !candidate_key.runs_before(&incumbent_key) {
                break;
            }

            debug!(
                preempted = self.machine.proc(incumbent).pid,
                by = self.machine.proc(candidate).pid,
                cpu,
                "preemption"
            );
            let popped = self.machine.ready.pop();
            debug_assert_eq!(popped, Some(candidate));
            self.machine.clear_cpu(cpu);
            self.machine.mark_ready(incumbent);
            let requeue_key = self.algorithm.ready_key(self.machine.proc(incumbent));
            self.machine.enqueue_ready(incumbent, requeue_key);
            self.machine.set_running(cpu, candidate);
        }
    }

    /// The CPU hosting the largest remaining time; among ties, the highest
    /// CPU id. Remaining time alone picks the victim; the full comparator
    /// only decides whether the candidate may displace it.
    fn worst_incumbent_cpu(&self) -> Option<CpuId> {
        self.machine
            .cpus
            .iter()
            .filter_map(|cpu| {
                cpu.current
                    .map(|slot| (cpu.id, self.machine.proc(slot).remaining))
            })
            .max_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)))
            .map(|(id, _)| id)
    }

    /// Free CPUs in ascending id order each receive the best-ordered ready
    /// process until CPUs or ready processes run out.
    fn dispatch(&mut self) {
        for cpu in 0..self.machine.cpus.len() {
            if !self.machine.cpu_is_idle(cpu) {
                continue;
            }
            let Some(slot) = self.machine.ready.pop() else {
                break;
            };
            self.machine.set_running(cpu, slot);
            debug!(
                pid = self.machine.proc(slot).pid,
                cpu,
                now = self.machine.now,
                "dispatched"
            );
        }
    }

    /// Run one tick on every CPU. An occupied CPU executes its process and
    /// accrues busy time; an empty one accrues idle time. A process whose
    /// remaining time hits zero finishes at `now + 1`.
    fn execute(&mut self) -> Vec<Slot> {
        let finish_at = self.machine.now + 1;
        let mut completed = Vec::new();

        for cpu in 0..self.machine.cpus.len() {
            let Some(slot) = self.machine.cpus[cpu].current else {
                self.machine.cpus[cpu].idle += 1;
                continue;
            };

            // Own block to avoid holding the process borrow across the
            // CPU-bank update.
            let finished = {
                let p = self.machine.proc_mut(slot);
                debug_assert!(p.remaining > 0, "running process {} has no work", p.pid);
                p.remaining -= 1;
                p.quantum_used += 1;
                p.remaining == 0
            };
            self.machine.cpus[cpu].busy += 1;

            if finished {
                self.machine.clear_cpu(cpu);
                self.machine.mark_completed(slot, finish_at);
                debug!(
                    pid = self.machine.proc(slot).pid,
                    cpu,
                    finish = finish_at,
                    "completed"
                );
                completed.push(slot);
            }
        }

        completed
    }
}

use super::state::{Machine, ProcState};

/// Debug-build consistency checker, run after every tick.
#[derive(Debug)]
pub struct Observer {
    ticks_seen: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self { ticks_seen: 0 }
    }

    pub fn observe(&mut self, machine: &Machine) {
        self.ticks_seen += 1;
        debug_assert_eq!(self.ticks_seen, machine.now, "Observer out of step");

        for cpu in &machine.cpus {
            debug_assert_eq!(
                cpu.busy + cpu.idle,
                machine.now,
                "CPU {} busy+idle must equal elapsed time",
                cpu.id
            );
            if let Some(slot) = cpu.current {
                let p = machine.proc(slot);
                debug_assert_eq!(
                    p.state,
                    ProcState::Running,
                    "occupant {} of CPU {} must be Running",
                    p.pid,
                    cpu.id
                );
                debug_assert_eq!(
                    p.current_cpu,
                    Some(cpu.id),
                    "process {} current_cpu does not match its CPU",
                    p.pid
                );
            }
        }

        for (slot, p) in machine.procs.iter().enumerate() {
            debug_assert!(
                p.remaining <= p.burst,
                "process {} remaining exceeds burst",
                p.pid
            );
            match p.state {
                ProcState::Waiting => {
                    debug_assert!(
                        p.arrival >= machine.now,
                        "process {} arrived but is still Waiting",
                        p.pid
                    );
                }
                ProcState::Ready => {
                    debug_assert!(
                        machine.ready.contains(slot),
                        "ready process {} missing from the queue",
                        p.pid
                    );
                    debug_assert!(p.current_cpu.is_none());
                }
                ProcState::Running => {
                    debug_assert!(
                        !machine.ready.contains(slot),
                        "running process {} still enqueued",
                        p.pid
                    );
                }
                ProcState::Completed => {
                    debug_assert_eq!(p.remaining, 0);
                    debug_assert!(
                        p.start.is_some() && p.finish.is_some(),
                        "completed process {} missing timestamps",
                        p.pid
                    );
                    debug_assert!(
                        !machine.ready.contains(slot),
                        "completed process {} still enqueued",
                        p.pid
                    );
                }
            }
        }
    }
}

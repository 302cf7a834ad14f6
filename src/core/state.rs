use crate::policy::{ReadyKey, ReadyQueue};
use crate::sim::workload::ProcessSpec;

pub type Pid = u32;
pub type CpuId = usize;
pub type Tick = u64;
// Index into the process table Vec
pub type Slot = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcState {
    /// Not yet arrived.
    Waiting,
    /// Arrived, queued, not on a CPU.
    Ready,
    Running,
    Completed,
}

#[derive(Debug, Clone)]
pub struct Process {
    pub pid: Pid,
    pub arrival: Tick,
    pub burst: Tick,
    pub priority: i32,
    pub state: ProcState,
    pub remaining: Tick,
    /// Ticks executed since the last dispatch; RR quantum bookkeeping.
    pub quantum_used: Tick,
    pub current_cpu: Option<CpuId>,
    /// Tick of first dispatch; set at most once.
    pub start: Option<Tick>,
    /// Tick of completion; set exactly once, when `remaining` hits zero.
    pub finish: Option<Tick>,
}

impl Process {
    fn from_spec(spec: &ProcessSpec) -> Self {
        Self {
            pid: spec.pid,
            arrival: spec.arrival,
            burst: spec.burst,
            priority: spec.priority,
            state: ProcState::Waiting,
            remaining: spec.burst,
            quantum_used: 0,
            current_cpu: None,
            start: None,
            finish: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CpuState {
    pub id: CpuId,
    pub current: Option<Slot>,
    pub busy: Tick,
    pub idle: Tick,
}

/// All mutable state of one simulation run: the clock, the process table,
/// the CPU bank, the ready queue, and the per-tick occupancy timeline.
/// Owned by a single `Engine`; nothing here is shared or global.
#[derive(Debug)]
pub struct Machine {
    pub now: Tick,
    pub cpus: Vec<CpuState>,
    pub procs: Vec<Process>,
    pub ready: ReadyQueue,
    /// timeline[tick][cpu] = PID occupying that CPU during that tick.
    pub timeline: Vec<Vec<Option<Pid>>>,
}

impl Machine {
    pub fn new(specs: &[ProcessSpec], num_cpus: usize, ready: ReadyQueue) -> Self {
        assert!(num_cpus > 0, "Machine requires at least one CPU");
        Self {
            now: 0,
            cpus: (0..num_cpus)
                .map(|id| CpuState {
                    id,
                    current: None,
                    busy: 0,
                    idle: 0,
                })
                .collect(),
            procs: specs.iter().map(Process::from_spec).collect(),
            ready,
            timeline: Vec::new(),
        }
    }

    pub fn advance_time(&mut self, delta: Tick) {
        self.now = self.now.saturating_add(delta);
    }

    pub fn proc(&self, slot: Slot) -> &Process {
        &self.procs[slot]
    }

    pub fn proc_mut(&mut self, slot: Slot) -> &mut Process {
        &mut self.procs[slot]
    }

    pub fn cpu_is_idle(&self, cpu: CpuId) -> bool {
        self.cpus[cpu].current.is_none()
    }

    pub fn any_cpu_idle(&self) -> bool {
        self.cpus.iter().any(|cpu| cpu.current.is_none())
    }

    pub fn all_completed(&self) -> bool {
        self.procs.iter().all(|p| p.state == ProcState::Completed)
    }

    pub fn mark_ready(&mut self, slot: Slot) {
        let p = self.proc_mut(slot);
        debug_assert!(
            p.state != ProcState::Completed,
            "completed process {} cannot become ready",
            p.pid
        );
        p.state = ProcState::Ready;
        p.current_cpu = None;
    }

    /// Queue a ready process under the given dispatch key.
    pub fn enqueue_ready(&mut self, slot: Slot, key: ReadyKey) {
        let p = self.proc(slot);
        debug_assert_eq!(
            p.state,
            ProcState::Ready,
            "process {} must be Ready when enqueued",
            p.pid
        );
        debug_assert!(
            !self.ready.contains(slot),
            "process {} already present in the ready queue",
            p.pid
        );
        self.ready.push(slot, key);
    }

    /// Assign a process to an empty CPU, stamping `start` on first dispatch.
    pub fn set_running(&mut self, cpu: CpuId, slot: Slot) {
        assert!(
            self.cpus[cpu].current.is_none(),
            "CPU {cpu} already running a process"
        );
        debug_assert!(
            !self.ready.contains(slot),
            "running process must not remain enqueued"
        );

        self.cpus[cpu].current = Some(slot);
        let now = self.now;
        let p = self.proc_mut(slot);
        debug_assert!(p.remaining > 0, "process {} has no work left", p.pid);
        p.state = ProcState::Running;
        p.current_cpu = Some(cpu);
        p.quantum_used = 0;
        if p.start.is_none() {
            p.start = Some(now);
        }
    }

    pub fn clear_cpu(&mut self, cpu: CpuId) {
        self.cpus[cpu].current = None;
    }

    pub fn mark_completed(&mut self, slot: Slot, finish: Tick) {
        debug_assert!(
            !self.ready.contains(slot),
            "completing a process that is still enqueued"
        );
        let p = self.proc_mut(slot);
        debug_assert_eq!(
            p.state,
            ProcState::Running,
            "process {} must be running when it completes",
            p.pid
        );
        debug_assert_eq!(p.remaining, 0, "process {} completed with work left", p.pid);
        debug_assert!(p.finish.is_none(), "finish time set twice for {}", p.pid);
        p.state = ProcState::Completed;
        p.current_cpu = None;
        p.finish = Some(finish);
    }

    /// Record which PID occupied each CPU during the current tick.
    pub fn record_timeline(&mut self) {
        let row = self
            .cpus
            .iter()
            .map(|cpu| cpu.current.map(|slot| self.procs[slot].pid))
            .collect();
        self.timeline.push(row);
    }
}

pub mod driver;
pub mod observer;
pub mod state;

pub use driver::Engine;
pub use state::{CpuId, CpuState, Machine, Pid, ProcState, Process, Slot, Tick};

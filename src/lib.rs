pub mod core;
pub mod policy;
pub mod report;
pub mod sim;

pub use crate::core::{Engine, Machine};
pub use policy::Algorithm;
pub use report::Report;
pub use sim::{load_workload, parse_workload, ProcessSpec, Schedule, Sim};

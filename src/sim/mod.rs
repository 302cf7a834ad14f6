pub mod driver;
pub mod workload;

pub use driver::{Schedule, Sim};
pub use workload::{load_workload, parse_workload, ProcessSpec};

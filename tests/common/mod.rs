#![allow(dead_code)]

use pretty_assertions::assert_eq;
use schedsim::{Algorithm, ProcessSpec, Report, Schedule, Sim};

/// `(pid, arrival, burst, priority)` quadruples, as in the input file.
pub type SpecRow = (u32, u64, u64, i32);

pub fn specs(rows: &[SpecRow]) -> Vec<ProcessSpec> {
    rows.iter()
        .map(|&(pid, arrival, burst, priority)| ProcessSpec {
            pid,
            arrival,
            burst,
            priority,
        })
        .collect()
}

pub fn run(rows: &[SpecRow], cpus: usize, algorithm: Algorithm) -> Schedule {
    Sim::new(specs(rows), cpus, algorithm).run()
}

pub fn report(rows: &[SpecRow], cpus: usize, algorithm: Algorithm) -> Report {
    Report::from_schedule(&run(rows, cpus, algorithm))
}

/// Expected per-process outcome: `(pid, start, finish, turnaround, waiting,
/// response)`.
pub type ProcessExpect = (u32, u64, u64, u64, u64, u64);

pub fn assert_processes(report: &Report, expected: &[ProcessExpect]) {
    let actual: Vec<ProcessExpect> = report
        .processes
        .iter()
        .map(|row| {
            (
                row.pid,
                row.start.expect("process never started"),
                row.finish.expect("process never finished"),
                row.turnaround.expect("missing turnaround"),
                row.waiting.expect("missing waiting"),
                row.response.expect("missing response"),
            )
        })
        .collect();
    let mut expected = expected.to_vec();
    expected.sort_by_key(|row| row.0); // report rows are PID-ascending
    assert_eq!(actual, expected);
}

/// Expected per-CPU outcome: `(busy, idle, "utilization")`, CPU-id order.
pub fn assert_cpus(report: &Report, expected: &[(u64, u64, &str)]) {
    let actual: Vec<(u64, u64, String)> = report
        .cpus
        .iter()
        .map(|cpu| (cpu.busy, cpu.idle, format!("{:.2}", cpu.utilization)))
        .collect();
    let expected: Vec<(u64, u64, String)> = expected
        .iter()
        .map(|&(busy, idle, util)| (busy, idle, util.to_string()))
        .collect();
    assert_eq!(actual, expected);
}

pub fn assert_averages(report: &Report, turnaround: &str, waiting: &str, response: &str) {
    let fmt = |v: Option<f64>| v.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"));
    assert_eq!(
        (
            fmt(report.averages.turnaround),
            fmt(report.averages.waiting),
            fmt(report.averages.response),
        ),
        (
            turnaround.to_string(),
            waiting.to_string(),
            response.to_string()
        )
    );
}

//! Randomized invariant checks across all four algorithms: accounting
//! identities that must hold for every workload, not just the golden ones.

mod common;

use rand::prelude::*;
use schedsim::{Algorithm, ProcessSpec, Report, Sim};

fn random_workload(rng: &mut StdRng) -> Vec<ProcessSpec> {
    let count = rng.random_range(1..=12);
    (0..count)
        .map(|i| ProcessSpec {
            pid: i as u32 + 1,
            arrival: rng.random_range(0..15),
            burst: rng.random_range(1..=8),
            priority: rng.random_range(1..=5),
        })
        .collect()
}

fn algorithms(rng: &mut StdRng) -> [Algorithm; 4] {
    [
        Algorithm::Fcfs,
        Algorithm::Sjf,
        Algorithm::Srtf,
        Algorithm::Rr {
            quantum: rng.random_range(1..=4),
        },
    ]
}

#[test]
fn accounting_identities_hold_for_random_workloads() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..200 {
        let specs = random_workload(&mut rng);
        let cpus = rng.random_range(1..=3);

        for algorithm in algorithms(&mut rng) {
            let schedule = Sim::new(specs.clone(), cpus, algorithm).run();
            let report = Report::from_schedule(&schedule);

            let makespan = schedule.makespan;
            assert_eq!(
                makespan,
                schedule
                    .procs
                    .iter()
                    .map(|p| p.finish.expect("finished"))
                    .max()
                    .expect("nonempty workload"),
                "makespan must be the last finish time"
            );

            for cpu in &schedule.cpus {
                assert_eq!(
                    cpu.busy + cpu.idle,
                    makespan,
                    "{} cpu {}: busy+idle != makespan",
                    algorithm.name(),
                    cpu.id
                );
            }

            let total_busy: u64 = schedule.cpus.iter().map(|c| c.busy).sum();
            let total_burst: u64 = specs.iter().map(|s| s.burst).sum();
            assert_eq!(
                total_busy,
                total_burst,
                "{}: execution time lost or duplicated",
                algorithm.name()
            );

            for row in &report.processes {
                let turnaround = row.turnaround.expect("finished");
                let waiting = row.waiting.expect("finished");
                let response = row.response.expect("finished");
                assert_eq!(waiting, turnaround - row.burst);
                assert!(response <= turnaround, "pid {}", row.pid);
                assert!(
                    row.start.expect("started") >= row.arrival,
                    "pid {} started before it arrived",
                    row.pid
                );
            }
        }
    }
}

#[test]
fn reruns_are_byte_identical() {
    let mut rng = StdRng::seed_from_u64(23);

    for _ in 0..50 {
        let specs = random_workload(&mut rng);
        let cpus = rng.random_range(1..=3);

        for algorithm in algorithms(&mut rng) {
            let first = Report::from_schedule(&Sim::new(specs.clone(), cpus, algorithm).run());
            let second = Report::from_schedule(&Sim::new(specs.clone(), cpus, algorithm).run());
            assert_eq!(first.csv(), second.csv(), "{}", algorithm.name());
        }
    }
}

#[test]
fn generous_rr_quantum_always_degenerates_to_fcfs() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..100 {
        let specs = random_workload(&mut rng);
        let cpus = rng.random_range(1..=3);
        let max_burst = specs.iter().map(|s| s.burst).max().expect("nonempty");

        let rr = Report::from_schedule(
            &Sim::new(specs.clone(), cpus, Algorithm::Rr { quantum: max_burst }).run(),
        );
        let fcfs = Report::from_schedule(&Sim::new(specs.clone(), cpus, Algorithm::Fcfs).run());
        assert_eq!(rr.csv(), fcfs.csv());
    }
}

//! Golden Round-Robin schedules. Same-tick ordering rule under test: a
//! process arriving at tick t enters the FIFO ahead of a process whose
//! quantum expires at tick t.

mod common;

use common::{assert_averages, assert_cpus, assert_processes, report, SpecRow};
use schedsim::Algorithm;

const BASIC: &[SpecRow] = &[(1, 0, 5, 1), (2, 2, 3, 2), (3, 4, 2, 1)];

#[test]
fn one_cpu_quantum_two() {
    let r = report(BASIC, 1, Algorithm::Rr { quantum: 2 });
    // t=2: P2 arrives before P1's expired quantum requeues it, so the FIFO
    // runs P2 next.
    assert_processes(
        &r,
        &[(1, 0, 10, 10, 5, 0), (2, 2, 9, 7, 4, 0), (3, 6, 8, 4, 2, 2)],
    );
    assert_cpus(&r, &[(10, 0, "100.00")]);
    assert_averages(&r, "7.00", "3.67", "0.67");
}

#[test]
fn quantum_covering_every_burst_reproduces_fcfs() {
    let rr = report(BASIC, 1, Algorithm::Rr { quantum: 10 });
    let fcfs = report(BASIC, 1, Algorithm::Fcfs);
    assert_eq!(rr.csv(), fcfs.csv());

    assert_processes(
        &rr,
        &[(1, 0, 5, 5, 0, 0), (2, 5, 8, 6, 3, 3), (3, 8, 10, 6, 4, 4)],
    );
    assert_averages(&rr, "5.67", "2.33", "2.33");
}

#[test]
fn two_cpus_quantum_two() {
    let r = report(BASIC, 2, Algorithm::Rr { quantum: 2 });
    assert_processes(
        &r,
        &[(1, 0, 6, 6, 1, 0), (2, 2, 5, 3, 0, 0), (3, 4, 6, 2, 0, 0)],
    );
    assert_cpus(&r, &[(6, 0, "100.00"), (4, 2, "66.67")]);
    assert_averages(&r, "3.67", "0.33", "0.00");
}

#[test]
fn quantum_one_with_simultaneous_arrivals() {
    let r = report(&[(1, 0, 2, 1), (2, 0, 2, 2)], 1, Algorithm::Rr { quantum: 1 });
    // Priority fixes the initial FIFO order (P2 first); thereafter the two
    // alternate every tick.
    assert_processes(&r, &[(1, 1, 4, 4, 2, 1), (2, 0, 3, 3, 1, 0)]);
    assert_cpus(&r, &[(4, 0, "100.00")]);
    assert_averages(&r, "3.50", "1.50", "0.50");
}

#[test]
fn idle_gap_then_completion_within_two_quanta() {
    let r = report(&[(1, 3, 3, 1)], 1, Algorithm::Rr { quantum: 2 });
    // The expired quantum at t=5 requeues P1 into an empty FIFO; it is
    // redispatched the same tick and finishes without a gap.
    assert_processes(&r, &[(1, 3, 6, 3, 0, 0)]);
    assert_cpus(&r, &[(3, 3, "50.00")]);
    assert_averages(&r, "3.00", "0.00", "0.00");
}

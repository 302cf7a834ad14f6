//! Statistics aggregation and report rendering.
//!
//! A pure function of the completed [`Schedule`]: tick arithmetic stays in
//! integers; floating point appears only in Utilization% and the averages,
//! both rendered with exactly two decimal digits.

use average::{Estimate, Mean};

use crate::core::state::{CpuId, Pid, Tick};
use crate::sim::Schedule;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessRow {
    pub pid: Pid,
    pub arrival: Tick,
    pub burst: Tick,
    pub priority: i32,
    pub start: Option<Tick>,
    pub finish: Option<Tick>,
    pub turnaround: Option<Tick>,
    pub waiting: Option<Tick>,
    pub response: Option<Tick>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpuRow {
    pub id: CpuId,
    pub busy: Tick,
    pub idle: Tick,
    pub utilization: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Averages {
    pub turnaround: Option<f64>,
    pub waiting: Option<f64>,
    pub response: Option<f64>,
}

#[derive(Debug)]
pub struct Report {
    pub processes: Vec<ProcessRow>,
    pub cpus: Vec<CpuRow>,
    pub averages: Averages,
}

impl Report {
    /// Derive every statistic from a completed schedule. Process rows come
    /// out in PID-ascending order regardless of input-file order.
    pub fn from_schedule(schedule: &Schedule) -> Self {
        let mut processes: Vec<ProcessRow> = schedule
            .procs
            .iter()
            .map(|p| {
                let turnaround = p.finish.map(|finish| finish - p.arrival);
                ProcessRow {
                    pid: p.pid,
                    arrival: p.arrival,
                    burst: p.burst,
                    priority: p.priority,
                    start: p.start,
                    finish: p.finish,
                    turnaround,
                    waiting: turnaround.map(|t| t.saturating_sub(p.burst)),
                    response: p.start.map(|start| start - p.arrival),
                }
            })
            .collect();
        processes.sort_by_key(|row| row.pid);

        let cpus = schedule
            .cpus
            .iter()
            .map(|cpu| {
                let total = cpu.busy + cpu.idle;
                CpuRow {
                    id: cpu.id,
                    busy: cpu.busy,
                    idle: cpu.idle,
                    utilization: if total > 0 {
                        100.0 * cpu.busy as f64 / total as f64
                    } else {
                        0.0
                    },
                }
            })
            .collect();

        let mut turnaround = Mean::new();
        let mut waiting = Mean::new();
        let mut response = Mean::new();
        let mut finished = 0u64;
        for row in &processes {
            if let (Some(t), Some(w), Some(r)) = (row.turnaround, row.waiting, row.response) {
                turnaround.add(t as f64);
                waiting.add(w as f64);
                response.add(r as f64);
                finished += 1;
            }
        }
        let averages = if finished > 0 {
            Averages {
                turnaround: Some(turnaround.estimate()),
                waiting: Some(waiting.estimate()),
                response: Some(response.estimate()),
            }
        } else {
            Averages::default()
        };

        Self {
            processes,
            cpus,
            averages,
        }
    }

    /// The three labeled CSV sections consumed by the external harness.
    pub fn csv(&self) -> String {
        let mut out = String::new();

        out.push_str("Process Stats (CSV):\n");
        out.push_str("PID,Arrival,Burst,Priority,Start,Finish,Turnaround,Waiting,Response\n");
        for row in &self.processes {
            out.push_str(&format!(
                "{},{},{},{},{},{},{},{},{}\n",
                row.pid,
                row.arrival,
                row.burst,
                row.priority,
                tick_cell(row.start),
                tick_cell(row.finish),
                tick_cell(row.turnaround),
                tick_cell(row.waiting),
                tick_cell(row.response),
            ));
        }

        out.push_str("\nCPU Stats (CSV):\n");
        out.push_str("CPU_ID,BusyTime,IdleTime,Utilization%\n");
        for cpu in &self.cpus {
            out.push_str(&format!(
                "{},{},{},{:.2}\n",
                cpu.id, cpu.busy, cpu.idle, cpu.utilization
            ));
        }

        out.push_str("\nAverage Stats (CSV):\n");
        out.push_str("AvgTurnaround,AvgWaiting,AvgResponse\n");
        out.push_str(&format!(
            "{},{},{}\n",
            avg_cell(self.averages.turnaround),
            avg_cell(self.averages.waiting),
            avg_cell(self.averages.response),
        ));

        out
    }

    /// Human-readable statistic tables; same content as the CSV sections.
    pub fn tables(&self) -> String {
        let mut out = String::new();

        out.push_str("Process Statistics:\n");
        out.push_str(&format!(
            "{:<6} {:<8} {:<6} {:<9} {:<6} {:<7} {:<11} {:<8} {:<9}\n",
            "PID", "Arrival", "Burst", "Priority", "Start", "Finish", "Turnaround", "Waiting",
            "Response"
        ));
        for row in &self.processes {
            out.push_str(&format!(
                "{:<6} {:<8} {:<6} {:<9} {:<6} {:<7} {:<11} {:<8} {:<9}\n",
                row.pid,
                row.arrival,
                row.burst,
                row.priority,
                tick_cell(row.start),
                tick_cell(row.finish),
                tick_cell(row.turnaround),
                tick_cell(row.waiting),
                tick_cell(row.response),
            ));
        }

        out.push_str("\nCPU Statistics:\n");
        out.push_str(&format!(
            "{:<7} {:<9} {:<9} {:<12}\n",
            "CPU_ID", "BusyTime", "IdleTime", "Utilization"
        ));
        for cpu in &self.cpus {
            out.push_str(&format!(
                "{:<7} {:<9} {:<9} {:>10.2}%\n",
                cpu.id, cpu.busy, cpu.idle, cpu.utilization
            ));
        }

        out.push_str("\nAverage Statistics:\n");
        out.push_str(&format!(
            "  Average Turnaround Time: {}\n  Average Waiting Time:    {}\n  Average Response Time:   {}\n",
            avg_cell(self.averages.turnaround),
            avg_cell(self.averages.waiting),
            avg_cell(self.averages.response),
        ));

        out
    }
}

fn tick_cell(value: Option<Tick>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

fn avg_cell(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"))
}

/// Per-CPU execution timeline, one column per tick, `.` for idle.
pub fn render_timeline(schedule: &Schedule) -> String {
    const TICKS_PER_SEGMENT: usize = 15;

    let mut out = String::from("Execution Timeline:\n");
    if schedule.timeline.is_empty() {
        out.push_str("  (no execution)\n");
        return out;
    }

    let total = schedule.timeline.len();
    for segment_start in (0..total).step_by(TICKS_PER_SEGMENT) {
        let segment_end = (segment_start + TICKS_PER_SEGMENT).min(total);

        out.push_str(&format!("\nTime {} to {}:\n", segment_start, segment_end - 1));
        out.push_str("Time:  ");
        for t in segment_start..segment_end {
            out.push_str(&format!("{t:<5}"));
        }
        out.push('\n');

        for cpu in 0..schedule.cpus.len() {
            out.push_str(&format!("CPU{cpu:<4}"));
            for row in &schedule.timeline[segment_start..segment_end] {
                match row[cpu] {
                    Some(pid) => out.push_str(&format!("{pid:<5}")),
                    None => out.push_str(&format!("{:<5}", ".")),
                }
            }
            out.push('\n');
        }
    }

    out
}

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use rustc_hash::FxHashMap;

use crate::core::state::{Pid, Tick};

/// Static description of one process, as read from the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessSpec {
    pub pid: Pid,
    pub arrival: Tick,
    pub burst: Tick,
    pub priority: i32,
}

pub fn load_workload(path: &Path) -> Result<Vec<ProcessSpec>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read process file `{}`", path.display()))?;
    parse_workload(&text).with_context(|| format!("malformed process file `{}`", path.display()))
}

/// Parse `PID Arrival Burst Priority` lines. `#`-prefixed and blank lines
/// are skipped. Any malformed data line aborts the whole parse with its
/// line number; lines are never skipped silently. File order carries no
/// scheduling meaning.
pub fn parse_workload(text: &str) -> Result<Vec<ProcessSpec>> {
    let mut specs = Vec::new();
    let mut seen: FxHashMap<Pid, usize> = FxHashMap::default();

    for (idx, raw) in text.lines().enumerate() {
        let lineno = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 4 {
            bail!(
                "line {lineno}: expected `PID Arrival Burst Priority`, found {} field(s)",
                fields.len()
            );
        }

        let pid = parse_field(fields[0], "PID", lineno)?;
        let arrival = parse_field(fields[1], "Arrival", lineno)?;
        let burst = parse_field(fields[2], "Burst", lineno)?;
        let priority = parse_field(fields[3], "Priority", lineno)?;

        if pid < 1 || pid > i64::from(u32::MAX) {
            bail!("line {lineno}: PID {pid} must be a positive integer");
        }
        if arrival < 0 {
            bail!("line {lineno}: Arrival {arrival} cannot be negative");
        }
        if burst < 1 {
            bail!("line {lineno}: Burst {burst} must be positive");
        }
        let pid = pid as Pid;
        if let Some(first) = seen.insert(pid, lineno) {
            bail!("line {lineno}: duplicate PID {pid} (first defined on line {first})");
        }

        specs.push(ProcessSpec {
            pid,
            arrival: arrival as Tick,
            burst: burst as Tick,
            priority: i32::try_from(priority)
                .with_context(|| format!("line {lineno}: Priority {priority} out of range"))?,
        });
    }

    Ok(specs)
}

fn parse_field(field: &str, name: &str, lineno: usize) -> Result<i64> {
    field
        .parse()
        .with_context(|| format!("line {lineno}: {name} `{field}` is not an integer"))
}

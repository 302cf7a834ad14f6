use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use schedsim::{load_workload, report, Algorithm, Report, Sim};

const USAGE: &str = "Usage: schedsim -f <file> [-a <FCFS|SJF|SRTF|RR>] [-c <cpus>] [-q <quantum>]";

#[derive(Debug)]
struct Config {
    input: PathBuf,
    algorithm: Algorithm,
    cpus: usize,
}

fn parse_args(args: &[String]) -> Result<Config> {
    let mut input: Option<PathBuf> = None;
    let mut algorithm_name = "FCFS".to_string();
    let mut cpus = 1usize;
    let mut quantum: Option<u64> = None;

    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .with_context(|| format!("{name} requires a value\n{USAGE}"))
        };
        match flag.as_str() {
            "-f" => input = Some(PathBuf::from(value("-f")?)),
            "-a" => algorithm_name = value("-a")?.clone(),
            "-c" => {
                cpus = value("-c")?
                    .parse()
                    .context("-c expects an integer CPU count")?;
                if cpus < 1 {
                    bail!("CPU count must be at least 1");
                }
            }
            "-q" => {
                let q: u64 = value("-q")?
                    .parse()
                    .context("-q expects an integer quantum")?;
                if q < 1 {
                    bail!("quantum must be at least 1");
                }
                quantum = Some(q);
            }
            other => bail!("unknown argument `{other}`\n{USAGE}"),
        }
    }

    let input = input.with_context(|| format!("input file required\n{USAGE}"))?;
    let algorithm = match algorithm_name.as_str() {
        "FCFS" => Algorithm::Fcfs,
        "SJF" => Algorithm::Sjf,
        "SRTF" => Algorithm::Srtf,
        "RR" => Algorithm::Rr {
            quantum: quantum.context("RR requires a quantum (-q)")?,
        },
        other => bail!("unknown algorithm `{other}`\n{USAGE}"),
    };

    Ok(Config {
        input,
        algorithm,
        cpus,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = parse_args(&args)?;

    let specs = load_workload(&config.input)?;
    if specs.is_empty() {
        warn!(file = %config.input.display(), "no processes found");
    }
    info!(
        algorithm = config.algorithm.name(),
        cpus = config.cpus,
        processes = specs.len(),
        "starting simulation"
    );

    let schedule = Sim::new(specs, config.cpus, config.algorithm).run();
    let report = Report::from_schedule(&schedule);

    println!("--- Simulation Results ---\n");
    print!("{}", report::render_timeline(&schedule));
    println!();
    print!("{}", report.tables());
    println!();
    print!("{}", report.csv());

    Ok(())
}

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use streamsketch::count::{exact_unique_count, hll_unique_count};
use streamsketch::ingest;
use streamsketch::password::{check_password_uniqueness, Candidate, Status};
use streamsketch::{BloomFilter, HyperLogLog};

#[derive(Debug, Serialize)]
struct Estimation {
    precision: u8,
    estimate:  f64,
    seconds:   f64,
}

#[derive(Debug, Serialize)]
struct IpReport {
    loaded:        usize,
    load_seconds:  f64,
    exact:         usize,
    exact_seconds: f64,
    estimations:   Vec<Estimation>,
}

#[derive(Debug, Serialize)]
struct PasswordEntry<'a> {
    candidate: &'a Candidate,
    status:    Status,
}

#[derive(Debug, Serialize)]
struct Trial {
    precision: u8,
    run:       usize,
    estimate:  f64,
    error:     f64,
}

// Returns the precisions given on the command line.
fn precisions(args: &ArgMatches) -> Vec<u8> {
    args.get_many::<u8>("precision")
        .map(|values| values.copied().collect())
        .unwrap_or_default()
}

fn print_json<T>(value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}

// Compares the exact and estimated unique addresses of an access log.
fn ips(args: &ArgMatches) -> Result<()> {
    let input = args
        .get_one::<PathBuf>("input")
        .context("missing --input")?;

    let start = Instant::now();
    let ips = ingest::load_ip_addresses_from_path(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let load_seconds = start.elapsed().as_secs_f64();

    info!(loaded = ips.len(), "loaded access log");

    let start = Instant::now();
    let exact = exact_unique_count(&ips);
    let exact_seconds = start.elapsed().as_secs_f64();

    // One independent estimator per precision.
    let estimations = precisions(args)
        .into_par_iter()
        .map(|precision| -> Result<Estimation> {
            let start = Instant::now();
            let estimate = hll_unique_count(&ips, precision)?;

            Ok(Estimation {
                precision: precision,
                estimate:  estimate,
                seconds:   start.elapsed().as_secs_f64(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let report = IpReport {
        loaded:        ips.len(),
        load_seconds:  load_seconds,
        exact:         exact,
        exact_seconds: exact_seconds,
        estimations:   estimations,
    };

    if args.get_flag("json") {
        return print_json(&report);
    }

    println!(
        "Loaded {} valid IPs in {:.2}s",
        report.loaded, report.load_seconds
    );
    println!("Comparison results:");

    let mut header = format!("{:<25}{:>15}", "", "Exact Count");
    let mut counts = format!("{:<25}{:>15}", "Unique elements", report.exact);
    let mut times =
        format!("{:<25}{:>15.2}", "Execution time (s)", report.exact_seconds);

    for est in &report.estimations {
        header += &format!("{:>15}", format!("HLL p={}", est.precision));
        counts += &format!("{:>15.0}", est.estimate);
        times += &format!("{:>15.2}", est.seconds);
    }

    println!("{}\n{}\n{}", header, counts, times);

    Ok(())
}

// Classifies candidate passwords against a list of passwords in use.
fn passwords(args: &ArgMatches) -> Result<()> {
    let (existing, candidates, size, hashes) = (
        args.get_one::<PathBuf>("existing")
            .context("missing --existing")?,
        args.get_one::<PathBuf>("candidates")
            .context("missing --candidates")?,
        *args.get_one::<usize>("size").context("missing --size")?,
        *args.get_one::<u32>("hashes").context("missing --hashes")?,
    );

    let mut bloom = BloomFilter::new(size, hashes)?;

    let used = ingest::load_lines_from_path(existing)
        .with_context(|| format!("reading {}", existing.display()))?;

    for password in &used {
        bloom.add(password);
    }

    info!(
        passwords = used.len(),
        bits_set = bloom.count_ones(),
        "populated bloom filter"
    );

    let candidates = ingest::load_lines_from_path(candidates)
        .with_context(|| format!("reading {}", candidates.display()))?;

    let results = check_password_uniqueness(&bloom, candidates);

    if args.get_flag("json") {
        let entries: Vec<PasswordEntry> = results
            .iter()
            .map(|(candidate, status)| PasswordEntry {
                candidate: candidate,
                status:    status,
            })
            .collect();

        return print_json(&entries);
    }

    for (candidate, status) in results.iter() {
        println!("Password '{}' - {}.", candidate, status);
    }

    Ok(())
}

// Measures the relative error on random distinct strings.
fn synthetic(args: &ArgMatches) -> Result<()> {
    let (count, runs, seed) = (
        *args.get_one::<u64>("count").context("missing --count")?,
        *args.get_one::<usize>("runs").context("missing --runs")?,
        *args.get_one::<u64>("seed").context("missing --seed")?,
    );

    let jobs: Vec<(u8, usize)> = precisions(args)
        .into_iter()
        .flat_map(|p| (0..runs).map(move |r| (p, r)))
        .collect();

    let trials = jobs
        .into_par_iter()
        .map(|(precision, run)| -> Result<Trial> {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(run as u64));
            let mut hll = HyperLogLog::new(precision)?;

            for i in 0..count {
                hll.add(&format!("- {} - {} -", i, rng.gen::<u64>()));
            }

            let estimate = hll.count();

            Ok(Trial {
                precision: precision,
                run:       run,
                estimate:  estimate,
                error:     (estimate - count as f64) / count as f64,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if args.get_flag("json") {
        return print_json(&trials);
    }

    println!("{:>10}{:>6}{:>15}{:>12}", "precision", "run", "estimate", "error");

    for trial in &trials {
        println!(
            "{:>10}{:>6}{:>15.0}{:>11.3}%",
            trial.precision,
            trial.run,
            trial.estimate,
            trial.error * 100.0
        );
    }

    Ok(())
}

fn precision_arg() -> Arg {
    Arg::new("precision")
        .short('p')
        .long("precision")
        .action(ArgAction::Append)
        .value_parser(value_parser!(u8).range(4..=16))
        .default_value("14")
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("print results as JSON")
}

fn synthetic_command() -> Command {
    Command::new("synthetic")
        .about("measure hyperloglog error on random distinct strings.")
        .arg(
            Arg::new("count")
                .short('c')
                .long("count")
                .required(true)
                .value_parser(value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("runs")
                .short('r')
                .long("runs")
                .value_parser(value_parser!(usize))
                .default_value("1"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(value_parser!(u64))
                .default_value("9001"),
        )
        .arg(precision_arg())
        .arg(json_arg())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let ips_app = Command::new("ips")
        .about("compare exact and hyperloglog unique address counts of a log.")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(precision_arg())
        .arg(json_arg());

    let passwords_app = Command::new("passwords")
        .about("check candidate passwords against the passwords in use.")
        .arg(
            Arg::new("existing")
                .short('e')
                .long("existing")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("candidates")
                .short('c')
                .long("candidates")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("size")
                .short('s')
                .long("size")
                .value_parser(value_parser!(usize))
                .default_value("1000"),
        )
        .arg(
            Arg::new("hashes")
                .short('k')
                .long("hashes")
                .value_parser(value_parser!(u32))
                .default_value("3"),
        )
        .arg(json_arg());

    let matches: ArgMatches = Command::new("evl")
        .about("evaluate bloom filter and hyperloglog sketches")
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .global(true)
                .value_parser(value_parser!(usize))
                .default_value("1"),
        )
        .subcommand_required(true)
        .subcommand(ips_app)
        .subcommand(passwords_app)
        .subcommand(synthetic_command())
        .get_matches();

    let jobs = *matches.get_one::<usize>("jobs").context("missing --jobs")?;

    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build_global()?;

    match matches.subcommand() {
        Some(("ips", sub_matches)) => ips(sub_matches),
        Some(("passwords", sub_matches)) => passwords(sub_matches),
        Some(("synthetic", sub_matches)) => synthetic(sub_matches),
        _ => Ok(()),
    }
}

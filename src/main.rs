mod errors;
mod generators;
mod profile;
mod space;

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::profile::SpaceData;
use crate::space::NumberSpace;

/// Enumerate, sample and slice fixed-format phone number spaces.
#[derive(Parser, Debug)]
#[command(name = "numspace", version)]
struct Cli {
    /// Fixed leading digits (default 013)
    #[arg(long, global = true)]
    prefix: Option<String>,

    /// Width of the varying middle segment (default 6)
    #[arg(long, global = true)]
    middle_len: Option<u32>,

    /// Fixed two trailing digits (default 29)
    #[arg(long, global = true)]
    last_two: Option<String>,

    /// JSON space profile; defaults to <config dir>/numspace/space.json when present
    #[arg(long, global = true)]
    profile: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every number in the space
    List,
    /// Write every number in the space to a file, one per line
    Write { destination: PathBuf },
    /// Print distinct random numbers, sorted
    Sample {
        #[arg(short = 'n', long = "count", default_value_t = 20)]
        count: u64,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        json: bool,
    },
    /// Print the numbers whose middle lies in START..=END
    Range {
        start: u64,
        end: u64,
        #[arg(long)]
        json: bool,
    },
    /// Tell whether a number belongs to the space
    Check { number: String },
    /// Describe the space as JSON
    Info,
}

#[derive(Serialize)]
struct SpaceInfo<'a> {
    prefix: &'a str,
    middle_len: u32,
    last_two: &'a str,
    size: u64,
    first: String,
    last: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let flags = SpaceData {
        prefix: cli.prefix,
        middle_len: cli.middle_len,
        last_two: cli.last_two,
    };
    let profile = profile::load(cli.profile.as_deref()).context("could not load space profile")?;
    let data = flags.or(profile);

    match cli.command {
        Command::List => {
            let (prefix, middle_len, last_two) = data.resolve();
            let numbers = space::enumerate(&prefix, middle_len, &last_two)?;
            print_stream(numbers)?;
        }
        Command::Write { destination } => {
            let (prefix, middle_len, last_two) = data.resolve();
            let written = space::materialize_to_storage(&destination, &prefix, middle_len, &last_two)
                .with_context(|| format!("could not write {}", destination.display()))?;
            eprintln!("Wrote {} numbers to {}.", written, destination.display());
        }
        Command::Sample { count, seed, json } => {
            let (prefix, middle_len, last_two) = data.resolve();
            let numbers = space::sample_without_replacement(count, &prefix, middle_len, &last_two, seed)?;
            print_numbers(&numbers, json)?;
        }
        Command::Range { start, end, json } => {
            let (prefix, middle_len, last_two) = data.resolve();
            let numbers = space::sample_contiguous_range(start, end, &prefix, middle_len, &last_two)?;
            print_numbers(&numbers, json)?;
        }
        Command::Check { number } => {
            let space = NumberSpace::try_from(data)?;
            match space.index_of(&number) {
                Some(index) => print_text(format!("{} is in the space at middle index {}", number, index))?,
                None => {
                    print_text(format!("{} is not in the space", number))?;
                    std::process::exit(1);
                }
            }
        }
        Command::Info => {
            let space = NumberSpace::try_from(data)?;
            let info = SpaceInfo {
                prefix: space.prefix(),
                middle_len: space.middle_len(),
                last_two: space.last_two(),
                size: space.size(),
                first: space.member(0)?,
                last: space.member(space.size() - 1)?,
            };
            print_text(serde_json::to_string_pretty(&info)?)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Streams lines to stdout. A closed pipe (e.g. `| head`) ends output quietly.
fn print_stream(numbers: impl Iterator<Item = String>) -> Result<()> {
    emit(BufWriter::new(io::stdout().lock()), numbers)
}

fn emit<W: Write>(mut out: W, lines: impl Iterator<Item = String>) -> Result<()> {
    match write_lines(&mut out, lines) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => Ok(other?),
    }
}

fn write_lines<W: Write>(out: &mut W, numbers: impl Iterator<Item = String>) -> io::Result<()> {
    for number in numbers {
        writeln!(out, "{}", number)?;
    }
    out.flush()
}

fn print_text(text: String) -> Result<()> {
    print_stream(std::iter::once(text))
}

fn print_numbers(numbers: &[String], json: bool) -> Result<()> {
    if json {
        return print_text(serde_json::to_string_pretty(numbers)?);
    }

    print_stream(numbers.iter().cloned())
}

//! Run with eg:
//! - `maskfault -f circuits/masked_and.txt -k 2 -p CRP`
//! - `maskfault -f circuits/masked_and.txt -k 1 -p CRPC -s 0 --fault-rate 0.02 -v`

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use snafu::{ensure, ResultExt};

use maskfault::enumerate::{self, Property};
use maskfault::error::{
    CliError, CliSnafu, InvalidFaultRateSnafu, InvalidPolaritySnafu, MaskfaultError, ParseSnafu,
    ReadCircuitSnafu, ReportSnafu,
};
use maskfault::report;
use maskfault::Circuit;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the circuit description file
    #[clap(short = 'f', long = "file")]
    file: PathBuf,

    /// Maximum internal fault budget
    #[clap(short = 'k')]
    k: usize,

    /// Fault polarity: 0 = reset, 1 = set
    #[clap(short = 's', default_value_t = 1)]
    polarity: u8,

    /// Property to analyse
    #[clap(short = 'p', value_enum, default_value = "crp")]
    property: PropertyArg,

    /// Per-wire fault probability used for the mu bound
    #[clap(long = "fault-rate", default_value_t = 0.01)]
    fault_rate: f64,

    /// Increase log verbosity; repeatable
    #[clap(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PropertyArg {
    Crp,
    Crpc,
}

impl PropertyArg {
    fn name(self) -> &'static str {
        match self {
            PropertyArg::Crp => "CRP",
            PropertyArg::Crpc => "CRPC",
        }
    }

    fn to_property(self) -> Property {
        match self {
            PropertyArg::Crp => Property::Crp,
            PropertyArg::Crpc => Property::Crpc,
        }
    }
}

fn main() {
    let args = Args::parse();
    init_logger(args.verbose);

    if let Err(err) = run(&args) {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn init_logger(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn run(args: &Args) -> Result<(), MaskfaultError> {
    validate_args(args).context(CliSnafu)?;

    let text = std::fs::read_to_string(&args.file).context(ReadCircuitSnafu {
        path: args.file.clone(),
    })?;
    let circuit = Circuit::parse(&text).context(ParseSnafu)?;
    let ring = circuit.build_ring();

    let set = args.polarity == 1;
    let report = enumerate::run(&circuit, &ring, args.k, set, args.property.to_property());

    let property_name = args.property.name();
    println!(
        "{}",
        report::summarize(&report, args.k, set, property_name, args.fault_rate)
    );

    let body = match &report {
        maskfault::Report::Crp(r) => report::render_crp(r),
        maskfault::Report::Crpc(r) => report::render_crpc(r),
    };
    let path = report::sidecar_path(&args.file, args.k, set, property_name);
    report::write_sidecar(&path, &body).context(ReportSnafu)?;
    log::info!("wrote sidecar file {}", path.display());

    Ok(())
}

fn validate_args(args: &Args) -> Result<(), CliError> {
    ensure!(
        args.polarity == 0 || args.polarity == 1,
        InvalidPolaritySnafu {
            value: args.polarity,
        }
    );
    ensure!(
        (0.0..=1.0).contains(&args.fault_rate),
        InvalidFaultRateSnafu {
            value: args.fault_rate,
        }
    );
    Ok(())
}

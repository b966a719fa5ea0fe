//! Run one line-follower scenario in the simulator.
//!
//! Loads a JSON scenario, runs it to completion and prints the report as
//! JSON on stdout.
//!
//! Usage:
//!   cargo run -p line_follower_sitl --bin follow_sim -- <SCENARIO> [OPTIONS]
//!
//! Options:
//!   --search          Search for the line whenever it is lost
//!   --seed <N>        Seed for sensor noise
//!   --heading <DEG>   Override the scenario heading
//!
//! `follow_sim --params` lists the tunable parameters with their defaults.

use std::env;
use std::process;

use line_follower_core::parameters::{FollowerParams, ParameterStore};
use line_follower_sitl::{Scenario, SimulatorError};

struct Args {
    scenario: String,
    search: bool,
    seed: Option<u64>,
    heading: Option<u16>,
}

fn parse_args() -> Args {
    let mut scenario = None;
    let mut search = false;
    let mut seed = None;
    let mut heading = None;

    let raw: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < raw.len() {
        match raw[i].as_str() {
            "--search" => search = true,
            "--seed" => {
                i += 1;
                seed = Some(parse_arg(&raw, i, "seed"));
            }
            "--heading" => {
                i += 1;
                heading = Some(parse_arg(&raw, i, "heading"));
            }
            "--params" => {
                print_params();
                process::exit(0);
            }
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown option: {other}");
                print_usage();
                process::exit(1);
            }
            path => {
                if scenario.replace(path.to_string()).is_some() {
                    eprintln!("Error: only one scenario file may be given");
                    process::exit(1);
                }
            }
        }
        i += 1;
    }

    let Some(scenario) = scenario else {
        eprintln!("Error: missing scenario file");
        print_usage();
        process::exit(1);
    };

    Args {
        scenario,
        search,
        seed,
        heading,
    }
}

fn parse_arg<T: std::str::FromStr>(raw: &[String], i: usize, name: &str) -> T {
    raw.get(i)
        .unwrap_or_else(|| {
            eprintln!("Error: --{name} requires a value");
            process::exit(1);
        })
        .parse()
        .unwrap_or_else(|_| {
            eprintln!("Error: invalid value for --{name}");
            process::exit(1);
        })
}

fn print_usage() {
    eprintln!(
        "Usage: follow_sim <SCENARIO> [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --search          Search for the line whenever it is lost\n\
         \x20 --seed <N>        Seed for sensor noise\n\
         \x20 --heading <DEG>   Override the scenario heading (0, 90, 180, 270)\n\
         \x20 --params          List tunable parameters and exit\n\
         \x20 -h, --help        Show this help"
    );
}

fn print_params() {
    let mut store = ParameterStore::new();
    if let Err(e) = FollowerParams::register_defaults(&mut store) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
    for name in store.names() {
        if let Some(value) = store.get(name) {
            println!("{name:<16} {}", value.as_f32());
        }
    }
}

fn run(args: Args) -> Result<String, SimulatorError> {
    let mut scenario = Scenario::load(&args.scenario)?;
    if args.search {
        scenario.search_on_loss = true;
    }
    if args.seed.is_some() {
        scenario.seed = args.seed;
    }
    if let Some(heading) = args.heading {
        scenario.heading = heading;
    }

    let report = scenario.run()?;
    Ok(serde_json::to_string_pretty(&report)?)
}

fn main() {
    let args = parse_args();
    let path = args.scenario.clone();

    match run(args) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: {path}: {e}");
            process::exit(1);
        }
    }
}

mod app;

use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use app::InspectOptions;

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::from(1)
        }
    }
}

fn run_cli() -> Result<(), String> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    match parse_args(&args)? {
        Some(options) => app::run(&options, &mut io::stdout()),
        None => {
            print_usage();
            Ok(())
        }
    }
}

/// Returns `None` when help was requested.
fn parse_args(args: &[String]) -> Result<Option<InspectOptions>, String> {
    if args.is_empty() {
        return Err(usage_text());
    }

    let mut worldmap = None;
    let mut options = InspectOptions::default();
    let mut index = 0usize;
    while index < args.len() {
        match args[index].as_str() {
            "-h" | "--help" => return Ok(None),
            "--data-dir" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --data-dir".to_string())?;
                options.data_dir = Some(PathBuf::from(value));
                index += 2;
            }
            "--config" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --config".to_string())?;
                options.config_path = Some(PathBuf::from(value));
                index += 2;
            }
            "--simulate-ms" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --simulate-ms".to_string())?;
                let ms = value
                    .parse::<u64>()
                    .map_err(|_| format!("invalid --simulate-ms value '{value}' (expected u64)"))?;
                options.simulate_ms = Some(ms);
                index += 2;
            }
            "--json" => {
                options.json = true;
                index += 1;
            }
            flag if flag.starts_with("--") => return Err(format!("unknown option '{flag}'")),
            path => {
                if worldmap.is_some() {
                    return Err(format!("unexpected extra argument '{path}'"));
                }
                worldmap = Some(path.to_string());
                index += 1;
            }
        }
    }

    options.worldmap = worldmap.ok_or_else(|| "missing worldmap file".to_string())?;
    Ok(Some(options))
}

fn print_usage() {
    println!("{}", usage_text());
}

fn usage_text() -> String {
    [
        "worldmap_inspect - load a worldmap and summarize its scene",
        "",
        "Usage:",
        "  worldmap_inspect <worldmap-file> [--data-dir <dir>] [--config <file>] [--json] [--simulate-ms <u64>]",
        "",
        "The worldmap file is a /-separated path relative to the data directory.",
        "The data directory defaults to $WORLDMAP_DATA_DIR, then the nearest data/ above the current directory.",
    ]
    .join("\n")
}

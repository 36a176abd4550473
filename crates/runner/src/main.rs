use intrinsic_clock::SystemClock;
use intrinsic_runner::{BatchRunner, RunnerConfig};
use std::sync::Arc;

fn print_help() {
    eprintln!(
        r#"Intrinsic Runner - batch DCF valuations

USAGE:
    intrinsic-runner --config <PATH> [OPTIONS]

OPTIONS:
    --config <PATH>     Load the run description from a JSON file
    --output <PATH>     Write the JSON report to a file instead of stdout
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter (default: info)

EXAMPLES:
    # Value everything described in run.json
    intrinsic-runner --config run.json

    # Verbose pipeline logs, report to a file
    RUST_LOG=debug intrinsic-runner --config run.json --output report.json
"#
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut output_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            "--output" | "-o" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --output requires a path argument");
                    std::process::exit(1);
                }
                output_path = Some(args[i].clone());
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let Some(config_path) = config_path else {
        eprintln!("Error: --config is required");
        print_help();
        std::process::exit(1);
    };

    log::info!("Loading configuration from: {}", config_path);
    let config = RunnerConfig::from_file(&config_path)?;
    log::info!("Companies: {}", config.companies.len());
    log::info!("Valuations: {}", config.valuations.len());
    log::info!("Sensitivity sweeps: {}", config.sensitivities.len());

    let runner = BatchRunner::new(config, Arc::new(SystemClock::new()))?;
    let report = runner.run().await?;
    let json = serde_json::to_string_pretty(&report)?;

    match output_path {
        Some(path) => {
            std::fs::write(&path, json)?;
            log::info!("Report written to {}", path);
        }
        None => println!("{}", json),
    }

    if report.failure_count() > 0 {
        log::warn!("{} requests failed", report.failure_count());
    }
    Ok(())
}

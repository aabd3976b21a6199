//! `airfield` - CLI for flight admission control
//!
//! This binary reprocesses flight CSV files and reads or adds flights in the
//! configured flights database.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{anyhow, bail, Context};
use clap::Parser;

use airfield::cli::{AddCommand, Cli, Command, ConfigCommand, ShowCommand, UpdateCommand};
use airfield::{init_logging, Config, FlightRequest, FlightService, FlightView, Registry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("Failed to load configuration")?;

    // Execute the command
    match cli.command {
        Command::Update(update_cmd) => handle_update(&config, &update_cmd),
        Command::Show(show_cmd) => handle_show(&config, show_cmd).await,
        Command::Add(add_cmd) => handle_add(&config, add_cmd).await,
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn handle_update(config: &Config, cmd: &UpdateCommand) -> anyhow::Result<()> {
    let destination = cmd.destination();
    let mut registry = Registry::from_config(&config.admission);

    registry
        .load_csv(&cmd.source)
        .and_then(|_| registry.dump_csv(destination))
        .map_err(|reason| anyhow!("Failed to update dataset: {reason}"))?;

    let stats = registry.stats();
    println!(
        "Wrote {} flights to {} ({} success, {} fail)",
        stats.total,
        destination.display(),
        stats.succeeded,
        stats.failed
    );
    Ok(())
}

async fn handle_show(config: &Config, cmd: ShowCommand) -> anyhow::Result<()> {
    let database = cmd.database.unwrap_or_else(|| config.database_path());
    let service = FlightService::load(&database, &config.admission)
        .with_context(|| format!("Failed to open database {}", database.display()))?;

    match service.get_flight(&cmd.flight_id).await {
        Ok(view) => print_flight(&view, cmd.json),
        Err(e) => bail!("{}", e.detail),
    }
}

async fn handle_add(config: &Config, cmd: AddCommand) -> anyhow::Result<()> {
    let database = cmd.database.unwrap_or_else(|| config.database_path());
    let service = FlightService::open(&database, &config.admission)
        .with_context(|| format!("Failed to open database {}", database.display()))?;

    let request = FlightRequest {
        flight_id: cmd.flight_id,
        arrival: cmd.arrival,
        departure: cmd.departure,
    };
    match service.create_flight(request).await {
        Ok(view) => print_flight(&view, cmd.json),
        Err(e) => bail!("{}", e.detail),
    }
}

fn print_flight(view: &FlightView, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
    } else {
        println!("Flight:     {}", view.flight_id);
        println!("Arrival:    {}", view.arrival.format("%H:%M"));
        println!("Departure:  {}", view.departure.format("%H:%M"));
        println!("Status:     {}", view.success);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Admission]");
                println!(
                    "  Max flights per day:     {}",
                    config.admission.max_flights_per_day
                );
                println!(
                    "  Min ground time (min):   {}",
                    config.admission.min_ground_time_minutes
                );
                println!();
                println!("[Storage]");
                println!(
                    "  Database path:           {}",
                    config.database_path().display()
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

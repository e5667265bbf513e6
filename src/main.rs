//! urja entry point: CLI wiring and config resolution.

use std::process;

use urja_client::api::ApiClient;
use urja_client::api::types::{AnalysisResult, HealthResponse, PhysicsInfo};
use urja_client::cli::{self, CliOptions, Command};
use urja_client::config::ClientConfig;
use urja_client::io::export::export_component_losses;
use urja_client::io::request::load_analysis_request;
use urja_client::logging;
use urja_client::status::{StatusPoller, ViewState};

/// Resolves configuration: defaults, then file, then env, then `--api-url`.
fn load_config(cli: &CliOptions) -> ClientConfig {
    let mut config = match &cli.config {
        Some(path) => match ClientConfig::from_toml_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        },
        None => ClientConfig::default(),
    };
    config.apply_env();
    config.override_base_url(cli.api_url.as_deref());

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    config
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("error: failed to encode response: {e}");
            process::exit(1);
        }
    }
}

fn print_status(health: &HealthResponse, physics: &PhysicsInfo) {
    println!("backend:  {}", health.status);
    if let Some(version) = &health.version {
        println!("version:  {version}");
    }
    for (name, component) in &health.components {
        println!("  {name:<20} {}", component.status);
    }
    println!();
    println!("engine:   {}", physics.engine);
    println!("purpose:  {}", physics.purpose);
    for (name, value) in &physics.parameters {
        println!("  {name:<32} {value}");
    }
}

fn print_analysis(result: &AnalysisResult) {
    if !result.substation_id.is_empty() {
        println!("substation: {}", result.substation_id);
    }
    match result.status() {
        Some(status) => println!("status:     {status}"),
        None => println!("status:     not reported"),
    }
    if let Some(score) = result.confidence() {
        println!("confidence: {score:.2}");
    }
    if let Some(a) = &result.analysis {
        let b = &a.energy_balance;
        println!(
            "balance:    in {:.3} MWh, out {:.3} MWh, expected loss {:.3} MWh, residual {:.3} MWh ({:.2}%)",
            b.input_mwh, b.output_mwh, b.expected_loss_mwh, b.residual_mwh, b.residual_percentage
        );
        if let Some(reason) = &a.refusal_reason {
            println!("refused:    {reason}");
        }
        if let Some(explanation) = &a.physical_explanation {
            println!("note:       {explanation}");
        }
    }
    for loss in result.component_losses() {
        println!(
            "  {:<16} {:<14} {:>10.3} MWh {:>7.2}%",
            loss.id, loss.component_type, loss.loss_mwh, loss.loss_percent
        );
    }
}

#[tokio::main]
async fn main() {
    let cli = match cli::parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };
    if cli.command == Command::Help {
        cli::print_usage();
        return;
    }

    logging::init(cli.verbose, cli.command == Command::Dashboard);
    let config = load_config(&cli);
    let client = match ApiClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    match cli.command {
        Command::Status => {
            let mut poller = StatusPoller::new(client);
            match poller.poll().await {
                ViewState::Ready { health, physics } => print_status(&health, &physics),
                ViewState::Error { message } => {
                    eprintln!("error: {message}");
                    process::exit(1);
                }
                ViewState::Loading => {}
            }
        }
        Command::Health => match client.health().await {
            Ok(health) => print_json(&health),
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        },
        Command::Physics => match client.physics_info().await {
            Ok(info) => print_json(&info),
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        },
        Command::Info => match client.service_info().await {
            Ok(info) => print_json(&info),
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        },
        Command::Url => println!("{}", client.api_url()),
        Command::Analyze {
            request,
            losses_out,
        } => {
            let request = match load_analysis_request(&request) {
                Ok(req) => req,
                Err(e) => {
                    eprintln!("{e}");
                    process::exit(1);
                }
            };
            let result = match client.analyze_grid(&request).await {
                Ok(result) => result,
                Err(e) => {
                    eprintln!("error: {e}");
                    process::exit(1);
                }
            };
            print_analysis(&result);

            if let Some(path) = losses_out {
                if let Err(e) = export_component_losses(&result, &path) {
                    eprintln!("error: failed to write CSV: {e}");
                    process::exit(1);
                }
                eprintln!("Component losses written to {}", path.display());
            }
        }
        Command::Dashboard => run_dashboard(client, &config).await,
        Command::Help => {}
    }
}

#[cfg(feature = "tui")]
async fn run_dashboard(client: ApiClient, config: &ClientConfig) {
    if let Err(e) = urja_client::tui::run(client, config.refresh_interval()).await {
        eprintln!("error: dashboard crashed: {e}");
        process::exit(1);
    }
}

#[cfg(not(feature = "tui"))]
async fn run_dashboard(_client: ApiClient, _config: &ClientConfig) {
    eprintln!("error: the dashboard requires building with `--features tui`");
    process::exit(1);
}

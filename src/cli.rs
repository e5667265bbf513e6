//! Command-line argument parsing.

use std::env;
use std::path::PathBuf;

/// What the binary should do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Run one poll cycle and print the merged status.
    Status,
    Health,
    Physics,
    /// Print the backend's service description.
    Info,
    /// Print the resolved base URL.
    Url,
    /// Submit an analysis request read from a JSON or TOML file.
    Analyze {
        request: PathBuf,
        losses_out: Option<PathBuf>,
    },
    /// Launch the terminal dashboard.
    Dashboard,
    Help,
}

/// Parsed CLI arguments.
#[derive(Debug, Clone)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub api_url: Option<String>,
    pub verbose: bool,
    pub command: Command,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

fn parse_args_from(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut config = None;
    let mut api_url = None;
    let mut verbose = false;
    let mut command = None;
    let mut request = None;
    let mut losses_out = None;

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --config (expected a TOML file path)")?;
                if config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--api-url" => {
                i += 1;
                let url = args.next_or_err(i, "missing value for --api-url (expected a URL)")?;
                if api_url.replace(url.to_string()).is_some() {
                    return Err("--api-url provided more than once".to_string());
                }
            }
            "--losses-out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --losses-out (expected a file path)")?;
                if losses_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--losses-out provided more than once".to_string());
                }
            }
            "-v" | "--verbose" => verbose = true,
            "--help" | "-h" | "help" => {
                return Ok(CliOptions {
                    config,
                    api_url,
                    verbose,
                    command: Command::Help,
                });
            }
            other if other.starts_with('-') => return Err(format!("unknown argument: {other}")),
            word => {
                if command.is_none() {
                    command = Some(parse_command(word)?);
                } else if matches!(command, Some(Command::Analyze { .. })) && request.is_none() {
                    request = Some(PathBuf::from(word));
                } else {
                    return Err(format!("unexpected argument: {word}"));
                }
            }
        }
        i += 1;
    }

    let command = match command.unwrap_or(Command::Status) {
        Command::Analyze { .. } => Command::Analyze {
            request: request.ok_or_else(|| {
                "missing request file for `analyze` (expected a .json or .toml path)".to_string()
            })?,
            losses_out,
        },
        _ if losses_out.is_some() => {
            return Err("--losses-out is only valid with `analyze`".to_string());
        }
        other => other,
    };

    Ok(CliOptions {
        config,
        api_url,
        verbose,
        command,
    })
}

fn parse_command(word: &str) -> Result<Command, String> {
    match word {
        "status" => Ok(Command::Status),
        "health" => Ok(Command::Health),
        "physics" => Ok(Command::Physics),
        "info" => Ok(Command::Info),
        "url" => Ok(Command::Url),
        "analyze" => Ok(Command::Analyze {
            request: PathBuf::new(),
            losses_out: None,
        }),
        "dashboard" => Ok(Command::Dashboard),
        other => Err(format!("unknown command: {other}")),
    }
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("urja: client for the UrjaRakshak grid backend");
    eprintln!();
    eprintln!("Usage: urja [OPTIONS] [COMMAND]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  status                   Poll health and physics info (default)");
    eprintln!("  health                   GET /health");
    eprintln!("  physics                  GET /api/v1/physics/info");
    eprintln!("  info                     GET / (service description)");
    eprintln!("  url                      Print the resolved base URL");
    eprintln!("  analyze <request>        POST a .json or .toml analysis request");
    eprintln!("  dashboard                Terminal dashboard (requires the `tui` feature)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load client config from a TOML file");
    eprintln!("  --api-url <url>          Override the backend base URL");
    eprintln!("  --losses-out <path>      With `analyze`: write component losses to CSV");
    eprintln!("  -v, --verbose            Debug logging (RUST_LOG overrides)");
    eprintln!("  -h, --help               Show this help message");
    eprintln!();
    eprintln!("The base URL defaults to http://localhost:8000 and may be set with URJA_API_URL.");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn defaults_to_status() {
        let opts = parse_args_from(&[]).expect("parse should succeed");
        assert_eq!(opts.command, Command::Status);
        assert!(opts.config.is_none());
        assert!(opts.api_url.is_none());
        assert!(!opts.verbose);
    }

    #[test]
    fn global_options_before_command() {
        let opts = parse_args_from(&args(&[
            "--config",
            "urja.toml",
            "--api-url",
            "https://grid.example.org",
            "-v",
            "health",
        ]))
        .expect("parse should succeed");
        assert_eq!(opts.command, Command::Health);
        assert_eq!(
            opts.config.as_deref().and_then(|p| p.to_str()),
            Some("urja.toml")
        );
        assert_eq!(opts.api_url.as_deref(), Some("https://grid.example.org"));
        assert!(opts.verbose);
    }

    #[test]
    fn analyze_takes_request_and_losses_out() {
        let opts = parse_args_from(&args(&[
            "analyze",
            "ss001.json",
            "--losses-out",
            "losses.csv",
        ]))
        .expect("parse should succeed");
        assert_eq!(
            opts.command,
            Command::Analyze {
                request: PathBuf::from("ss001.json"),
                losses_out: Some(PathBuf::from("losses.csv")),
            }
        );
    }

    #[test]
    fn analyze_requires_request() {
        let err = parse_args_from(&args(&["analyze"])).expect_err("missing file should fail");
        assert!(err.contains("missing request file"));
    }

    #[test]
    fn losses_out_requires_analyze() {
        let err = parse_args_from(&args(&["status", "--losses-out", "x.csv"]))
            .expect_err("losses-out without analyze should fail");
        assert!(err.contains("only valid with `analyze`"));
    }

    #[test]
    fn rejects_unknown_and_duplicate_arguments() {
        assert!(parse_args_from(&args(&["--bogus"])).is_err());
        assert!(parse_args_from(&args(&["frobnicate"])).is_err());
        assert!(parse_args_from(&args(&["health", "physics"])).is_err());
        assert!(parse_args_from(&args(&["--config", "a.toml", "--config", "b.toml"])).is_err());
        assert!(parse_args_from(&args(&["--api-url"])).is_err());
    }

    #[test]
    fn help_flag() {
        let opts = parse_args_from(&args(&["--help"])).expect("parse should succeed");
        assert_eq!(opts.command, Command::Help);
    }

    #[test]
    fn help_wins_regardless_of_position() {
        for list in [
            &["--help", "analyze"][..],
            &["analyze", "--help"][..],
            &["analyze", "help"][..],
            &["-v", "health", "-h", "--bogus"][..],
            &["help"][..],
        ] {
            let opts = parse_args_from(&args(list)).expect("help should parse");
            assert_eq!(opts.command, Command::Help, "args: {list:?}");
        }
    }
}

mod report;

use dxrules::{Error, Options, Selection, Session};
use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const RULES_ENV: &str = "DXRULES_RULES";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    std::process::exit(run(config));
}

fn run(config: CliConfig) -> i32 {
    let mut session = Session::new();
    let summary = match session.load_file(&config.rules) {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("error: {err}");
            return 1;
        }
    };
    report::print_load(&summary, config.color);

    if config.list_symptoms {
        report::print_catalog(session.catalog(), config.color);
        if config.symptoms.is_empty() {
            return 0;
        }
    }

    let symptoms = if config.symptoms.is_empty() {
        match read_stdin_symptoms() {
            Ok(symptoms) => symptoms,
            Err(err) => {
                eprintln!("{err}");
                return 2;
            }
        }
    } else {
        config.symptoms
    };

    let selection = Selection::new(&symptoms);
    for symptom in selection.iter() {
        if !session.catalog().is_empty() && !session.catalog().contains(symptom.as_str()) {
            tracing::warn!(%symptom, "selected symptom is not declared in the Attributes: block");
        }
    }

    let options = Options { limit: config.limit };
    match session.diagnose_with(&selection, &options) {
        Ok(diagnosis) => {
            report::print_diagnosis(&diagnosis, config.color);
            0
        }
        Err(Error::EmptySelection) => {
            eprintln!("error: please select at least one symptom\n\n{}", help_text());
            2
        }
        Err(err) => {
            eprintln!("error: {err}");
            1
        }
    }
}

struct CliConfig {
    rules: PathBuf,
    symptoms: Vec<String>,
    list_symptoms: bool,
    limit: Option<usize>,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut rules: Option<PathBuf> = std::env::var_os(RULES_ENV).map(PathBuf::from);
    let mut symptoms: Vec<String> = Vec::new();
    let mut list_symptoms = false;
    let mut limit: Option<usize> = None;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("dxrules {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "-l" | "--list-symptoms" => list_symptoms = true,
            "-r" | "--rules" => {
                let value = args.next().ok_or_else(|| "error: --rules expects a value".to_string())?;
                rules = Some(PathBuf::from(value));
            }
            "-n" | "--limit" => {
                let value = args.next().ok_or_else(|| "error: --limit expects a value".to_string())?;
                limit = Some(parse_limit(&value)?);
            }
            "--" => {
                symptoms.extend(args.by_ref());
                break;
            }
            _ if arg.starts_with("--rules=") => {
                rules = Some(PathBuf::from(arg.trim_start_matches("--rules=")));
            }
            _ if arg.starts_with("--limit=") => {
                limit = Some(parse_limit(arg.trim_start_matches("--limit="))?);
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => symptoms.push(arg),
        }
    }

    let rules = rules
        .ok_or_else(|| format!("error: no rule document given (use --rules or {RULES_ENV})\n\n{}", help_text()))?;

    Ok(CliConfig { rules, symptoms, list_symptoms, limit, color })
}

fn parse_limit(value: &str) -> Result<usize, String> {
    value.parse::<usize>().map_err(|_| format!("error: invalid --limit '{value}' (expected a non-negative integer)"))
}

/// One symptom per line; blank lines are skipped by `Selection`.
fn read_stdin_symptoms() -> Result<Vec<String>, String> {
    io::stdin()
        .lock()
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| format!("error: failed to read stdin: {err}"))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "dxrules {version}

Diagnose from a rule-export document.

Usage:
  dxrules [OPTIONS] --rules <file> [--] <symptom...>
  dxrules [OPTIONS] --rules <file> --list-symptoms

Symptoms are Category=Value tokens as listed in the document's Attributes:
block (e.g. Fever=t Critical=Yes). When none are given on the command line
they are read from stdin, one per line.

Options:
  -r, --rules <file>         Rule-export document. Default: ${rules_env}
  -l, --list-symptoms        Print the symptom catalog grouped by category.
  -n, --limit <n>            Show at most <n> diagnoses.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  RUST_LOG                   Log filter (default: warn), e.g. dxrules=debug.

Exit codes:
  0  Success (including no matching diagnosis).
  1  The rule document could not be read.
  2  Invalid arguments or no symptoms selected.
",
        version = env!("CARGO_PKG_VERSION"),
        rules_env = RULES_ENV
    )
}

//! AgroMind command-line advisor
//!
//! Usage:
//!   agromind <crop> <location> [date] [--json] [--lang zh-tw|en]
//!
//! Prints the result panel (or the JSON response with `--json`). Exits with
//! status 2 for an unsupported crop and 1 for engine failures.

use agromind::report::{JsonFormatter, TextFormatter};
use agromind::utils::{init_logging, logging::DEFAULT_LOG_FILTER};
use agromind::{AdvisorConfig, RecommendationResponse, RecommendationService, RecommendRequest};
use anyhow::{Context, Result};
use std::process::ExitCode;

const USAGE: &str = "Usage: agromind <crop> <location> [date] [--json] [--lang zh-tw|en]";

struct Args {
    request: RecommendRequest,
    json: bool,
    language: Option<String>,
}

fn parse_args() -> Result<Args> {
    let mut positional = Vec::new();
    let mut json = false;
    let mut language = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--lang" => {
                language = Some(args.next().context("--lang needs a value")?);
            }
            "-h" | "--help" => anyhow::bail!("{}", USAGE),
            _ => positional.push(arg),
        }
    }

    if positional.len() < 2 || positional.len() > 3 {
        anyhow::bail!("{}", USAGE);
    }

    let mut positional = positional.into_iter();
    let crop = positional.next().unwrap_or_default();
    let location = positional.next().unwrap_or_default();
    let mut request = RecommendRequest::new(crop, location);
    request.date = positional.next();

    Ok(Args { request, json, language })
}

fn run() -> Result<ExitCode> {
    init_logging(DEFAULT_LOG_FILTER);

    let args = parse_args()?;

    let mut config = AdvisorConfig::from_env()?;
    if let Some(lang) = &args.language {
        config.language = lang.parse()?;
    }

    let service = RecommendationService::new(config);
    let result = service.recommend_request(&args.request);
    let exit = match &result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) if e.is_validation() => ExitCode::from(2),
        Err(_) => ExitCode::from(1),
    };

    if args.json {
        let response = RecommendationResponse::from_result(result, config.language);
        println!("{}", JsonFormatter::format(&response)?);
    } else {
        match result {
            Ok(rec) => print!("{}", TextFormatter::format(&rec, config.language)),
            Err(e) => eprintln!("{}", agromind::recommend::localized_error(&e, config.language)),
        }
    }

    Ok(exit)
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::from(64)
        }
    }
}

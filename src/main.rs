//! Name Forge - suggest names for a product, project or domain
//!
//! Runs the bundled strategies against one input and prints the suggestions
//! with the pipelines that produced them.

use anyhow::Context;
use name_forge::{
    strategies::builtin_filters, SamplerKind, SuggestConfig, SuggestionEngine, SuggestionResult,
};
use std::env;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Parsed command line
#[derive(Debug, Default)]
struct Options {
    input: String,
    max: Option<usize>,
    sampler: Option<SamplerKind>,
    label: Option<String>,
    config: Option<PathBuf>,
    json: bool,
}

enum Command {
    Help,
    Run(Options),
}

#[tokio::main]
async fn main() {
    if let Err(e) = name_forge::init() {
        eprintln!("❌ Failed to initialize: {}", e.user_message());
        process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(Command::Help) => {
            print_help();
            return;
        }
        Ok(Command::Run(options)) => options,
        Err(message) => {
            eprintln!("❌ {}", message);
            eprintln!("Run `name-forge --help` for usage.");
            process::exit(1);
        }
    };

    if let Err(e) = run(options).await {
        eprintln!("❌ Error: {:#}", e);
        process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut options = Options::default();
    let mut words = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let mut value = || {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("missing value for {}", arg))
        };

        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--json" => options.json = true,
            "--max" | "-n" => {
                let raw = value()?;
                let max = raw
                    .parse()
                    .map_err(|_| format!("--max expects a number, got '{}'", raw))?;
                options.max = Some(max);
            }
            "--sampler" => {
                let raw = value()?;
                options.sampler = Some(raw.parse().map_err(|e: name_forge::NameForgeError| e.to_string())?);
            }
            "--label" => options.label = Some(value()?),
            "--config" => options.config = Some(PathBuf::from(value()?)),
            flag if flag.starts_with("--") => return Err(format!("unknown option {}", flag)),
            word => words.push(word.to_string()),
        }
    }

    options.input = words.join(" ");
    if options.input.trim().is_empty() {
        return Err("an input name is required".to_string());
    }
    Ok(Command::Run(options))
}

async fn run(options: Options) -> anyhow::Result<()> {
    let mut config = match &options.config {
        Some(path) => SuggestConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SuggestConfig::default(),
    };
    config.apply_env().context("reading NAME_FORGE_* environment")?;

    let filters = builtin_filters(&config, &options.input)?;
    let engine = SuggestionEngine::with_builtin_strategies(config);

    let mut request = engine.request(options.input.as_str()).with_filters(filters);
    if let Some(max) = options.max {
        request = request.with_max_suggestions(max);
    }
    if let Some(sampler) = options.sampler {
        request = request.with_sampler(sampler);
    }
    if let Some(label) = options.label {
        request = request.with_label(label);
    }

    let result = engine.suggest(request).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        display_suggestions(&options.input, &result);
    }
    Ok(())
}

fn display_suggestions(input: &str, result: &SuggestionResult) {
    println!("🔥 Suggestions for \"{}\" (label: {})", input, result.label);
    println!();

    if result.suggestions.is_empty() {
        println!("No suggestions found.");
        return;
    }

    let width = result
        .suggestions
        .iter()
        .map(|s| s.text.chars().count())
        .max()
        .unwrap_or(0);
    for suggestion in &result.suggestions {
        println!(
            "  {:<width$}  [{}]",
            suggestion.text,
            suggestion.provenance.join(", "),
            width = width
        );
    }

    println!();
    if result.exhausted {
        println!("All strategies exhausted ({} found).", result.suggestions.len());
    }
}

fn print_help() {
    println!("🔥 Name Forge - multi-strategy name suggestions");
    println!("═══════════════════════════════════════════════");
    println!();
    println!("USAGE:");
    println!("    name-forge [OPTIONS] <INPUT>");
    println!();
    println!("OPTIONS:");
    println!("    -n, --max N         Maximum number of suggestions (default: 20)");
    println!("        --sampler KIND  weighted, weighted-ordered or round-robin");
    println!("        --label L       Seed label; the same label gives the same output");
    println!("        --config PATH   JSON configuration file");
    println!("        --json          Print the result as JSON");
    println!("    -h, --help          Print this help");
    println!();
    println!("EXAMPLES:");
    println!("    name-forge forge");
    println!("    name-forge --max 5 --label demo \"cloud kitchen\"");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    NAME_FORGE_MAX_SUGGESTIONS, NAME_FORGE_SAMPLER, NAME_FORGE_BATCH_SIZE,");
    println!("    NAME_FORGE_MIN_LENGTH, NAME_FORGE_MAX_LENGTH, NAME_FORGE_BLOCKED_WORDS");
    println!("    RUST_LOG            Log filter (default: info)");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let Ok(Command::Run(options)) = parse_args(&args(&["--max", "5", "--json", "cloud", "kitchen"])) else {
            panic!("expected run");
        };
        assert_eq!(options.input, "cloud kitchen");
        assert_eq!(options.max, Some(5));
        assert!(options.json);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["--max", "lots", "x"])).is_err());
        assert!(parse_args(&args(&["--sampler", "random", "x"])).is_err());
        assert!(parse_args(&args(&["--bogus", "x"])).is_err());
        assert!(matches!(parse_args(&args(&["-h"])), Ok(Command::Help)));
    }
}

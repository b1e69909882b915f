use std::path::{Path, PathBuf};

use argtree_core::{Definition, Helper, LangPackage, Processed};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "argtree", disable_help_subcommand = true)]
#[command(about = "Parse command lines against rule definitions and render their help", version)]
struct Cli {
    /// Diagnostics filter for stderr, used when RUST_LOG is unset (e.g. `debug`).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse tokens against a rule definition and print the result.
    Parse(ParseArgs),
    /// Render the help page of a command path.
    Help(HelpArgs),
    /// Check that one or more rule definitions build.
    Validate(ValidateArgs),
    /// Print the built-in English language package.
    Lang(LangArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Rule definition file (.json, .yaml or .yml).
    #[arg(long)]
    rules: PathBuf,
    /// Output format of the parse result.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Tokens to parse, program name excluded. Pass them after `--`.
    #[arg(last = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct HelpArgs {
    /// Rule definition file (.json, .yaml or .yml).
    #[arg(long)]
    rules: PathBuf,
    /// Command path, e.g. `users add`. Empty for the root page.
    path: Vec<String>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Rule definition files.
    #[arg(long = "rules", required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct LangArgs {
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

/// Why a subcommand failed.
#[derive(Debug)]
enum Failure {
    /// Printed as `error: <message>`.
    Message(String),
    /// Output already written to stderr.
    Rendered,
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Help(args) => run_help(args),
        Command::Validate(args) => run_validate(args),
        Command::Lang(args) => run_lang(args),
    };

    match result {
        Ok(()) => {}
        Err(Failure::Message(err)) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
        Err(Failure::Rendered) => std::process::exit(1),
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_parse(args: ParseArgs) -> Result<(), Failure> {
    let helper = load_helper(&args.rules)?;
    debug!(tokens = ?args.tokens, "parsing");

    match helper.parse_and_process(&args.tokens) {
        Processed::Result(result) => {
            println!("{}", format_output(&result, args.format)?);
            Ok(())
        }
        Processed::Help(lines) => {
            print_lines(&lines);
            Ok(())
        }
        Processed::Error(lines) => {
            print_lines_err(&lines);
            Err(Failure::Rendered)
        }
    }
}

fn run_help(args: HelpArgs) -> Result<(), Failure> {
    let helper = load_helper(&args.rules)?;
    match helper.generate_help_for_path(&args.path) {
        Ok(lines) => {
            print_lines(&lines);
            Ok(())
        }
        Err(err) => {
            print_lines_err(&helper.generate_error_output(&err));
            Err(Failure::Rendered)
        }
    }
}

fn run_validate(args: ValidateArgs) -> Result<(), Failure> {
    let mut failed = 0usize;
    for path in &args.inputs {
        if let Err(err) = load_helper(path) {
            eprintln!("{err}");
            failed += 1;
        }
    }
    if failed > 0 {
        return Err(Failure::Message(format!(
            "{failed} of {} definition file(s) failed validation",
            args.inputs.len()
        )));
    }
    println!("Validated {} definition file(s).", args.inputs.len());
    Ok(())
}

fn run_lang(args: LangArgs) -> Result<(), Failure> {
    println!("{}", format_output(&LangPackage::english(), args.format)?);
    Ok(())
}

/// Loads a definition file and builds its helper.
fn load_helper(path: &Path) -> Result<Helper, String> {
    let definition = Definition::load(path)
        .map_err(|err| format!("Failed to load '{}': {err}", path.display()))?;
    Helper::from_definition(&definition)
        .map_err(|err| format!("Invalid rules in '{}': {err} ({})", path.display(), err.name()))
}

fn format_output<T: Serialize>(value: &T, format: CliOutputFormat) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        CliOutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| format!("YAML serialization failed: {e}"))
        }
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

fn print_lines_err(lines: &[String]) {
    for line in lines {
        eprintln!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::{CliOutputFormat, format_output, load_helper};
    use argtree_core::ParseResult;

    #[test]
    fn test_format_output_yaml_and_json() {
        let result = ParseResult {
            successful: true,
            commands: vec!["add".to_string()],
            ..ParseResult::default()
        };
        let yaml = format_output(&result, CliOutputFormat::Yaml).unwrap();
        assert!(yaml.contains("successful: true"));
        assert!(yaml.contains("- add"));

        let json = format_output(&result, CliOutputFormat::Json).unwrap();
        let back: ParseResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_load_helper_reports_path() {
        let err = load_helper(std::path::Path::new("/nonexistent/rules.yaml")).unwrap_err();
        assert!(err.starts_with("Failed to load '/nonexistent/rules.yaml'"));
    }
}

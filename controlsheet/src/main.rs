use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use controlsheet_core::config::DEFAULT_CONFIG_FILE;
use controlsheet_core::{ReportConfig, ReportGenerator};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod formatter;

#[derive(Parser)]
#[command(name = "controlsheet")]
#[command(about = "Convert a security-control catalog (JSON) into an XLSX checklist with progress tracking", long_about = None)]
#[command(version)]
struct Cli {
    /// Catalog JSON file to convert (e.g. 'OWASP_Application_Security_Verification_Standard_5.0.0_en.json')
    #[arg(short = 'i', long = "input_file", value_name = "FILE")]
    input_file: PathBuf,

    /// Output xlsx file (defaults to <ShortName>-<Version>.xlsx)
    #[arg(short = 'o', long = "output_file", value_name = "FILE")]
    output_file: Option<PathBuf>,

    /// Additional column(s) after "Comments"; may be given several times (e.g. -c Findings)
    #[arg(short = 'c', long = "columns", value_name = "NAME", num_args = 1.., action = ArgAction::Append)]
    columns: Vec<String>,

    /// Path to configuration file (TOML)
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Output format of the run summary
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Build the report and show the summary without writing the file
    #[arg(long)]
    dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON output for scripting
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    config.validate().context("Invalid configuration")?;

    let generator = ReportGenerator::with_config(config);
    let output = cli.output_file.as_deref();

    let summary = if cli.dry_run {
        generator.dry_run(&cli.input_file, output, &cli.columns)
    } else {
        generator.generate_file(&cli.input_file, output, &cli.columns)
    }
    .with_context(|| format!("Failed to convert {}", cli.input_file.display()))?;

    match cli.format {
        OutputFormat::Human => formatter::print_human(&summary),
        OutputFormat::Json => formatter::print_json(&summary)?,
    }

    Ok(())
}

/// Logs go to stderr; `RUST_LOG` overrides the `-v` level
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ReportConfig> {
    if let Some(config_path) = path {
        return ReportConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()));
    }

    // Try to load default config from current directory if it exists
    let default_config_path = PathBuf::from(DEFAULT_CONFIG_FILE);
    if default_config_path.exists() {
        ReportConfig::from_file(&default_config_path).with_context(|| {
            format!(
                "Failed to load config from {}",
                default_config_path.display()
            )
        })
    } else {
        Ok(ReportConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_columns_are_flattened() {
        let cli = Cli::try_parse_from([
            "controlsheet",
            "-i",
            "asvs.json",
            "-c",
            "Findings",
            "Severity",
            "--columns",
            "Owner",
        ])
        .unwrap();

        assert_eq!(cli.input_file, PathBuf::from("asvs.json"));
        assert_eq!(cli.columns, vec!["Findings", "Severity", "Owner"]);
        assert!(cli.output_file.is_none());
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_long_option_names() {
        let cli = Cli::try_parse_from([
            "controlsheet",
            "--input_file",
            "asvs.json",
            "--output_file",
            "out.xlsx",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.output_file, Some(PathBuf::from("out.xlsx")));
        assert!(cli.columns.is_empty());
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_input_is_required() {
        assert!(Cli::try_parse_from(["controlsheet", "-o", "out.xlsx"]).is_err());
    }

    #[test]
    fn test_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[style]\nfont_size = 11\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.style.font_size, 11.0);

        let err = load_config(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(err.to_string().contains("missing.toml"));
    }
}

//! LCP Node Audit CLI - Command-line interface for running the audit over gathered artifacts
//!
//! Architecture: Application Layer - CLI coordinates user interactions with domain services
//! - Translates user commands to runner operations
//! - Handles external concerns like file I/O, process exit codes, and terminal output

use clap::{Parser, Subcommand, ValueEnum};
use lcp_node_audit::{
    run_artifacts_file, runner_from_config, AuditConfig, AuditOutcome, OutputFormat,
    ReportFormatter,
};
use std::path::{Path, PathBuf};
use std::process;

/// Config files looked up in the working directory when `--config` is absent
const DEFAULT_CONFIGS: [&str; 3] = ["lcp_audit.yaml", "lcp_audit.yml", ".lcp_audit.yaml"];

/// LCP Node Audit - Identify the Largest Contentful Paint element
#[derive(Parser)]
#[command(name = "lcp-node-audit")]
#[command(version)]
#[command(about = "Report the Largest Contentful Paint element from trace-derived element records")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the audits over an artifacts JSON file
    Run {
        /// Artifacts file containing the ElementRecords collection
        #[arg(short, long)]
        artifacts: PathBuf,

        /// Output format (defaults to the config's `output.pretty`)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormatArg>,

        /// Override the configured locale
        #[arg(long)]
        locale: Option<String>,
    },

    /// Print the metadata of every registered audit
    Meta {
        /// Output format
        #[arg(short, long, value_enum, default_value = "json-pretty")]
        format: OutputFormatArg,
    },

    /// Validate configuration file
    ValidateConfig {
        /// Configuration file to validate
        config_file: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, ValueEnum, PartialEq)]
enum OutputFormatArg {
    Json,
    JsonPretty,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run_command(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run_command(cli: Cli) -> AuditOutcome<i32> {
    match cli.command {
        Commands::Run {
            artifacts,
            format,
            locale,
        } => run_audits(cli.config, artifacts, format, locale),
        Commands::Meta { format } => run_meta(cli.config, format),
        Commands::ValidateConfig { config_file } => run_validate_config(config_file.or(cli.config)),
    }
}

fn load_config(config_path: Option<PathBuf>) -> AuditOutcome<AuditConfig> {
    if let Some(config_path) = config_path {
        return AuditConfig::load_from_file(config_path);
    }

    for config_name in &DEFAULT_CONFIGS {
        if Path::new(config_name).exists() {
            return AuditConfig::load_from_file(config_name);
        }
    }

    Ok(AuditConfig::default())
}

fn run_audits(
    config_path: Option<PathBuf>,
    artifacts: PathBuf,
    format: Option<OutputFormatArg>,
    locale: Option<String>,
) -> AuditOutcome<i32> {
    let mut config = load_config(config_path)?;
    if let Some(locale) = locale {
        config.locale = locale;
        config.validate()?;
    }

    let format = match format {
        Some(format) => format.into(),
        None if config.output.pretty => OutputFormat::JsonPretty,
        None => OutputFormat::Json,
    };

    let report = run_artifacts_file(&artifacts, &config)?;
    ReportFormatter::new(format).write_report(&report, std::io::stdout().lock())?;

    if report.has_errors() {
        Ok(1)
    } else {
        Ok(0)
    }
}

fn run_meta(config_path: Option<PathBuf>, format: OutputFormatArg) -> AuditOutcome<i32> {
    let config = load_config(config_path)?;
    let runner = runner_from_config(&config)?;

    println!(
        "{}",
        ReportFormatter::new(format.into()).format_metas(&runner.audit_metas())?
    );
    Ok(0)
}

fn run_validate_config(config_path: Option<PathBuf>) -> AuditOutcome<i32> {
    let config_path = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIGS[0]));

    println!("Validating configuration: {}", config_path.display());

    let loaded = AuditConfig::load_from_file(&config_path)
        .and_then(|config| config.load_catalog().map(|catalog| (config, catalog)));

    match loaded {
        Ok((config, catalog)) => {
            println!("✅ Configuration is valid");
            println!("  Locale: {}", config.locale);
            println!("  Translated messages: {}", catalog.translated_count());
            Ok(0)
        }
        Err(e) => {
            eprintln!("❌ Configuration validation failed: {}", e);
            Ok(1)
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

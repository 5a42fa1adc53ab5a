// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use screenwright::app_config::{self, Config, GenerationProvider, ImageProvider};
use screenwright::app_controller::Controller;

/// CLI Wrapper for GenerationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliGenerationProvider {
    Anthropic,
    Mock,
}

impl From<CliGenerationProvider> for GenerationProvider {
    fn from(cli_provider: CliGenerationProvider) -> Self {
        match cli_provider {
            CliGenerationProvider::Anthropic => GenerationProvider::Anthropic,
            CliGenerationProvider::Mock => GenerationProvider::Mock,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a screenplay from a story premise
    Generate(GenerateArgs),

    /// Generate shell completions for screenwright
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Story premise; several words are joined with spaces
    #[arg(value_name = "PREMISE", required = true, num_args = 1..)]
    premise: Vec<String>,

    /// Force overwrite of an existing screenplay with the same name
    #[arg(short, long)]
    force_overwrite: bool,

    /// Creative generation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliGenerationProvider>,

    /// Model name to use for creative generation
    #[arg(short, long)]
    model: Option<String>,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Author shown on the title page
    #[arg(short, long)]
    author: Option<String>,

    /// Skip character portraits
    #[arg(long)]
    no_portraits: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// Screenwright - staged AI screenplay generation
#[derive(Parser, Debug)]
#[command(name = "screenwright")]
#[command(version = "0.1.0")]
#[command(about = "Generate formatted screenplays from a story premise")]
#[command(long_about = "Screenwright turns a premise into a logline, outline, characters, scenes and dialogue,
then lays the result out as a paginated screenplay with character reference pages.

EXAMPLES:
    screenwright generate \"A lighthouse keeper refuses to leave\"
    screenwright generate -f -o scripts \"A heist on the moon\"
    screenwright generate -p mock --no-portraits \"Two rival bakers\"
    screenwright completions bash > screenwright.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI colour for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌", "1;31"),
            Level::Warn => ("🚧", "1;33"),
            Level::Info => ("🎬", "1;32"),
            Level::Debug => ("🔍", "1;36"),
            Level::Trace => ("📋", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, colour) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                colour,
                now,
                emoji,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info by default, adjusted once the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "screenwright", &mut std::io::stdout());
            Ok(())
        }
        Commands::Generate(args) => {
            if let Err(e) = run_generate(args).await {
                error!("{:#}", e);
                return Err(e);
            }
            Ok(())
        }
    }
}

/// Load the config file, or write a default one when it is missing
fn load_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .with_context(|| format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", config_path))
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", config_path))?;
        Ok(config)
    }
}

/// Apply command line overrides on top of the config file
fn apply_overrides(config: &mut Config, options: &GenerateArgs) {
    if let Some(provider) = &options.provider {
        config.generation.provider = provider.clone().into();
        // Offline runs stay offline for portraits too
        if config.generation.provider == GenerationProvider::Mock {
            config.images.provider = ImageProvider::Mock;
        }
    }
    if let Some(model) = &options.model {
        config.generation.model = model.clone();
    }
    if let Some(dir) = &options.output_dir {
        config.output.directory = dir.to_string_lossy().to_string();
    }
    if let Some(author) = &options.author {
        config.output.author = author.clone();
    }
    if options.no_portraits {
        config.images.enabled = false;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}

fn stage_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

async fn run_generate(options: GenerateArgs) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let premise = options.premise.join(" ");
    if premise.trim().is_empty() {
        return Err(anyhow!("PREMISE must not be empty"));
    }

    let mut config = load_config(&options.config_path)?;
    apply_overrides(&mut config, &options);
    config.validate().context("Configuration validation failed")?;
    log::set_max_level(level_filter(&config.log_level));

    info!(
        "🚀 Screenwright: {} - {}",
        config.generation.provider.display_name(),
        config.generation.model
    );

    let output_dir = PathBuf::from(&config.output.directory);
    let spinner = stage_spinner();
    let pb = spinner.clone();
    let controller = Controller::with_config(config)?.with_progress_callback(Box::new(move |progress| {
        pb.set_message(format!(
            "[{}/5] {}",
            progress.completed_stages,
            progress.status
        ));
    }));

    let result = controller.run(&premise, &output_dir, options.force_overwrite).await;
    spinner.finish_and_clear();
    let report = result?;

    for failure in &report.portrait_failures {
        warn!("Missing portrait: {}", failure);
    }
    info!(
        "\"{}\": {} episodes, {} body pages ({})",
        report.title,
        report.episodes(),
        report.body_pages,
        report.timings.summary()
    );
    info!("Success: {:?}", report.document_path);
    for path in &report.portrait_paths {
        info!("Portrait: {:?}", path);
    }

    Ok(())
}

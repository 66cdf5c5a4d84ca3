use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser};
use demin::{
    config::{Config, Logging, limit_from_signed},
    orchestrator::deminify_file,
};
use log::LevelFilter;

/// Split a minified AMD bundle into one ES module per define() call
#[derive(Debug, Parser)]
#[command(name = "demin", version, about)]
struct Cli {
    /// Bundle to deminify
    #[arg(short, long)]
    input: PathBuf,

    /// Output folder (overrides `output-folder` from the config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Remove the output folder before writing
    #[arg(long)]
    clean: bool,

    /// Do not write any files
    #[arg(long)]
    dry: bool,

    /// Maximum number of modules to emit; negative means unlimited
    #[arg(long, allow_negative_numbers = true)]
    limit: Option<i64>,

    /// Format emitted code with prettier
    #[arg(long)]
    prettier: bool,

    /// Only report fatal errors
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Config file to use instead of ./demin.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn apply_to(&self, config: &mut Config) {
        if let Some(output) = &self.output {
            config.output_folder = Some(output.clone());
        }
        if self.clean {
            config.clean = true;
        }
        if self.dry {
            config.dry = true;
        }
        if let Some(limit) = self.limit {
            config.limit = limit_from_signed(limit);
        }
        if self.prettier {
            config.prettier = true;
        }
        if self.quiet {
            config.logging = Logging::None;
        }
    }

    /// Logging in effect while the config files are read, before their
    /// `logging` setting is known
    fn provisional_logging(&self) -> Logging {
        if self.quiet {
            Logging::None
        } else {
            Logging::Verbose
        }
    }

    /// The level to switch to once `config` is loaded, if it differs from the
    /// provisional one
    fn configured_level(&self, config: &Config) -> Option<LevelFilter> {
        (config.logging != self.provisional_logging())
            .then(|| log_level(config.logging, self.verbose))
    }
}

fn log_level(logging: Logging, verbose: u8) -> LevelFilter {
    match (logging, verbose) {
        (Logging::None, _) => LevelFilter::Error,
        (Logging::Verbose, 0) => LevelFilter::Info,
        (Logging::Verbose, 1) => LevelFilter::Debug,
        (Logging::Verbose, _) => LevelFilter::Trace,
    }
}

fn init_logging(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(log_level(cli.provisional_logging(), cli.verbose));

    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply_to(&mut config);
    if let Some(level) = cli.configured_level(&config)
        && std::env::var_os(env_logger::DEFAULT_FILTER_ENV).is_none()
    {
        log::set_max_level(level);
    }

    deminify_file(&cli.input, &config)?;
    Ok(())
}

//! `timetabler` command-line front end.

mod error;
mod report;
mod view;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;

use timetabler::{GeneratorConfig, TermDomain, TermSpec, ThreadCount, TimetableGenerator};

use crate::error::CliError;
use crate::report::JsonReport;
use crate::view::View;

#[derive(Parser)]
#[command(name = "timetabler")]
#[command(about = "Generate clash-free institutional timetables")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a timetable for a term file
    Generate(GenerateArgs),

    /// Validate a term file and print its statistics
    Stats {
        /// Term specification (JSON)
        term: PathBuf,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Configuration file (TOML or YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Term specification (JSON)
    term: PathBuf,

    /// Configuration file (TOML or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Independent restarts
    #[arg(long)]
    restarts: Option<usize>,

    /// Worker threads for restarts (0 runs them one after another)
    #[arg(long)]
    threads: Option<usize>,

    /// Node limit per restart
    #[arg(long)]
    nodes: Option<u64>,

    /// Wall-clock limit for the whole run
    #[arg(long)]
    seconds: Option<u64>,

    /// Print only this timetable, e.g. `faculty:ada` or `batch:cse-1`
    #[arg(long)]
    view: Option<View>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Write the output here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip the live progress console
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {}", "error:".bright_red().bold(), err);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    match cli.command {
        Commands::Generate(args) => generate(args),
        Commands::Stats { term } => {
            let domain = load_term(&term)?;
            print!("{}", report::stats(domain.name(), &domain.stats()));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config { config } => {
            let config = load_config(config.as_deref())?;
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn generate(args: GenerateArgs) -> Result<ExitCode, CliError> {
    let domain = load_term(&args.term)?;
    let config = apply_overrides(load_config(args.config.as_deref())?, &args);
    let generator = TimetableGenerator::new(config)?;

    let json_on_stdout = args.format == Format::Json && args.output.is_none();
    if !args.quiet && !json_on_stdout {
        timetabler::console::init();
    }

    let result = generator.generate(&domain);
    let entries = match &args.view {
        Some(view) => view.entries(&domain, &result.schedule)?,
        None => result.entries(&domain),
    };

    let text = match args.format {
        Format::Json => serde_json::to_string_pretty(&JsonReport {
            result: &result,
            entries: &entries,
        })?,
        Format::Table => format!(
            "{}\n{}",
            report::summary(&result),
            report::timetable(&entries)
        ),
    };
    match &args.output {
        Some(path) => fs::write(path, text)?,
        None => println!("{}", text),
    }

    Ok(if result.is_complete() && result.is_feasible() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn load_term(path: &Path) -> Result<TermDomain, CliError> {
    Ok(TermSpec::from_json_file(path)?.into_domain()?)
}

/// The given file, else `timetabler.toml` if present, else defaults.
fn load_config(path: Option<&Path>) -> Result<GeneratorConfig, CliError> {
    let default = Path::new("timetabler.toml");
    let config = match path {
        Some(path) => GeneratorConfig::from_file(path)?,
        None if default.exists() => GeneratorConfig::from_file(default)?,
        None => GeneratorConfig::default(),
    };
    Ok(config)
}

fn apply_overrides(mut config: GeneratorConfig, args: &GenerateArgs) -> GeneratorConfig {
    if let Some(seed) = args.seed {
        config = config.with_random_seed(seed);
    }
    if let Some(restarts) = args.restarts {
        config = config.with_restart_count(restarts);
    }
    if let Some(threads) = args.threads {
        config = config.with_thread_count(match threads {
            0 => ThreadCount::None,
            n => ThreadCount::Count(n),
        });
    }
    if let Some(nodes) = args.nodes {
        config = config.with_node_limit(nodes);
    }
    if let Some(seconds) = args.seconds {
        config = config.with_termination_seconds(seconds);
    }
    config
}

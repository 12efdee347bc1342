use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use tfvar::collect::{self, Lookup};
use tfvar::config::{load_config, LoadedConfig, OutputFormat};
use tfvar::{FormatOptions, Literal, UnsetDescription, Variable};
use tracing::debug;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(
    name = "tfvar",
    version,
    about = "Generate variable definitions from Terraform configurations"
)]
struct Cli {
    /// Directory containing the Terraform configuration
    #[arg(value_name = "DIR", default_value = ".")]
    dir: PathBuf,

    /// Print as TF_VAR_ environment variable exports
    #[arg(short, long)]
    env_var: bool,

    /// Fill values from TF_VAR_ environment variables and auto-loaded tfvars files
    #[arg(short, long)]
    auto_assign: bool,

    /// Set a variable value (repeatable)
    #[arg(long, value_name = "NAME=VALUE")]
    var: Vec<String>,

    /// Read variable values from a tfvars file (repeatable)
    #[arg(long, value_name = "PATH")]
    var_file: Vec<PathBuf>,

    /// Read TF_VAR_ entries from a dotenv file (repeatable)
    #[arg(long, value_name = "PATH")]
    env_file: Vec<PathBuf>,

    /// Drop declared defaults before assigning values
    #[arg(long)]
    ignore_default: bool,

    /// Text written before the variables
    #[arg(long)]
    header: Option<String>,

    /// Annotate variables with their descriptions
    #[arg(long)]
    descriptions: bool,

    /// How to annotate variables without a description: blank or omit
    #[arg(long, value_name = "MODE")]
    unset_descriptions: Option<UnsetDescription>,

    /// Config file, or directory containing tfvar.json
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Print debug logs to stderr
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;
    init_logging(cli.debug);

    let config_target = cli.config.clone().unwrap_or_else(|| cli.dir.clone());
    let cfg = load_config(&config_target).context("loading configuration")?;
    if let Some(cfg) = &cfg {
        debug!(path = %cfg.path.display(), "loaded config");
    }
    let settings = Settings::resolve(&cli, cfg.as_ref());

    let mut vars = tfvar::load(&cli.dir)
        .with_context(|| format!("loading variables from {}", cli.dir.display()))?;

    if settings.ignore_default {
        for var in &mut vars {
            var.value = Literal::Null;
        }
    }

    let lookup = collect_lookup(&cli, &matches, &settings)?;
    collect::assign(&mut vars, &lookup)?;
    vars.sort_by(|a, b| a.name().cmp(b.name()));

    match &cli.out {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating output file {}", path.display()))?;
            write_output(BufWriter::new(file), &vars, &settings)?;
        }
        None => write_output(io::stdout().lock(), &vars, &settings)?,
    }

    Ok(())
}

fn init_logging(debug: bool) {
    let level = if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();
}

/// Flags merged over `tfvar.json`; flags win.
#[derive(Debug, Clone, PartialEq)]
struct Settings {
    format: OutputFormat,
    options: FormatOptions,
    auto_assign: bool,
    ignore_default: bool,
    var_files: Vec<PathBuf>,
}

impl Settings {
    fn resolve(cli: &Cli, loaded: Option<&LoadedConfig>) -> Self {
        let config = loaded.map(|l| l.config.clone()).unwrap_or_default();
        let format = if cli.env_var {
            OutputFormat::Env
        } else {
            config.format.unwrap_or_default()
        };

        Self {
            format,
            options: FormatOptions {
                header: cli.header.clone().or(config.header).unwrap_or_default(),
                include_descriptions: cli.descriptions
                    || config.include_descriptions.unwrap_or(false),
                unset_description: cli.unset_descriptions.or(config.unset_descriptions),
            },
            auto_assign: cli.auto_assign || config.auto_assign.unwrap_or(false),
            ignore_default: cli.ignore_default || config.ignore_default.unwrap_or(false),
            var_files: loaded.map(LoadedConfig::var_files).unwrap_or_default(),
        }
    }
}

#[derive(Debug, PartialEq)]
enum CommandLineSource<'a> {
    Var(&'a str),
    VarFile(&'a Path),
}

/// `--var` and `--var-file` values in the order they were given.
fn command_line_sources<'a>(matches: &ArgMatches, cli: &'a Cli) -> Vec<CommandLineSource<'a>> {
    let mut sources = Vec::new();
    if let Some(indices) = matches.indices_of("var") {
        sources.extend(
            indices
                .zip(&cli.var)
                .map(|(i, var)| (i, CommandLineSource::Var(var.as_str()))),
        );
    }
    if let Some(indices) = matches.indices_of("var_file") {
        sources.extend(
            indices
                .zip(&cli.var_file)
                .map(|(i, path)| (i, CommandLineSource::VarFile(path.as_path()))),
        );
    }
    sources.sort_by_key(|(i, _)| *i);
    sources.into_iter().map(|(_, source)| source).collect()
}

fn collect_lookup(cli: &Cli, matches: &ArgMatches, settings: &Settings) -> Result<Lookup> {
    let mut lookup = Lookup::new();

    if settings.auto_assign {
        lookup.merge(collect::collect_from_env_vars(std::env::vars()));
        lookup.merge(collect::collect_auto(&cli.dir)?);
    }
    for path in &settings.var_files {
        lookup.merge(collect::collect_from_file(path)?);
    }
    for path in &cli.env_file {
        lookup.merge(collect::collect_from_env_file(path)?);
    }
    for source in command_line_sources(matches, cli) {
        let values = match source {
            CommandLineSource::Var(assignment) => collect::collect_from_string(assignment)?,
            CommandLineSource::VarFile(path) => collect::collect_from_file(path)?,
        };
        lookup.merge(values);
    }

    debug!(values = lookup.len(), "collected variable values");
    Ok(lookup)
}

fn write_output<W: Write>(mut w: W, vars: &[Variable], settings: &Settings) -> Result<()> {
    match settings.format {
        OutputFormat::Env => tfvar::write_as_env_vars_with(&mut w, vars, &settings.options)?,
        OutputFormat::Tfvars => tfvar::write_as_tfvars_with(&mut w, vars, &settings.options)?,
    }
    w.flush().context("flushing output")?;
    Ok(())
}

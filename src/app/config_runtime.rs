use anyhow::{Result, bail};
use clap::{ArgMatches, CommandFactory, FromArgMatches, parser::ValueSource};

use crate::app_config::{FileConfig, VerbositySetting};
use crate::cli::{Args, DEFAULT_PACING_MS, MAX_PACING_MS};

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CliValueSources {
    pub(crate) pacing_ms: bool,
    pub(crate) concurrency: bool,
    pub(crate) format: bool,
    pub(crate) base_url: bool,
    pub(crate) verbose: bool,
    pub(crate) quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HttpTimeoutSettings {
    pub(crate) connect_secs: u64,
    pub(crate) read_secs: u64,
}

impl Default for HttpTimeoutSettings {
    fn default() -> Self {
        Self {
            connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            read_secs: DEFAULT_READ_TIMEOUT_SECS,
        }
    }
}

pub(crate) fn parse_cli_with_sources() -> (Args, CliValueSources) {
    let command = Args::command();
    let matches = command.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());
    let sources = collect_value_sources(&matches);
    (args, sources)
}

fn collect_value_sources(matches: &ArgMatches) -> CliValueSources {
    CliValueSources {
        pacing_ms: is_commandline_value(matches, "pacing_ms"),
        concurrency: is_commandline_value(matches, "concurrency"),
        format: is_commandline_value(matches, "format"),
        base_url: is_commandline_value(matches, "base_url"),
        verbose: is_commandline_value(matches, "verbose"),
        quiet: is_commandline_value(matches, "quiet"),
    }
}

fn is_commandline_value(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}

/// Fills values not given on the command line from the config file, then
/// re-checks the effective ranges.
pub(crate) fn apply_config_defaults(
    mut args: Args,
    cli_sources: &CliValueSources,
    file_config: Option<&FileConfig>,
) -> Result<Args> {
    if let Some(file_config) = file_config {
        if !cli_sources.pacing_ms
            && let Some(pacing_ms) = file_config.pacing_ms
        {
            args.pacing_ms = pacing_ms;
        }

        if !cli_sources.concurrency
            && let Some(concurrency) = file_config.concurrency
        {
            args.concurrency = concurrency;
        }

        if !cli_sources.format
            && let Some(format) = file_config.format
        {
            args.format = format;
        }

        if !cli_sources.base_url
            && args.base_url.is_none()
            && let Some(base_url) = &file_config.base_url
        {
            args.base_url = Some(base_url.clone());
        }

        if !cli_sources.verbose
            && !cli_sources.quiet
            && let Some(verbosity) = file_config.verbosity
        {
            apply_config_verbosity(&mut args, verbosity);
        }
    }

    if !(1..=4).contains(&args.concurrency) {
        bail!(
            "Invalid effective concurrency value: {}. Expected range: 1..=4",
            args.concurrency
        );
    }
    if !(DEFAULT_PACING_MS..=MAX_PACING_MS).contains(&args.pacing_ms) {
        bail!(
            "Invalid effective pacing_ms value: {}. Expected range: {DEFAULT_PACING_MS}..={MAX_PACING_MS}",
            args.pacing_ms
        );
    }

    Ok(args)
}

fn apply_config_verbosity(args: &mut Args, verbosity: VerbositySetting) {
    match verbosity {
        VerbositySetting::Default => {
            args.quiet = false;
            args.verbose = 0;
        }
        VerbositySetting::Verbose => {
            args.quiet = false;
            args.verbose = 1;
        }
        VerbositySetting::Quiet => {
            args.quiet = true;
            args.verbose = 0;
        }
        VerbositySetting::Debug => {
            args.quiet = false;
            args.verbose = 2;
        }
    }
}

pub(crate) fn resolve_http_timeouts(file_config: Option<&FileConfig>) -> HttpTimeoutSettings {
    let mut settings = HttpTimeoutSettings::default();
    let Some(file_config) = file_config else {
        return settings;
    };

    if let Some(value) = file_config.connect_timeout_secs {
        settings.connect_secs = value;
    }
    if let Some(value) = file_config.read_timeout_secs {
        settings.read_secs = value;
    }
    settings
}

pub(crate) fn resolve_default_log_level(args: &Args) -> &'static str {
    if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

pub(crate) fn should_force_cli_log_level(cli_sources: &CliValueSources) -> bool {
    cli_sources.verbose || cli_sources.quiet
}

//! Optional config file supplying defaults for CLI flags.
//!
//! The file lives at `$XDG_CONFIG_HOME/chemly/config.toml` (or
//! `$HOME/.config/chemly/config.toml`) and holds flat `key = value` lines:
//!
//! ```text
//! pacing_ms = 2000
//! concurrency = 2
//! format = "json"            # tsv | json
//! base_url = "https://pubchem.ncbi.nlm.nih.gov/rest/pug"
//! verbosity = "quiet"        # default | verbose | quiet | debug
//! connect_timeout_secs = 10
//! read_timeout_secs = 30
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use chemly_core::{DEFAULT_PACING_INTERVAL, MAX_CONCURRENCY, MIN_CONCURRENCY};

use crate::cli::{MAX_PACING_MS, OutputFormat};

const TIMEOUT_RANGE_SECS: std::ops::RangeInclusive<u64> = 1..=3600;

/// Values read from the config file; `None` leaves the CLI default in place.
#[derive(Debug, Clone, Default)]
pub struct FileConfig {
    pub pacing_ms: Option<u64>,
    pub concurrency: Option<u8>,
    pub format: Option<OutputFormat>,
    pub base_url: Option<String>,
    pub verbosity: Option<VerbositySetting>,
    /// Gateway connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// Gateway whole-request timeout in seconds.
    pub read_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Applies the same range checks the CLI enforces on its flags.
    ///
    /// # Errors
    ///
    /// Names the first offending key and its accepted range.
    pub fn validate(&self) -> Result<()> {
        if let Some(concurrency) = self.concurrency {
            let workers = usize::from(concurrency);
            if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&workers) {
                bail!(
                    "Invalid config value for `concurrency`: {concurrency}. Expected {MIN_CONCURRENCY}..={MAX_CONCURRENCY}"
                );
            }
        }

        let pacing_floor = pacing_floor_ms();
        if let Some(pacing_ms) = self.pacing_ms
            && !(pacing_floor..=MAX_PACING_MS).contains(&pacing_ms)
        {
            bail!(
                "Invalid config value for `pacing_ms`: {pacing_ms}. Expected {pacing_floor}..={MAX_PACING_MS}"
            );
        }

        if let Some(base_url) = self.base_url.as_deref()
            && !["http://", "https://"]
                .iter()
                .any(|scheme| base_url.starts_with(scheme))
        {
            bail!("Invalid config value for `base_url`: '{base_url}'. Expected an http(s) URL");
        }

        for (key, value) in [
            ("connect_timeout_secs", self.connect_timeout_secs),
            ("read_timeout_secs", self.read_timeout_secs),
        ] {
            if let Some(secs) = value
                && !TIMEOUT_RANGE_SECS.contains(&secs)
            {
                bail!(
                    "Invalid config value for `{key}`: {secs}. Expected {}..={}",
                    TIMEOUT_RANGE_SECS.start(),
                    TIMEOUT_RANGE_SECS.end()
                );
            }
        }

        Ok(())
    }
}

fn pacing_floor_ms() -> u64 {
    u64::try_from(DEFAULT_PACING_INTERVAL.as_millis()).unwrap_or(u64::MAX)
}

/// `verbosity` labels accepted in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl FromStr for VerbositySetting {
    type Err = anyhow::Error;

    fn from_str(label: &str) -> Result<Self> {
        Ok(match label {
            "default" => Self::Default,
            "verbose" => Self::Verbose,
            "quiet" => Self::Quiet,
            "debug" => Self::Debug,
            _ => bail!("Expected one of: default, verbose, quiet, debug"),
        })
    }
}

/// Where the config file was looked for, and what it held.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// `None` when neither `XDG_CONFIG_HOME` nor `HOME` is set.
    pub path: Option<PathBuf>,
    /// `None` when no file exists at `path`.
    pub config: Option<FileConfig>,
}

/// `$XDG_CONFIG_HOME/chemly/config.toml`, else `$HOME/.config/chemly/config.toml`.
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    let non_empty = |name: &str| env::var_os(name).filter(|value| !value.is_empty());
    let config_home = non_empty("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| non_empty("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(config_home.join("chemly").join("config.toml"))
}

/// Reads the default config file when one exists.
///
/// # Errors
///
/// Fails when the file exists but cannot be read, parsed, or validated.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let config = path
        .as_deref()
        .filter(|candidate| candidate.is_file())
        .map(load_file_config)
        .transpose()?;
    Ok(LoadedConfig { path, config })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_number, raw_line) in (1..).zip(raw.lines()) {
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_number}: expected key = value");
        };
        let (key, value) = (key.trim(), value.trim());
        let invalid = || format!("Invalid `{key}` value on line {line_number}");

        match key {
            "pacing_ms" => cfg.pacing_ms = Some(parse_unsigned(value).with_context(invalid)?),
            "concurrency" => cfg.concurrency = Some(parse_unsigned(value).with_context(invalid)?),
            "format" => {
                let label = quoted(value).with_context(invalid)?;
                cfg.format = Some(parse_format(label).with_context(invalid)?);
            }
            "base_url" => cfg.base_url = Some(quoted(value).with_context(invalid)?.to_string()),
            "verbosity" => {
                let label = quoted(value).with_context(invalid)?;
                cfg.verbosity = Some(label.parse().with_context(invalid)?);
            }
            "connect_timeout_secs" => {
                cfg.connect_timeout_secs = Some(parse_unsigned(value).with_context(invalid)?);
            }
            "read_timeout_secs" => {
                cfg.read_timeout_secs = Some(parse_unsigned(value).with_context(invalid)?);
            }
            unknown => bail!("Unknown configuration key: '{unknown}' on line {line_number}"),
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Cuts a `#` comment, ignoring `#` inside double quotes.
fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    let cut = line.char_indices().find(|&(_, ch)| {
        if ch == '"' {
            in_string = !in_string;
        }
        ch == '#' && !in_string
    });
    cut.map_or(line, |(index, _)| &line[..index])
}

fn quoted(value: &str) -> Result<&str> {
    value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| anyhow!("Expected double-quoted string"))
}

fn parse_unsigned<T: TryFrom<u64>>(value: &str) -> Result<T> {
    let parsed: u64 = value
        .parse()
        .with_context(|| format!("Expected a non-negative integer, got '{value}'"))?;
    T::try_from(parsed).map_err(|_| anyhow!("Integer {parsed} is out of range"))
}

fn parse_format(label: &str) -> Result<OutputFormat> {
    match label {
        "tsv" => Ok(OutputFormat::Tsv),
        "json" => Ok(OutputFormat::Json),
        _ => bail!("Expected one of: tsv, json"),
    }
}

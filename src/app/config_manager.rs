//! Configuration lifecycle: load file config, merge CLI, resolve and apply timeouts.

use anyhow::Result;
use chemly_core::configure_gateway_http_timeouts;
use tracing::debug;

use crate::app::config_runtime::{self, CliValueSources, HttpTimeoutSettings};
use crate::app_config::load_default_file_config;
use crate::cli::Args;

/// Effective settings for one run.
pub(crate) struct ResolvedConfig {
    pub(crate) args: Args,
    pub(crate) http_timeouts: HttpTimeoutSettings,
    pub(crate) loaded_from_file: bool,
}

/// Loads the config file, merges CLI overrides, and applies gateway timeouts.
pub(crate) fn resolve_config(args: Args, cli_sources: &CliValueSources) -> Result<ResolvedConfig> {
    let loaded_config = load_default_file_config()?;
    if let Some(path) = &loaded_config.path {
        debug!(path = %path.display(), found = loaded_config.config.is_some(), "config file location");
    }
    let args =
        config_runtime::apply_config_defaults(args, cli_sources, loaded_config.config.as_ref())?;
    let http_timeouts = config_runtime::resolve_http_timeouts(loaded_config.config.as_ref());
    configure_gateway_http_timeouts(http_timeouts.connect_secs, http_timeouts.read_secs);
    Ok(ResolvedConfig {
        args,
        http_timeouts,
        loaded_from_file: loaded_config.config.is_some(),
    })
}

//! HTTP client construction shared by all gateways.
//!
//! Timeouts are process-wide: the CLI sets them once from configuration before
//! any gateway is built.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::RwLock;
use std::time::Duration;

use reqwest::{Client, ClientBuilder, Proxy};
use tracing::{debug, warn};

use crate::user_agent::default_gateway_user_agent;

use super::LookupError;

/// Connect and whole-request timeouts, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HttpTimeouts {
    connect_secs: u64,
    read_secs: u64,
}

const DEFAULT_TIMEOUTS: HttpTimeouts = HttpTimeouts {
    connect_secs: 10,
    read_secs: 30,
};

static TIMEOUTS: RwLock<HttpTimeouts> = RwLock::new(DEFAULT_TIMEOUTS);

const HTTPS_PROXY_VARS: [&str; 4] = ["HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"];
const HTTP_PROXY_VARS: [&str; 4] = ["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"];

/// Sets the timeouts applied to gateway clients built after this call.
pub fn configure_gateway_http_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) {
    if let Ok(mut timeouts) = TIMEOUTS.write() {
        *timeouts = HttpTimeouts {
            connect_secs: connect_timeout_secs,
            read_secs: read_timeout_secs,
        };
    }
}

fn current_timeouts() -> HttpTimeouts {
    TIMEOUTS.read().map_or(DEFAULT_TIMEOUTS, |timeouts| *timeouts)
}

/// Builds the reqwest client for `gateway_name`.
///
/// Reading system proxy settings panics in some sandboxes; in that case the
/// client is rebuilt with proxies taken only from the environment.
///
/// # Errors
///
/// Returns [`LookupError::ClientBuild`] when neither attempt yields a client.
pub(crate) fn build_gateway_http_client(gateway_name: &str) -> Result<Client, LookupError> {
    let timeouts = current_timeouts();
    debug!(
        gateway = gateway_name,
        connect_secs = timeouts.connect_secs,
        read_secs = timeouts.read_secs,
        "building gateway HTTP client"
    );

    let attempt = |env_proxies_only: bool| {
        catch_unwind(AssertUnwindSafe(|| {
            let builder = client_builder(timeouts);
            let builder = if env_proxies_only {
                with_env_proxies(builder.no_proxy())
            } else {
                builder
            };
            builder.build()
        }))
    };

    let built = match attempt(false) {
        Ok(result) => result,
        Err(_) => {
            warn!(
                gateway = gateway_name,
                "system proxy lookup panicked; retrying with environment proxies only"
            );
            attempt(true).map_err(|_| {
                LookupError::client_build(gateway_name, "networking initialization panicked")
            })?
        }
    };
    built.map_err(|e| LookupError::client_build(gateway_name, &e.to_string()))
}

fn client_builder(timeouts: HttpTimeouts) -> ClientBuilder {
    Client::builder()
        .connect_timeout(Duration::from_secs(timeouts.connect_secs))
        .timeout(Duration::from_secs(timeouts.read_secs))
        .user_agent(default_gateway_user_agent())
        .gzip(true)
}

fn with_env_proxies(mut builder: ClientBuilder) -> ClientBuilder {
    if let Some(proxy) = first_env_value(&HTTPS_PROXY_VARS).and_then(|url| Proxy::https(url).ok()) {
        builder = builder.proxy(proxy);
    }
    if let Some(proxy) = first_env_value(&HTTP_PROXY_VARS).and_then(|url| Proxy::http(url).ok()) {
        builder = builder.proxy(proxy);
    }
    builder
}

fn first_env_value(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_gateway_http_client_with_defaults() {
        assert!(build_gateway_http_client("pubchem").is_ok());
    }

    #[test]
    fn test_default_timeouts() {
        assert_eq!(DEFAULT_TIMEOUTS.connect_secs, 10);
        assert_eq!(DEFAULT_TIMEOUTS.read_secs, 30);
    }

    #[test]
    fn test_with_env_proxies_without_variables_still_builds() {
        let builder = with_env_proxies(client_builder(DEFAULT_TIMEOUTS).no_proxy());
        assert!(builder.build().is_ok());
    }
}

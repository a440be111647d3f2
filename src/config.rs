use std::net::SocketAddr;
use std::str::FromStr;

use anyhow::{anyhow, Context};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:13370";
pub const DEFAULT_AUTH_HEADER: &str = "X-I-Am-Silly";
pub const DEFAULT_AUTH_VALUE: &str = "Yes I am";
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// How POST outcomes are reported to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseMode {
    /// Every POST answers 200 with no body; failures only reach the log.
    #[default]
    Legacy,
    /// 204 on success, 401 on bad auth, 400 on bad upload, 405 on other methods.
    Strict,
}

impl FromStr for ResponseMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "strict" => Ok(Self::Strict),
            other => Err(anyhow!("unknown response mode `{other}` (expected legacy or strict)")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub auth_header: String,
    pub auth_value: String,
    pub response_mode: ResponseMode,
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 13370)),
            auth_header: DEFAULT_AUTH_HEADER.to_string(),
            auth_value: DEFAULT_AUTH_VALUE.to_string(),
            response_mode: ResponseMode::Legacy,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl Config {
    /// Defaults with `LOTSTATUS_*` overrides. With nothing set this is [`Config::default`].
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup("LOTSTATUS_BIND_ADDR") {
            config.bind_addr = raw
                .parse::<SocketAddr>()
                .with_context(|| format!("LOTSTATUS_BIND_ADDR `{raw}` is not a socket address"))?;
        }
        if let Some(raw) = lookup("LOTSTATUS_AUTH_HEADER") {
            axum::http::HeaderName::from_bytes(raw.as_bytes())
                .with_context(|| format!("LOTSTATUS_AUTH_HEADER `{raw}` is not a header name"))?;
            config.auth_header = raw;
        }
        if let Some(raw) = lookup("LOTSTATUS_AUTH_VALUE") {
            config.auth_value = raw;
        }
        if let Some(raw) = lookup("LOTSTATUS_RESPONSE_MODE") {
            config.response_mode = raw.parse::<ResponseMode>().context("LOTSTATUS_RESPONSE_MODE")?;
        }
        if let Some(raw) = lookup("LOTSTATUS_MAX_BODY_BYTES") {
            config.max_body_bytes = raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| anyhow!("LOTSTATUS_MAX_BODY_BYTES `{raw}` must be a positive integer"))?;
        }

        Ok(config)
    }
}

use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
};

use anyhow::bail;
use secrecy::{ExposeSecret, Secret};

pub const CREDENTIAL_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_UPSTREAM_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-5";
pub const DEFAULT_ROUTE: &str = "/api/nova";
pub const DEFAULT_KEY_PREFIX: &str = "sk-";
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are Nova, the planet's consciousness in Parallel Planet. \
     Speak in-world, vivid, friendly, ≤120 words. Decline harmful content.";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub route: String,
    pub upstream_base: String,
    pub relay: RelayConfig,
}

/// Everything the relay handler needs, injected at construction time.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub credential: Option<Secret<String>>,
    pub model: String,
    pub system_instruction: String,
    pub key_prefix: String,
}

impl RelayConfig {
    pub fn new(credential: Option<String>) -> Self {
        Self {
            credential: credential.and_then(non_empty_secret),
            model: DEFAULT_MODEL.to_string(),
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }

    /// Credential is present and carries the provider's expected prefix.
    pub fn has_well_formed_key(&self) -> bool {
        self.credential
            .as_ref()
            .is_some_and(|key| key.expose_secret().starts_with(&self.key_prefix))
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let listen_addr = env::var("SERVER_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".into())
            .parse()
            .unwrap_or_else(|_| SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8080));

        let route = env::var("RELAY_ROUTE").unwrap_or_else(|_| DEFAULT_ROUTE.to_string());
        if !route.starts_with('/') {
            bail!("RELAY_ROUTE must start with '/', got {route:?}");
        }
        if route == "/health" {
            bail!("RELAY_ROUTE must not shadow the /health liveness route");
        }

        let upstream_base = env::var("OPENAI_API_BASE")
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_UPSTREAM_BASE.to_string());

        let relay = RelayConfig {
            credential: env::var(CREDENTIAL_ENV).ok().and_then(non_empty_secret),
            model: env::var("RELAY_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            system_instruction: env::var("RELAY_SYSTEM_INSTRUCTION")
                .unwrap_or_else(|_| DEFAULT_SYSTEM_INSTRUCTION.to_string()),
            key_prefix: env::var("RELAY_KEY_PREFIX")
                .unwrap_or_else(|_| DEFAULT_KEY_PREFIX.to_string()),
        };

        Ok(Self {
            listen_addr,
            route,
            upstream_base,
            relay,
        })
    }
}

fn non_empty_secret(raw: String) -> Option<Secret<String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(Secret::new(trimmed.to_string()))
    }
}

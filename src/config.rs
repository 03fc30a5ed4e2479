use crate::error::{KanbanError, Result};
use std::time::Duration;

const DEFAULT_SUBDOMAIN: &str = "localhost";
const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_SIGN_IN_PATH: &str = "/signin";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const LOCAL_BACKEND: &str = "http://localhost:1337/v1";

/// Connection settings for the hosted board service
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub subdomain: String,
    pub region: String,
    /// Overrides the GraphQL endpoint derived from subdomain and region
    pub graphql_url: Option<String>,
    /// Overrides the auth endpoint derived from subdomain and region
    pub auth_url: Option<String>,
    /// Where unauthenticated users are sent to sign in
    pub sign_in_path: String,
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Reads settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, falling back to defaults for unset keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let request_timeout = match non_empty("KANBAN_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| {
                    KanbanError::ConfigError(format!(
                        "KANBAN_REQUEST_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                        raw
                    ))
                })?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            subdomain: non_empty("NHOST_SUBDOMAIN").unwrap_or_else(|| DEFAULT_SUBDOMAIN.into()),
            region: non_empty("NHOST_REGION").unwrap_or_else(|| DEFAULT_REGION.into()),
            graphql_url: non_empty("NHOST_GRAPHQL_URL"),
            auth_url: non_empty("NHOST_AUTH_URL"),
            sign_in_path: non_empty("KANBAN_SIGN_IN_PATH")
                .unwrap_or_else(|| DEFAULT_SIGN_IN_PATH.into()),
            request_timeout,
        })
    }

    /// GraphQL endpoint requests are posted to
    pub fn graphql_endpoint(&self) -> String {
        self.graphql_url
            .clone()
            .unwrap_or_else(|| self.service_url("graphql"))
    }

    /// Auth service endpoint
    pub fn auth_endpoint(&self) -> String {
        self.auth_url
            .clone()
            .unwrap_or_else(|| self.service_url("auth"))
    }

    fn service_url(&self, service: &str) -> String {
        if self.subdomain == DEFAULT_SUBDOMAIN {
            format!("{}/{}", LOCAL_BACKEND, service)
        } else {
            format!(
                "https://{}.{}.{}.nhost.run/v1",
                self.subdomain, service, self.region
            )
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            subdomain: DEFAULT_SUBDOMAIN.into(),
            region: DEFAULT_REGION.into(),
            graphql_url: None,
            auth_url: None,
            sign_in_path: DEFAULT_SIGN_IN_PATH.into(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

//! Session configuration and the two-source resolver.
//!
//! A [`GatewayConfig`] is supplied once per logical session and is read-only
//! to the core. It can come from two places: ambient configuration owned by a
//! surrounding application context, or explicit options passed at client
//! construction. [`resolve_config`] encodes the precedence between the two.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Production endpoint used when no override is configured.
pub const DEFAULT_ENDPOINT: &str = "https://api.textgate.dev/v1/generate";

/// Opaque tenant descriptor forwarded to the gateway.
///
/// Serializes to `{}` when no fields are set; the gateway then treats the
/// project id itself as the tenant key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Customer {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            name: Some(name.into()),
        }
    }
}

/// Immutable per-session configuration bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Project identifier; required for a meaningful call.
    pub project_id: String,
    /// Optional tenant descriptor.
    #[serde(default)]
    pub customer: Option<Customer>,
    /// Tool list forwarded verbatim in the payload.
    #[serde(default)]
    pub tools: Vec<serde_json::Value>,
    /// Agent identifier; explicitly nullable on the wire.
    #[serde(default)]
    pub agent_id: Option<String>,
    /// Default conversation identifier; a per-call value takes precedence.
    #[serde(default)]
    pub conversation_id: Option<String>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl GatewayConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            endpoint: default_endpoint(),
            project_id: project_id.into(),
            customer: None,
            tools: Vec::new(),
            agent_id: None,
            conversation_id: None,
        }
    }
}

/// Resolve the session configuration from its two possible sources.
///
/// Ambient configuration wins when both are present. Having neither is a
/// fatal configuration error, raised at construction and never retried.
pub fn resolve_config(
    ambient: Option<GatewayConfig>,
    explicit: Option<GatewayConfig>,
) -> Result<GatewayConfig> {
    ambient.or(explicit).ok_or_else(|| {
        Error::configuration("no ambient configuration and no explicit options supplied")
    })
}

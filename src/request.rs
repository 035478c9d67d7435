//! Wire payload for the generation request.
//!
//! Key set and nullability follow the gateway contract: `serviceId` and
//! `agentId` are always present and explicitly nullable (null delegates
//! routing to the server); `conversationId` and `tools` are omitted entirely
//! when not configured; `customer` falls back to an empty object so the
//! gateway keys the tenant off the project id.

use crate::client::SendOptions;
use crate::config::{Customer, GatewayConfig};
use crate::types::{DataItem, Message};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamRequest {
    pub project_id: String,
    pub service_id: Option<String>,
    pub agent_id: Option<String>,
    pub prompt: String,
    pub messages: Vec<Message>,
    pub data: Vec<DataItem>,
    pub customer: Customer,
    pub allow_caching: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<serde_json::Value>,
}

impl StreamRequest {
    /// Merge per-call options with the session configuration.
    ///
    /// The per-call conversation id wins over the configured default.
    pub fn from_parts(config: &GatewayConfig, options: &SendOptions) -> Self {
        Self {
            project_id: config.project_id.clone(),
            service_id: options.service.clone(),
            agent_id: config.agent_id.clone(),
            prompt: options.prompt.clone(),
            messages: options.messages.clone(),
            data: options.data.clone(),
            customer: config.customer.clone().unwrap_or_default(),
            allow_caching: options.allow_caching,
            conversation_id: options
                .conversation
                .clone()
                .or_else(|| config.conversation_id.clone()),
            tools: config.tools.clone(),
        }
    }
}

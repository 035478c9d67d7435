use crate::client::core::GatewayClient;
use crate::config::{Customer, GatewayConfig, DEFAULT_ENDPOINT};
use crate::{Error, Result};

/// Builder for creating clients with explicit configuration.
///
/// Keep this surface area small and predictable (developer-friendly).
/// Applications holding ambient configuration should prefer
/// [`GatewayClient::from_sources`].
#[derive(Debug, Default)]
pub struct GatewayClientBuilder {
    endpoint: Option<String>,
    project_id: Option<String>,
    customer: Option<Customer>,
    tools: Vec<serde_json::Value>,
    agent_id: Option<String>,
    conversation_id: Option<String>,
}

impl GatewayClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the gateway endpoint (primarily for testing with mock servers).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the project identifier. Required.
    pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Attach an opaque tenant descriptor.
    pub fn customer(mut self, customer: Customer) -> Self {
        self.customer = Some(customer);
        self
    }

    /// Set the tool list forwarded with every call.
    pub fn tools(mut self, tools: Vec<serde_json::Value>) -> Self {
        self.tools = tools;
        self
    }

    /// Set the agent identifier.
    pub fn agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    /// Set a default conversation identifier for calls that pass none.
    pub fn conversation_id(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }

    pub fn build(self) -> Result<GatewayClient> {
        let project_id = self
            .project_id
            .ok_or_else(|| Error::configuration("project id is required"))?;

        GatewayClient::new(GatewayConfig {
            endpoint: self.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            project_id,
            customer: self.customer,
            tools: self.tools,
            agent_id: self.agent_id,
            conversation_id: self.conversation_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_id_is_required() {
        let err = GatewayClientBuilder::new().build().unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn invalid_endpoint_is_rejected_at_build_time() {
        let err = GatewayClientBuilder::new()
            .project_id("p1")
            .endpoint("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn defaults_to_the_production_endpoint() {
        let client = GatewayClientBuilder::new().project_id("p1").build().unwrap();
        assert_eq!(client.config().endpoint, DEFAULT_ENDPOINT);
    }
}

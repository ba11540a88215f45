use std::sync::Arc;

use {
    chainchat_agents::AgentClient,
    chainchat_channels::MessagingClient,
    chainchat_common::types::AgentIdentity,
    chainchat_config::{ChainchatConfig, RepliesConfig},
    chainchat_wallet::Normalizer,
    tokio_util::sync::CancellationToken,
};

/// Everything one bridge process needs, built once at startup and shared by
/// reference with the supervisor and the pipeline.
pub struct BridgeContext {
    pub client: Arc<dyn MessagingClient>,
    pub agent: Arc<dyn AgentClient>,
    pub identity: AgentIdentity,
    pub replies: RepliesConfig,
    pub agent_id: String,
    pub system_prompt: Option<String>,
    pub normalizer: Normalizer,
    /// Process shutdown signal. Once cancelled, nothing more is sent.
    pub cancel: CancellationToken,
}

impl BridgeContext {
    pub fn new(
        config: &ChainchatConfig,
        client: Arc<dyn MessagingClient>,
        agent: Arc<dyn AgentClient>,
    ) -> Self {
        Self {
            client,
            agent,
            identity: config.identity.clone(),
            replies: config.replies.clone(),
            agent_id: config.agent.agent_id.clone(),
            system_prompt: config.agent.system_prompt.clone(),
            normalizer: Normalizer::new(
                config.batch.schema_version.clone(),
                config.batch.value_decimals,
            ),
            cancel: CancellationToken::new(),
        }
    }

    /// Share an existing shutdown token, e.g. one a transport also holds.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

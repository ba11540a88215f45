use std::time::Duration;

use {
    async_trait::async_trait,
    chainchat_config::{AgentConfig, ResponseFormat},
    secrecy::{ExposeSecret, Secret},
    tracing::{debug, trace, warn},
};

use crate::{
    data_stream,
    error::{Error, Result},
    model::{AgentRequest, AgentResponse},
};

/// Request/response access to the hosted agent.
#[async_trait]
pub trait AgentClient: Send + Sync {
    async fn ask(&self, request: &AgentRequest) -> Result<AgentResponse>;
}

/// [`AgentClient`] over HTTP POST.
pub struct HttpAgentClient {
    endpoint: String,
    api_key: Option<Secret<String>>,
    format: ResponseFormat,
    client: reqwest::Client,
}

impl HttpAgentClient {
    pub fn new(config: &AgentConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            format: config.response_format,
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl AgentClient for HttpAgentClient {
    async fn ask(&self, request: &AgentRequest) -> Result<AgentResponse> {
        debug!(
            endpoint = %self.endpoint,
            conversation_id = %request.conversation_id,
            agent_id = %request.agent_id,
            "agent request"
        );

        let mut http = self.client.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            http = http.header("Authorization", format!("Bearer {}", key.expose_secret()));
        }
        let http_resp = http.send().await?;

        let status = http_resp.status();
        if !status.is_success() {
            let body = http_resp.text().await.unwrap_or_default();
            warn!(status = %status, endpoint = %self.endpoint, body = %body, "agent API error");
            return Err(Error::AgentCallFailed {
                status: status.as_u16(),
                body,
            });
        }

        let response = match self.format {
            ResponseFormat::Json => {
                let body = http_resp.json::<serde_json::Value>().await?;
                trace!(response = %body, "agent raw response");
                AgentResponse::from_json(&body)?
            },
            ResponseFormat::DataStream => {
                let body = http_resp.text().await?;
                trace!(response = %body, "agent raw data stream");
                data_stream::decode(&body)?
            },
        };

        debug!(
            conversation_id = %request.conversation_id,
            text_len = response.text.len(),
            tool_calls = response.tool_calls.len(),
            "agent response"
        );
        Ok(response)
    }
}

//! In-memory fakes for the network and the agent.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use {
    async_trait::async_trait,
    chainchat_agents::{AgentClient, AgentRequest, AgentResponse},
    chainchat_channels::{
        ConversationInfo, EventContent, EventStream, InboundEvent, MessagingClient,
        OutboundContent, StoredMessage, error::Error as ChannelError,
    },
    chainchat_common::types::{AgentIdentity, ConversationKind},
    chainchat_config::ChainchatConfig,
    futures::stream,
};

use crate::context::BridgeContext;

pub const AGENT_INBOX: &str = "agent-inbox";

static EVENT_SEQ: AtomicUsize = AtomicUsize::new(0);

pub fn identity() -> AgentIdentity {
    AgentIdentity {
        address: "0xa9e1000000000000000000000000000000000001".into(),
        inbox_id: AGENT_INBOX.into(),
        short_name: "@agent".into(),
        extra_handles: vec![],
    }
}

pub fn text_event(conversation_id: &str, sender: &str, text: &str) -> InboundEvent {
    InboundEvent {
        id: format!("evt-{}", EVENT_SEQ.fetch_add(1, Ordering::Relaxed)),
        conversation_id: conversation_id.into(),
        sender_inbox_id: sender.into(),
        sent_at_ns: None,
        content: EventContent::Text(text.into()),
    }
}

pub fn reply_event(conversation_id: &str, sender: &str, reference: &str, text: &str) -> InboundEvent {
    InboundEvent {
        content: EventContent::Reply {
            reference: reference.into(),
            text: text.into(),
        },
        ..text_event(conversation_id, sender, "")
    }
}

pub fn bridge(network: &FakeNetwork, agent: &ScriptedAgent) -> BridgeContext {
    let config = ChainchatConfig {
        identity: identity(),
        ..Default::default()
    };
    BridgeContext::new(&config, Arc::new(network.clone()), Arc::new(agent.clone()))
}

/// One scripted subscription attempt.
pub enum Connection {
    Refused,
    /// Yields these items, then the stream closes.
    Events(Vec<Result<InboundEvent, ChannelError>>),
}

#[derive(Default)]
struct NetworkState {
    conversations: Mutex<HashMap<String, (ConversationKind, Vec<String>)>>,
    history: Mutex<Vec<StoredMessage>>,
    addresses: Mutex<HashMap<String, String>>,
    sent: Mutex<Vec<(String, OutboundContent)>>,
    connections: Mutex<VecDeque<Connection>>,
    fail_sends: AtomicBool,
    connects: AtomicUsize,
    syncs: AtomicUsize,
}

#[derive(Clone, Default)]
pub struct FakeNetwork {
    state: Arc<NetworkState>,
}

impl FakeNetwork {
    pub fn new() -> Self {
        let network = Self::default();
        network
            .state
            .addresses
            .lock()
            .unwrap()
            .insert("alice".into(), "0xa11ce".into());
        network
    }

    pub fn with_direct(self, id: &str, peer: &str) -> Self {
        self.state.conversations.lock().unwrap().insert(
            id.into(),
            (ConversationKind::Direct, vec![peer.into(), AGENT_INBOX.into()]),
        );
        self
    }

    pub fn with_group(self, id: &str, members: &[&str]) -> Self {
        let mut members: Vec<String> = members.iter().map(|m| m.to_string()).collect();
        members.push(AGENT_INBOX.into());
        self.state
            .conversations
            .lock()
            .unwrap()
            .insert(id.into(), (ConversationKind::Group, members));
        self
    }

    /// Pretend the agent already posted in `conversation_id` as message `old`.
    pub fn with_agent_history(self, conversation_id: &str) -> Self {
        self.with_message(conversation_id, "old", AGENT_INBOX)
    }

    pub fn with_message(self, conversation_id: &str, id: &str, sender: &str) -> Self {
        self.state.history.lock().unwrap().push(StoredMessage {
            id: id.into(),
            conversation_id: conversation_id.into(),
            sender_inbox_id: sender.into(),
        });
        self
    }

    pub fn failing_sends(self) -> Self {
        self.state.fail_sends.store(true, Ordering::SeqCst);
        self
    }

    pub fn script(self, connections: impl IntoIterator<Item = Connection>) -> Self {
        self.state.connections.lock().unwrap().extend(connections);
        self
    }

    pub fn sent(&self) -> Vec<(String, OutboundContent)> {
        self.state.sent.lock().unwrap().clone()
    }

    pub fn connects(&self) -> usize {
        self.state.connects.load(Ordering::SeqCst)
    }

    pub fn syncs(&self) -> usize {
        self.state.syncs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessagingClient for FakeNetwork {
    async fn sync_all(&self) -> chainchat_channels::Result<()> {
        self.state.syncs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn stream_all_messages(&self) -> chainchat_channels::Result<EventStream> {
        self.state.connects.fetch_add(1, Ordering::SeqCst);
        match self.state.connections.lock().unwrap().pop_front() {
            Some(Connection::Events(items)) => Ok(Box::pin(stream::iter(items))),
            Some(Connection::Refused) | None => Err(ChannelError::unavailable("connection refused")),
        }
    }

    async fn conversation(&self, conversation_id: &str) -> chainchat_channels::Result<ConversationInfo> {
        let conversations = self.state.conversations.lock().unwrap();
        let (kind, _) = conversations
            .get(conversation_id)
            .ok_or_else(|| ChannelError::unknown_conversation(conversation_id))?;
        Ok(ConversationInfo {
            id: conversation_id.into(),
            kind: *kind,
        })
    }

    async fn members(&self, conversation_id: &str) -> chainchat_channels::Result<Vec<String>> {
        let conversations = self.state.conversations.lock().unwrap();
        Ok(conversations
            .get(conversation_id)
            .map(|(_, members)| members.clone())
            .unwrap_or_default())
    }

    async fn messages(&self, conversation_id: &str) -> chainchat_channels::Result<Vec<StoredMessage>> {
        let history = self.state.history.lock().unwrap();
        Ok(history
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect())
    }

    async fn message(&self, message_id: &str) -> chainchat_channels::Result<Option<StoredMessage>> {
        let history = self.state.history.lock().unwrap();
        Ok(history.iter().find(|m| m.id == message_id).cloned())
    }

    async fn inbox_address(&self, inbox_id: &str) -> chainchat_channels::Result<Option<String>> {
        Ok(self.state.addresses.lock().unwrap().get(inbox_id).cloned())
    }

    async fn send(
        &self,
        conversation_id: &str,
        content: &OutboundContent,
    ) -> chainchat_channels::Result<String> {
        if self.state.fail_sends.load(Ordering::SeqCst) {
            return Err(ChannelError::unavailable("network down"));
        }
        let mut sent = self.state.sent.lock().unwrap();
        sent.push((conversation_id.into(), content.clone()));
        let id = format!("out-{}", sent.len());
        self.state.history.lock().unwrap().push(StoredMessage {
            id: id.clone(),
            conversation_id: conversation_id.into(),
            sender_inbox_id: AGENT_INBOX.into(),
        });
        Ok(id)
    }
}

#[derive(Default)]
struct AgentState {
    responses: Mutex<VecDeque<chainchat_agents::Result<AgentResponse>>>,
    requests: Mutex<Vec<AgentRequest>>,
}

/// Agent that replays queued responses, then answers `"ok"`.
#[derive(Clone, Default)]
pub struct ScriptedAgent {
    state: Arc<AgentState>,
}

impl ScriptedAgent {
    pub fn replying(response: AgentResponse) -> Self {
        let agent = Self::default();
        agent.state.responses.lock().unwrap().push_back(Ok(response));
        agent
    }

    pub fn failing(error: chainchat_agents::Error) -> Self {
        let agent = Self::default();
        agent.state.responses.lock().unwrap().push_back(Err(error));
        agent
    }

    pub fn requests(&self) -> Vec<AgentRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentClient for ScriptedAgent {
    async fn ask(&self, request: &AgentRequest) -> chainchat_agents::Result<AgentResponse> {
        self.state.requests.lock().unwrap().push(request.clone());
        self.state
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(AgentResponse {
                    text: "ok".into(),
                    tool_calls: vec![],
                })
            })
    }
}

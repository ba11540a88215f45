//! JSON-lines transport over stdin/stdout for running the bridge without a
//! network client.
//!
//! Each input line is `{"conversation": {...}, "event": {...}}`. Every send is
//! written as one JSON line. End of input cancels the shared shutdown token
//! once all queued events have been handed out.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, Ordering},
    },
};

use {
    async_trait::async_trait,
    chainchat_channels::{
        ConversationInfo, EventStream, InboundEvent, MessagingClient, OutboundContent,
        StoredMessage, error::{Error, Result},
    },
    chainchat_common::types::{AgentIdentity, ConversationKind},
    serde::{Deserialize, Serialize},
    tokio::{
        io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt},
        sync::mpsc,
    },
    tokio_util::sync::CancellationToken,
    tracing::{debug, warn},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConsoleLine {
    conversation: ConsoleConversation,
    event: InboundEvent,
    /// Wallet address behind the event sender, when known.
    #[serde(default)]
    sender_address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConsoleConversation {
    #[serde(default)]
    kind: ConversationKind,
    #[serde(default)]
    members: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutboundLine<'a> {
    conversation_id: &'a str,
    message_id: &'a str,
    content_type: String,
    #[serde(flatten)]
    content: &'a OutboundContent,
}

#[derive(Default)]
struct ConsoleState {
    conversations: HashMap<String, (ConversationKind, Vec<String>)>,
    history: Vec<StoredMessage>,
    addresses: HashMap<String, String>,
}

type Sink = Box<dyn AsyncWrite + Send + Unpin>;

pub struct ConsoleClient {
    identity: AgentIdentity,
    state: Mutex<ConsoleState>,
    inbound: Arc<tokio::sync::Mutex<mpsc::Receiver<InboundEvent>>>,
    out: tokio::sync::Mutex<Sink>,
    eof: CancellationToken,
    seq: AtomicU64,
}

impl ConsoleClient {
    /// Start reading `input` in the background.
    pub fn spawn<R>(
        input: R,
        output: impl AsyncWrite + Send + Unpin + 'static,
        identity: AgentIdentity,
        eof: CancellationToken,
    ) -> Arc<Self>
    where
        R: AsyncBufRead + Send + Unpin + 'static,
    {
        let (tx, rx) = mpsc::channel(64);
        let client = Arc::new(Self {
            identity,
            state: Mutex::new(ConsoleState::default()),
            inbound: Arc::new(tokio::sync::Mutex::new(rx)),
            out: tokio::sync::Mutex::new(Box::new(output)),
            eof,
            seq: AtomicU64::new(0),
        });

        let reader = Arc::clone(&client);
        tokio::spawn(async move {
            let mut lines = input.lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if let Some(event) = reader.ingest(&line)
                            && tx.send(event).await.is_err()
                        {
                            break;
                        }
                    },
                    Ok(None) => break,
                    Err(e) => {
                        warn!(error = %e, "console input failed");
                        break;
                    },
                }
            }
            debug!("console input closed");
        });

        client
    }

    /// Register one input line and return its event. Malformed lines are
    /// logged and skipped.
    fn ingest(&self, line: &str) -> Option<InboundEvent> {
        if line.trim().is_empty() {
            return None;
        }
        let parsed: ConsoleLine = match serde_json::from_str(line) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "skipping malformed console line");
                return None;
            },
        };

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let event = parsed.event;
        let entry = state
            .conversations
            .entry(event.conversation_id.clone())
            .or_insert_with(|| (parsed.conversation.kind, Vec::new()));
        entry.0 = parsed.conversation.kind;
        if !parsed.conversation.members.is_empty() {
            entry.1 = parsed.conversation.members;
        }
        if !entry.1.contains(&event.sender_inbox_id) {
            entry.1.push(event.sender_inbox_id.clone());
        }
        if let Some(address) = parsed.sender_address {
            state
                .addresses
                .insert(event.sender_inbox_id.clone(), address);
        }
        state.history.push(StoredMessage {
            id: event.id.clone(),
            conversation_id: event.conversation_id.clone(),
            sender_inbox_id: event.sender_inbox_id.clone(),
        });
        Some(event)
    }

    fn state(&self) -> std::sync::MutexGuard<'_, ConsoleState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl MessagingClient for ConsoleClient {
    async fn sync_all(&self) -> Result<()> {
        Ok(())
    }

    async fn stream_all_messages(&self) -> Result<EventStream> {
        let inbound = Arc::clone(&self.inbound);
        let eof = self.eof.clone();
        Ok(Box::pin(async_stream::stream! {
            loop {
                let next = inbound.lock().await.recv().await;
                match next {
                    Some(event) => yield Ok(event),
                    None => {
                        eof.cancel();
                        std::future::pending::<()>().await;
                    },
                }
            }
        }))
    }

    async fn conversation(&self, conversation_id: &str) -> Result<ConversationInfo> {
        let state = self.state();
        let (kind, _) = state
            .conversations
            .get(conversation_id)
            .ok_or_else(|| Error::unknown_conversation(conversation_id))?;
        Ok(ConversationInfo {
            id: conversation_id.to_string(),
            kind: *kind,
        })
    }

    async fn members(&self, conversation_id: &str) -> Result<Vec<String>> {
        Ok(self
            .state()
            .conversations
            .get(conversation_id)
            .map(|(_, members)| members.clone())
            .unwrap_or_default())
    }

    async fn messages(&self, conversation_id: &str) -> Result<Vec<StoredMessage>> {
        Ok(self
            .state()
            .history
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect())
    }

    async fn message(&self, message_id: &str) -> Result<Option<StoredMessage>> {
        Ok(self
            .state()
            .history
            .iter()
            .find(|m| m.id == message_id)
            .cloned())
    }

    async fn inbox_address(&self, inbox_id: &str) -> Result<Option<String>> {
        Ok(self.state().addresses.get(inbox_id).cloned())
    }

    async fn send(&self, conversation_id: &str, content: &OutboundContent) -> Result<String> {
        let message_id = format!("console-{}", self.seq.fetch_add(1, Ordering::Relaxed) + 1);
        let line = OutboundLine {
            conversation_id,
            message_id: &message_id,
            content_type: content.content_type().to_string(),
            content,
        };
        let mut encoded = serde_json::to_vec(&line)?;
        encoded.push(b'\n');

        {
            let mut out = self.out.lock().await;
            out.write_all(&encoded)
                .await
                .map_err(|e| Error::external("console write", e))?;
            out.flush()
                .await
                .map_err(|e| Error::external("console flush", e))?;
        }

        self.state().history.push(StoredMessage {
            id: message_id.clone(),
            conversation_id: conversation_id.to_string(),
            sender_inbox_id: self.identity.inbox_id.clone(),
        });
        Ok(message_id)
    }
}

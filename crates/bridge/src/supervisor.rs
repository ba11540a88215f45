use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use {
    chainchat_channels::EventStream,
    futures::StreamExt,
    tracing::{debug, error, info, warn},
};

use crate::{
    backoff::BackoffPolicy,
    context::BridgeContext,
    error::{Error, Result},
    pipeline::handle_event,
};

/// Lifecycle of the subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Connecting,
    Streaming,
    Failed,
    Backoff,
    Stopped,
}

impl SupervisorState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Streaming => "streaming",
            Self::Failed => "failed",
            Self::Backoff => "backoff",
            Self::Stopped => "stopped",
        }
    }
}

enum StreamEnd {
    Cancelled,
    Failed(Error),
}

/// Keeps one subscription alive and feeds its events, one at a time, through
/// the pipeline.
///
/// With a retry bound of `n`, a subscription that never comes up is attempted
/// `n + 1` times with `n` backoff waits in between, then the supervisor stops
/// with [`Error::RetriesExhausted`].
pub struct Supervisor {
    ctx: Arc<BridgeContext>,
    backoff: Box<dyn BackoffPolicy>,
    max_retries: u32,
    streaming: AtomicBool,
}

impl Supervisor {
    pub fn new(ctx: Arc<BridgeContext>, backoff: Box<dyn BackoffPolicy>, max_retries: u32) -> Self {
        Self {
            ctx,
            backoff,
            max_retries,
            streaming: AtomicBool::new(false),
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming.load(Ordering::SeqCst)
    }

    /// Run until cancelled (`Ok`) or out of retries (`Err`).
    pub async fn run(&self) -> Result<()> {
        let cancel = &self.ctx.cancel;
        let mut retries_left = self.max_retries;
        let mut attempt: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                self.transition(SupervisorState::Stopped, retries_left);
                return Ok(());
            }

            self.transition(SupervisorState::Connecting, retries_left);
            let failure = match self.connect().await {
                Ok(stream) => {
                    self.streaming.store(true, Ordering::SeqCst);
                    self.transition(SupervisorState::Streaming, retries_left);
                    let end = self.consume(stream, &mut retries_left).await;
                    self.streaming.store(false, Ordering::SeqCst);
                    match end {
                        StreamEnd::Cancelled => {
                            self.transition(SupervisorState::Stopped, retries_left);
                            return Ok(());
                        },
                        StreamEnd::Failed(e) => e,
                    }
                },
                Err(e) => e,
            };

            warn!(error = %failure, retries_left, "stream failed");
            self.transition(SupervisorState::Failed, retries_left);

            if retries_left == 0 {
                self.transition(SupervisorState::Stopped, retries_left);
                error!(attempts = attempt + 1, "giving up on the message stream");
                return Err(Error::RetriesExhausted {
                    attempts: attempt + 1,
                });
            }
            retries_left -= 1;
            attempt += 1;

            self.transition(SupervisorState::Backoff, retries_left);
            if !self.backoff.wait(attempt, cancel).await {
                self.transition(SupervisorState::Stopped, retries_left);
                return Ok(());
            }
        }
    }

    async fn connect(&self) -> Result<EventStream> {
        self.ctx
            .client
            .sync_all()
            .await
            .map_err(|e| Error::stream_failed(format!("sync failed: {e}")))?;
        self.ctx
            .client
            .stream_all_messages()
            .await
            .map_err(|e| Error::stream_failed(format!("subscribe failed: {e}")))
    }

    async fn consume(&self, mut stream: EventStream, retries_left: &mut u32) -> StreamEnd {
        let cancel = &self.ctx.cancel;
        let mut delivered = false;

        loop {
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => return StreamEnd::Cancelled,
                next = stream.next() => next,
            };

            let event = match next {
                Some(Ok(event)) => event,
                Some(Err(e)) => return StreamEnd::Failed(Error::stream_failed(e)),
                None => return StreamEnd::Failed(Error::stream_failed("stream closed")),
            };

            if !delivered {
                delivered = true;
                if *retries_left != self.max_retries {
                    info!(max_retries = self.max_retries, "stream recovered, retry budget restored");
                    *retries_left = self.max_retries;
                }
            }

            match handle_event(&self.ctx, &event).await {
                Ok(outcome) => debug!(event_id = %event.id, ?outcome, "event handled"),
                Err(e) => warn!(
                    conversation_id = %event.conversation_id,
                    event_id = %event.id,
                    error = %e,
                    "event failed"
                ),
            }

            if cancel.is_cancelled() {
                return StreamEnd::Cancelled;
            }
        }
    }

    fn transition(&self, state: SupervisorState, retries_left: u32) {
        info!(state = state.as_str(), retries_left, "supervisor");
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::testing::{Connection, FakeNetwork, ScriptedAgent, bridge, text_event},
        async_trait::async_trait,
        chainchat_channels::error::Error as ChannelError,
        std::sync::atomic::AtomicU32,
        tokio_util::sync::CancellationToken,
    };

    /// Counts waits instead of sleeping. Optionally cancels on wait `n`.
    #[derive(Default)]
    struct CountingBackoff {
        waits: Arc<AtomicU32>,
        cancel_on: Option<u32>,
    }

    #[async_trait]
    impl BackoffPolicy for CountingBackoff {
        async fn wait(&self, attempt: u32, cancel: &CancellationToken) -> bool {
            self.waits.fetch_add(1, Ordering::SeqCst);
            if self.cancel_on == Some(attempt) {
                cancel.cancel();
            }
            !cancel.is_cancelled()
        }
    }

    fn supervisor(network: &FakeNetwork, agent: &ScriptedAgent, max_retries: u32) -> (Supervisor, Arc<AtomicU32>) {
        let backoff = CountingBackoff::default();
        let waits = Arc::clone(&backoff.waits);
        let ctx = Arc::new(bridge(network, agent));
        (Supervisor::new(ctx, Box::new(backoff), max_retries), waits)
    }

    #[tokio::test]
    async fn stops_after_exactly_max_retries_backoffs() {
        let network = FakeNetwork::new();
        let agent = ScriptedAgent::default();
        let (supervisor, waits) = supervisor(&network, &agent, 5);

        let err = supervisor.run().await.unwrap_err();

        assert!(matches!(err, Error::RetriesExhausted { attempts: 6 }));
        assert_eq!(waits.load(Ordering::SeqCst), 5);
        assert_eq!(network.connects(), 6);
        assert_eq!(network.syncs(), 6);
        assert!(!supervisor.is_streaming());
    }

    #[tokio::test]
    async fn zero_retries_means_one_attempt() {
        let network = FakeNetwork::new();
        let agent = ScriptedAgent::default();
        let (supervisor, waits) = supervisor(&network, &agent, 0);

        assert!(supervisor.run().await.is_err());
        assert_eq!(waits.load(Ordering::SeqCst), 0);
        assert_eq!(network.connects(), 1);
    }

    #[tokio::test]
    async fn bad_event_does_not_end_the_stream() {
        let network = FakeNetwork::new().with_direct("dm", "alice").script([Connection::Events(vec![
            Ok(text_event("missing", "alice", "lookup fails")),
            Ok(text_event("dm", "alice", "first")),
            Ok(text_event("dm", "alice", "second")),
        ])]);
        let agent = ScriptedAgent::default();
        let (supervisor, _) = supervisor(&network, &agent, 0);

        assert!(supervisor.run().await.is_err());
        let messages: Vec<_> = agent.requests().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, ["first", "second"]);
    }

    #[tokio::test]
    async fn stream_error_triggers_reconnect() {
        let network = FakeNetwork::new().with_direct("dm", "alice").script([
            Connection::Events(vec![Err(ChannelError::unavailable("socket reset"))]),
            Connection::Events(vec![Ok(text_event("dm", "alice", "after reconnect"))]),
        ]);
        let agent = ScriptedAgent::default();
        let (supervisor, waits) = supervisor(&network, &agent, 1);

        assert!(supervisor.run().await.is_err());
        assert_eq!(agent.requests().len(), 1);
        // reconnect after the error, restored budget after the event, one
        // more reconnect that is refused
        assert_eq!(waits.load(Ordering::SeqCst), 2);
        assert_eq!(network.connects(), 3);
    }

    #[tokio::test]
    async fn first_event_restores_retry_budget() {
        let network = FakeNetwork::new().with_direct("dm", "alice").script([
            Connection::Refused,
            Connection::Refused,
            Connection::Events(vec![Ok(text_event("dm", "alice", "hi"))]),
        ]);
        let agent = ScriptedAgent::default();
        let (supervisor, waits) = supervisor(&network, &agent, 2);

        assert!(supervisor.run().await.is_err());
        assert_eq!(waits.load(Ordering::SeqCst), 4);
        assert_eq!(network.connects(), 5);
    }

    #[tokio::test]
    async fn cancelled_before_start_never_connects() {
        let network = FakeNetwork::new();
        let agent = ScriptedAgent::default();
        let (supervisor, _) = supervisor(&network, &agent, 5);
        supervisor.ctx.cancel.cancel();

        supervisor.run().await.unwrap();
        assert_eq!(network.connects(), 0);
    }

    #[tokio::test]
    async fn cancellation_during_backoff_stops_cleanly() {
        let network = FakeNetwork::new();
        let agent = ScriptedAgent::default();
        let backoff = CountingBackoff {
            cancel_on: Some(2),
            ..Default::default()
        };
        let waits = Arc::clone(&backoff.waits);
        let supervisor = Supervisor::new(Arc::new(bridge(&network, &agent)), Box::new(backoff), 5);

        supervisor.run().await.unwrap();
        assert_eq!(waits.load(Ordering::SeqCst), 2);
        assert_eq!(network.connects(), 2);
    }

    #[tokio::test]
    async fn cancellation_while_idle_on_stream() {
        let network = FakeNetwork::new();
        let agent = ScriptedAgent::default();
        let ctx = Arc::new(bridge(&network, &agent));
        let supervisor = Supervisor::new(Arc::clone(&ctx), Box::new(CountingBackoff::default()), 5);

        let pending: EventStream = Box::pin(futures::stream::pending::<
            chainchat_channels::Result<chainchat_channels::InboundEvent>,
        >());
        let mut retries_left = 5;
        let cancel = ctx.cancel.clone();
        let consume = supervisor.consume(pending, &mut retries_left);
        cancel.cancel();
        assert!(matches!(consume.await, StreamEnd::Cancelled));
        assert!(network.sent().is_empty());
    }
}

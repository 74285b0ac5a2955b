//! Broadcast registry for live WebSocket connections.
//!
//! Each connection is a linked pair: the registry keeps a [`Connection`]
//! (outbound queue sender plus a liveness watch), while the socket task owns
//! the [`ConnectionPeer`] (queue receiver plus the liveness sender). A
//! broadcast only enqueues; the per-connection socket task does the actual
//! write, so a slow peer never holds up delivery to the others.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use thiserror::Error;
use tokio::sync::{RwLock, mpsc, watch};

use crate::observability::metrics::{BROADCASTS_TOTAL, DELIVERIES_TOTAL, WS_CONNECTIONS_ACTIVE};

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Open,
    Closing,
    Closed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closing => write!(f, "closing"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("outbound queue full")]
    Lagging,

    #[error("peer disconnected")]
    Disconnected,
}

impl DeliveryError {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Lagging => "lagging",
            Self::Disconnected => "disconnected",
        }
    }
}

/// Registry-side handle of one live session
#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    outbound: mpsc::Sender<Arc<str>>,
    liveness: watch::Receiver<ConnectionState>,
}

impl Connection {
    /// Create a linked pair; `buffer` bounds the pending outbound messages.
    pub fn pair(buffer: usize) -> (Connection, ConnectionPeer) {
        let id = ConnectionId::next();
        let (outbound, inbox) = mpsc::channel(buffer.max(1));
        let (state_tx, liveness) = watch::channel(ConnectionState::Open);

        (
            Connection {
                id,
                outbound,
                liveness,
            },
            ConnectionPeer {
                id,
                inbox,
                liveness: Liveness { state: state_tx },
            },
        )
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Current transport state. A dropped peer counts as closed.
    pub fn state(&self) -> ConnectionState {
        if self.liveness.has_changed().is_err() {
            return ConnectionState::Closed;
        }
        *self.liveness.borrow()
    }

    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    /// Enqueue without waiting
    pub fn try_deliver(&self, payload: Arc<str>) -> Result<(), DeliveryError> {
        self.outbound.try_send(payload).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DeliveryError::Lagging,
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Disconnected,
        })
    }
}

/// Transport-side half of a [`Connection`]
#[derive(Debug)]
pub struct ConnectionPeer {
    id: ConnectionId,
    inbox: mpsc::Receiver<Arc<str>>,
    liveness: Liveness,
}

impl ConnectionPeer {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub async fn recv(&mut self) -> Option<Arc<str>> {
        self.inbox.recv().await
    }

    pub fn try_recv(&mut self) -> Option<Arc<str>> {
        self.inbox.try_recv().ok()
    }

    pub fn closing(&self) {
        self.liveness.closing();
    }

    pub fn close(&self) {
        self.liveness.close();
    }

    pub fn into_parts(self) -> (mpsc::Receiver<Arc<str>>, Liveness) {
        (self.inbox, self.liveness)
    }
}

/// Owner of a connection's state signal. Dropping it reports closure.
#[derive(Debug)]
pub struct Liveness {
    state: watch::Sender<ConnectionState>,
}

impl Liveness {
    pub fn closing(&self) {
        self.state.send_if_modified(|state| {
            if *state == ConnectionState::Open {
                *state = ConnectionState::Closing;
                true
            } else {
                false
            }
        });
    }

    pub fn close(&self) {
        self.state.send_replace(ConnectionState::Closed);
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }
}

/// Result of dispatching one broadcast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastOutcome {
    /// Open members the payload was handed to
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
    /// Members that were closing or closed
    pub skipped: usize,
}

/// The set of live connections for this instance
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    members: RwLock<HashMap<ConnectionId, Connection>>,
}

impl ConnectionRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Add a connection and subscribe to its closure signal.
    pub async fn register(self: &Arc<Self>, connection: Connection) {
        let id = connection.id();
        let mut liveness = connection.liveness.clone();

        {
            let mut members = self.members.write().await;
            if members.contains_key(&id) {
                tracing::debug!(connection = %id, "connection already registered");
                return;
            }
            members.insert(id, connection);
            WS_CONNECTIONS_ACTIVE.set(members.len() as f64);
            tracing::debug!(connection = %id, members = members.len(), "connection registered");
        }

        let registry: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            // Err means the peer was dropped, which is also a closure
            let _ = liveness
                .wait_for(|state| *state == ConnectionState::Closed)
                .await;
            if let Some(registry) = registry.upgrade() {
                registry.unregister(id).await;
            }
        });
    }

    /// Remove a member. Returns false if it was already gone.
    pub async fn unregister(&self, id: ConnectionId) -> bool {
        let mut members = self.members.write().await;
        let removed = members.remove(&id).is_some();
        WS_CONNECTIONS_ACTIVE.set(members.len() as f64);
        if removed {
            tracing::debug!(connection = %id, members = members.len(), "connection unregistered");
        }
        removed
    }

    /// Hand `payload` to every open member.
    ///
    /// Closing or closed members are skipped but stay registered until their
    /// closure signal removes them. A failure on one member is logged and
    /// counted without affecting the rest.
    pub async fn broadcast(&self, payload: impl Into<Arc<str>>) -> BroadcastOutcome {
        let payload: Arc<str> = payload.into();
        let mut outcome = BroadcastOutcome::default();

        let members = self.members.read().await;
        for connection in members.values() {
            if !connection.is_open() {
                outcome.skipped += 1;
                continue;
            }

            outcome.attempted += 1;
            match connection.try_deliver(payload.clone()) {
                Ok(()) => {
                    outcome.delivered += 1;
                    DELIVERIES_TOTAL.with_label_values(&["ok"]).inc();
                }
                Err(e) => {
                    outcome.failed += 1;
                    DELIVERIES_TOTAL.with_label_values(&[e.label()]).inc();
                    tracing::warn!(connection = %connection.id(), error = %e, "delivery failed");
                }
            }
        }
        let total = members.len();
        drop(members);

        BROADCASTS_TOTAL.inc();
        tracing::info!(
            members = total,
            attempted = outcome.attempted,
            delivered = outcome.delivered,
            failed = outcome.failed,
            skipped = outcome.skipped,
            "broadcast dispatched"
        );

        outcome
    }

    pub async fn len(&self) -> usize {
        self.members.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.members.read().await.is_empty()
    }

    pub async fn contains(&self, id: ConnectionId) -> bool {
        self.members.read().await.contains_key(&id)
    }

    pub async fn member_ids(&self) -> Vec<ConnectionId> {
        self.members.read().await.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::time::Duration;

    const PAYLOAD: &str = r#"{"filingId":"123","summary":"x"}"#;

    /// Closure removal runs on a spawned task; wait for it to settle.
    async fn wait_for_members(registry: &ConnectionRegistry, expected: &[ConnectionId]) {
        let expected: HashSet<_> = expected.iter().copied().collect();
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                let current: HashSet<_> = registry.member_ids().await.into_iter().collect();
                if current == expected {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("registry membership did not settle");
    }

    #[tokio::test]
    async fn test_broadcast_empty_registry() {
        let registry = ConnectionRegistry::new();
        let outcome = registry.broadcast(PAYLOAD).await;
        assert_eq!(outcome, BroadcastOutcome::default());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_open_member() {
        let registry = ConnectionRegistry::new();
        let mut peers = Vec::new();
        for _ in 0..5 {
            let (conn, peer) = Connection::pair(8);
            registry.register(conn).await;
            peers.push(peer);
        }

        let outcome = registry.broadcast(PAYLOAD).await;
        assert_eq!(outcome.attempted, 5);
        assert_eq!(outcome.delivered, 5);

        for peer in &mut peers {
            assert_eq!(peer.try_recv().as_deref(), Some(PAYLOAD));
            assert!(peer.try_recv().is_none());
        }
    }

    #[tokio::test]
    async fn test_closed_members_are_removed() {
        let registry = ConnectionRegistry::new();
        let (a, peer_a) = Connection::pair(8);
        let (b, peer_b) = Connection::pair(8);
        let (c, peer_c) = Connection::pair(8);
        let (a_id, b_id, c_id) = (a.id(), b.id(), c.id());

        registry.register(a).await;
        registry.register(b).await;
        registry.register(c).await;
        wait_for_members(&registry, &[a_id, b_id, c_id]).await;

        peer_b.close();
        wait_for_members(&registry, &[a_id, c_id]).await;

        drop(peer_a);
        wait_for_members(&registry, &[c_id]).await;

        peer_c.close();
        wait_for_members(&registry, &[]).await;
    }

    #[tokio::test]
    async fn test_unregister_is_idempotent() {
        let registry = ConnectionRegistry::new();
        let (a, _peer_a) = Connection::pair(8);
        let (b, _peer_b) = Connection::pair(8);
        let (a_id, b_id) = (a.id(), b.id());
        registry.register(a).await;
        registry.register(b).await;

        assert!(registry.unregister(a_id).await);
        assert!(!registry.unregister(a_id).await);
        assert!(registry.contains(b_id).await);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_registration_ignored() {
        let registry = ConnectionRegistry::new();
        let (a, _peer) = Connection::pair(8);
        registry.register(a.clone()).await;
        registry.register(a).await;
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_closed_before_broadcast_is_not_attempted() {
        let registry = ConnectionRegistry::new();
        let (a, mut peer_a) = Connection::pair(8);
        let (b, mut peer_b) = Connection::pair(8);
        let (c, mut peer_c) = Connection::pair(8);
        let (a_id, b_id) = (a.id(), b.id());

        registry.register(a).await;
        registry.register(b).await;
        registry.register(c).await;

        // Closed but possibly not yet removed: must be skipped either way
        peer_c.close();

        let outcome = registry.broadcast(PAYLOAD).await;
        assert_eq!(outcome.attempted, 2);
        assert_eq!(outcome.delivered, 2);

        assert_eq!(peer_a.try_recv().as_deref(), Some(PAYLOAD));
        assert_eq!(peer_b.try_recv().as_deref(), Some(PAYLOAD));
        assert!(peer_c.try_recv().is_none());

        wait_for_members(&registry, &[a_id, b_id]).await;
    }

    #[tokio::test]
    async fn test_register_close_then_broadcast() {
        let registry = ConnectionRegistry::new();
        let (a, peer_a) = Connection::pair(8);
        registry.register(a).await;
        peer_a.close();

        let outcome = registry.broadcast("anything").await;
        assert_eq!(outcome.attempted, 0);
        assert_eq!(outcome.delivered, 0);

        wait_for_members(&registry, &[]).await;
    }

    #[tokio::test]
    async fn test_closing_member_skipped_but_kept() {
        let registry = ConnectionRegistry::new();
        let (a, mut peer_a) = Connection::pair(8);
        let a_id = a.id();
        registry.register(a).await;

        peer_a.closing();
        let outcome = registry.broadcast(PAYLOAD).await;
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.attempted, 0);
        assert!(peer_a.try_recv().is_none());
        assert!(registry.contains(a_id).await);
    }

    #[tokio::test]
    async fn test_failing_member_does_not_block_others() {
        let registry = ConnectionRegistry::new();
        let (ok_a, mut peer_a) = Connection::pair(8);
        let (broken, broken_peer) = Connection::pair(8);
        let (ok_b, mut peer_b) = Connection::pair(8);

        // Drop the inbox but keep liveness open: sends fail, state stays open
        let (inbox, _liveness) = broken_peer.into_parts();
        drop(inbox);

        registry.register(ok_a).await;
        registry.register(broken).await;
        registry.register(ok_b).await;

        let outcome = registry.broadcast(PAYLOAD).await;
        assert_eq!(outcome.attempted, 3);
        assert_eq!(outcome.delivered, 2);
        assert_eq!(outcome.failed, 1);

        assert_eq!(peer_a.try_recv().as_deref(), Some(PAYLOAD));
        assert_eq!(peer_b.try_recv().as_deref(), Some(PAYLOAD));
    }

    #[tokio::test]
    async fn test_slow_member_lags_alone() {
        let registry = ConnectionRegistry::new();
        let (slow, mut slow_peer) = Connection::pair(1);
        let (fast, mut fast_peer) = Connection::pair(8);
        registry.register(slow).await;
        registry.register(fast).await;

        let first = registry.broadcast("one").await;
        assert_eq!(first.delivered, 2);

        // Nobody drains the slow peer, so its single slot is still taken
        let second = registry.broadcast("two").await;
        assert_eq!(second.delivered, 1);
        assert_eq!(second.failed, 1);

        assert_eq!(fast_peer.try_recv().as_deref(), Some("one"));
        assert_eq!(fast_peer.try_recv().as_deref(), Some("two"));
        assert_eq!(slow_peer.try_recv().as_deref(), Some("one"));
        assert!(slow_peer.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_per_connection_order_preserved() {
        let registry = ConnectionRegistry::new();
        let (a, mut peer_a) = Connection::pair(16);
        registry.register(a).await;

        for i in 0..10 {
            registry.broadcast(format!("msg-{}", i)).await;
        }
        for i in 0..10 {
            assert_eq!(peer_a.recv().await.as_deref(), Some(format!("msg-{}", i).as_str()));
        }
    }

    #[test]
    fn test_dropped_peer_reports_closed() {
        let (conn, peer) = Connection::pair(1);
        assert_eq!(conn.state(), ConnectionState::Open);
        peer.closing();
        assert_eq!(conn.state(), ConnectionState::Closing);
        drop(peer);
        assert_eq!(conn.state(), ConnectionState::Closed);
    }

    #[tokio::test]
    async fn test_liveness_subscribers_see_closing() {
        let (_conn, peer) = Connection::pair(1);
        let (_inbox, liveness) = peer.into_parts();
        let mut state = liveness.subscribe();

        liveness.closing();
        let seen = state
            .wait_for(|s| *s != ConnectionState::Open)
            .await
            .map(|s| *s)
            .unwrap();
        assert_eq!(seen, ConnectionState::Closing);

        // Closing never moves back to open
        liveness.closing();
        assert_eq!(*state.borrow(), ConnectionState::Closing);
    }

    #[test]
    fn test_connection_ids_unique() {
        let (a, _pa) = Connection::pair(1);
        let (b, _pb) = Connection::pair(1);
        assert_ne!(a.id(), b.id());
    }
}
